// AwaitSleuth - core/mod.rs
//
// Core business logic layer: the extraction/classification/aggregation
// pipeline. Dependencies: pure logic only, no filesystem or terminal I/O
// (export writes to any Write trait object handed in by the caller).

pub mod aggregate;
pub mod export;
pub mod extract;
pub mod model;
pub mod schema;
