// AwaitSleuth - lib.rs
//
// Library entry point, exposing all non-rendering modules for integration
// testing and potential future programmatic use.
//
// The console report renderer (`report.rs`) lives on the binary side in
// `main.rs` and is not part of the library surface.

pub mod app;
pub mod core;
pub mod util;
