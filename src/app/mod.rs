// AwaitSleuth - app/mod.rs
//
// Orchestration layer: capture file discovery and the per-file analysis
// loop. This is the only layer that touches the filesystem; the core
// pipeline receives file content as plain strings.

pub mod discover;
pub mod run;
