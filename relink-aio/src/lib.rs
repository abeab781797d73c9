// relink-aio/src/lib.rs
//! Asynchronous IO for relink (filesystem links, process execution)

pub mod fs;
pub mod memory;
pub mod process;

pub use fs::{DiskFs, LinkFs};
pub use memory::MemoryFs;
pub use process::run_shell_async;
