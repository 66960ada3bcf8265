//! Transport implementations

pub mod console;
pub mod file;
pub mod memory;

pub use console::ConsoleTransport;
pub use file::FileTransport;
pub use memory::MemoryTransport;

pub use crate::core::{FnTransport, Transport};
#[cfg(feature = "async-transports")]
pub use crate::core::{AsyncTransport, SpawnedTransport};
