//! Storage effect handlers

mod memory;
pub use memory::MemoryStorageHandler;

#[cfg(not(target_arch = "wasm32"))]
mod filesystem;
#[cfg(not(target_arch = "wasm32"))]
pub use filesystem::FilesystemStorageHandler;

#[cfg(target_arch = "wasm32")]
mod local;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageHandler;
