//! Medledger Effects - Infrastructure Handlers
//!
//! Stateless implementations of the infrastructure effect traits from
//! `medledger-core`. Wallet and ledger capabilities are external and are not
//! implemented here; scripted versions live in `medledger-testkit`.
//!
//! # Handlers
//!
//! - [`MemoryStorageHandler`]: in-process map, headless frontends
//! - [`FilesystemStorageHandler`]: one file per key (native only)
//! - [`LocalStorageHandler`]: browser `localStorage` (wasm32 only)

#![forbid(unsafe_code)]

pub mod storage;

pub use storage::MemoryStorageHandler;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FilesystemStorageHandler;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageHandler;
