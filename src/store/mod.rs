//! Two-tier persistence: a synchronous local cache and an asynchronous
//! remote table store, reconciled by [`merge::merge`].

pub mod local;
pub mod memory;
pub mod merge;
pub mod remote;
pub mod rest;
pub mod sync;
pub mod wire;

pub use local::LocalCache;
pub use memory::MemoryRemote;
pub use merge::{Syncable, merge};
pub use remote::{Order, RemoteError, RemoteStore, Table};
pub use rest::RestRemote;
pub use sync::{RemoteOp, RemoteSync, SyncFailure};
