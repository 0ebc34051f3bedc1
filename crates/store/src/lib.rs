//! In-memory entity repository for unitwatch.
//!
//! [`Store`] is the single logical owner of all entity state: one keyed
//! table per entity behind `tokio::sync::RwLock`, constructed at startup
//! and shared as `Arc<Store>`. Consumers go through the repository types
//! in [`repositories`] and never touch process-global state.
//!
//! The write interface is fallible even though the in-memory tables cannot
//! fail; callers are expected to propagate write errors rather than assume
//! success, so swapping in a durable backend does not change call sites.

pub mod repositories;
mod store;

pub use store::Store;
