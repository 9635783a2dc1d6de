//! Lock aliases used across the workspace.
//!
//! Everything that guards per-player or registry state goes through these so the
//! lock implementation can be swapped in one place.

/// A mutex that never poisons. Used as the per-player serialization boundary.
pub type SyncMutex<T> = parking_lot::Mutex<T>;

/// A reader-writer lock that never poisons.
pub type SyncRwLock<T> = parking_lot::RwLock<T>;
