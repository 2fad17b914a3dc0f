//! Shared infrastructure utilities for Skillpath.
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename), used for
//!   the config file when a session token is stored.

pub mod atomic_write;

pub use atomic_write::{AtomicWriteOptions, PersistMode, atomic_write, atomic_write_with_options};
