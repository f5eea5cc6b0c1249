//! Lumenfolio daemon: configuration, wiring and the snapshot scheduler.

pub mod config;
pub mod horizon;
pub mod main_lib;
pub mod scheduler;

pub use main_lib::{build_state, init_tracing, AppState};
