//! Rolling profit and loss over fixed lookback windows.

mod performance_model;
mod performance_service;
mod performance_traits;

pub use performance_model::*;
pub use performance_service::*;
pub use performance_traits::*;

#[cfg(test)]
mod performance_service_tests;
