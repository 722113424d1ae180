//! fintrack-core
//!
//! Calculation engine and record services for fintrack.
//! Depends on fintrack-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod budget_service;
pub mod category_service;
pub mod error;
pub mod expense_service;
pub mod forecast_service;
pub mod frequency_service;
pub mod income_service;
pub mod recurrence_service;
pub mod storage;
pub mod summary_service;
pub mod time;
mod validation;

pub use budget_service::*;
pub use category_service::*;
pub use error::{CoreError, CoreResult};
pub use expense_service::*;
pub use forecast_service::*;
pub use frequency_service::*;
pub use income_service::*;
pub use recurrence_service::*;
pub use summary_service::*;
pub use time::{Clock, FixedClock, SystemClock};

#[cfg(test)]
mod tests;
