//! fintrack-domain
//!
//! Pure domain models (income sources, expenses, categories, monthly data, settings).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod category;
pub mod common;
pub mod expense;
pub mod income;
pub mod monthly;
pub mod settings;
pub mod state;

pub use category::*;
pub use common::*;
pub use expense::*;
pub use income::*;
pub use monthly::*;
pub use settings::*;
pub use state::*;
