#![doc(test(attr(deny(warnings))))]

//! fintrack projects recurring income and expenses into monthly savings,
//! tracks category budgets, and persists everything as a JSON document.
//!
//! The calculation engine lives in `fintrack-core`; this crate wires it to
//! JSON storage, configuration, currencies, and the command-line interface.

pub mod cli;
pub mod core;
pub mod currency;
pub mod errors;
pub mod utils;

pub use crate::core::{open_json_manager, FinanceManager};
pub use errors::{FinanceError, FinanceResult};

pub use fintrack_config as config;
pub use fintrack_core as engine;
pub use fintrack_domain as domain;
pub use fintrack_storage_json as storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("fintrack tracing initialized.");
    });
}
