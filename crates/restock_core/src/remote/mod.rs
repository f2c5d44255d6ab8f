//! Remote product sources.
//!
//! # Responsibility
//! - Define the payload shape and source contract for product imports.
//! - Provide the simulated catalog endpoint used by the demo driver.

pub mod product_api;
