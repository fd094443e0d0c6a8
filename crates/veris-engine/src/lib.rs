//! Deterministic investment analysis for property records.
//!
//! Everything in this crate is pure and synchronous: identical inputs
//! always produce identical outputs, so results reproduce exactly
//! across sessions and reimplementations.

pub mod error;
pub mod finance;
pub mod score;

pub use error::EngineError;
pub use finance::{amortized_payment, growth_projection, monthly_cash_flow};
pub use score::{investment_memo, score};
