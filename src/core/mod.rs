//! Core invoice record types, sanitization, validation, and totals.
//!
//! This module holds everything that does not depend on the EDIFACT
//! syntax: the [`InvoiceRecord`] model, the field validator, and exact
//! decimal totals.

mod builder;
mod countries;
mod error;
mod sanitize;
mod totals;
mod types;
mod validation;

pub use builder::*;
pub use countries::{country_codes, is_known_country_code};
pub use error::*;
pub use sanitize::{is_alphanumeric_text, sanitize};
pub use totals::*;
pub use types::*;
pub use validation::*;
