//! # invoic
//!
//! UN/EDIFACT INVOIC (D.96A) interchange generator: record validation,
//! release-character escaping, and exact decimal invoice totals.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Amounts are accumulated at full precision and rounded to two places, ties
//! to the even cent, only when rendered.
//!
//! ## Quick Start
//!
//! ```rust
//! use invoic::core::*;
//! use invoic::edifact::{EdifactConfig, MessageAssembler};
//!
//! let record = InvoiceRecordBuilder::new("789123", "INV2025001", "20250322")
//!     .currency(Currency::Eur)
//!     .party(PartyQualifier::Buyer, "123456789")
//!     .party(PartyQualifier::Supplier, "987654321")
//!     .add_item(LineItemBuilder::new("ABC123", "Product A", "10", "25.50")
//!         .tax_rate("20")
//!         .build())
//!     .build()
//!     .unwrap();
//!
//! let message = MessageAssembler::new(EdifactConfig::default())
//!     .unwrap()
//!     .assemble(&record)
//!     .unwrap();
//! assert!(message.text().contains("MOA+86:255.00'"));
//! assert!(message.text().contains("MOA+176:51.00'"));
//! assert!(message.text().contains("MOA+9:306.00'"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Record types, sanitizer, validator, totals |
//! | `edifact` (default) | Escaping, segments, INVOIC assembly, file output |
//! | `json` | Load records from JSON documents |
//! | `cli` | The `invoic` command-line tool |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "edifact")]
pub mod edifact;

#[cfg(feature = "json")]
pub mod json;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
