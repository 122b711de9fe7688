//! UN/EDIFACT INVOIC (D.96A) generation.
//!
//! Turns a validated [`InvoiceRecord`](crate::core::InvoiceRecord) into a
//! complete interchange: UNA service string advice, UNB/UNZ envelope and one
//! INVOIC message between UNH and UNT.
//!
//! # Example
//!
//! ```
//! use invoic::core::*;
//! use invoic::edifact::*;
//!
//! let record = InvoiceRecordBuilder::new("789123", "INV2025001", "20250322")
//!     .currency(Currency::Eur)
//!     .party(PartyQualifier::Buyer, "123456789")
//!     .party(PartyQualifier::Supplier, "987654321")
//!     .add_item(LineItemBuilder::new("ABC123", "Product A", "10", "25.50").tax_rate("20").build())
//!     .build()
//!     .unwrap();
//!
//! let config = EdifactConfigBuilder::new().application_ref("ERP01").build();
//! let text = to_invoic(&record, &config).unwrap();
//! assert!(text.starts_with("UNA:+.? '\nUNB+UNOC:3+ERP01:789123+"));
//! ```

mod config;
mod message;
mod segment;
mod syntax;
mod writer;

pub use config::{CharacterSet, EdifactConfig, EdifactConfigBuilder};
pub use message::{EncodedMessage, MessageAssembler, to_invoic};
pub use segment::{Segment, SegmentBuilder};
pub use syntax::Syntax;
pub use writer::{TextEncoding, WriteOptions, write_message};
