//! Loading invoice records from JSON documents.
//!
//! The document mirrors [`InvoiceRecord`]: `message_ref`, `invoice_number`,
//! `invoice_date`, optional `currency` and `reference`, `parties[]`,
//! `items[]` and optional `payment_terms { due_date, method }`. Amounts may
//! be JSON strings or numbers. A missing required key loads as an empty
//! value and is reported by the validator, not by the parser.

use std::path::Path;

use crate::core::{InvoicError, InvoiceRecord};

/// Parse an invoice record from JSON text.
///
/// ```
/// let record = invoic::json::from_json_str(r#"{
///     "message_ref": "789123",
///     "invoice_number": "INV2025001",
///     "invoice_date": "20250322",
///     "parties": [{"qualifier": "BY", "id": "123456789"}],
///     "items": [{"product_code": "ABC123", "description": "Product A",
///                "quantity": 10, "price": "25.50", "tax_rate": 20}]
/// }"#).unwrap();
/// assert_eq!(record.items[0].quantity, "10");
/// ```
pub fn from_json_str(json: &str) -> Result<InvoiceRecord, InvoicError> {
    serde_json::from_str(json).map_err(|e| InvoicError::Json(e.to_string()))
}

/// Read and parse an invoice record from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<InvoiceRecord, InvoicError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| InvoicError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let record = from_json_str(&text)?;
    tracing::debug!(path = %path.display(), items = record.items.len(), "invoice record loaded");
    Ok(record)
}

/// Serialize an invoice record as pretty-printed JSON.
pub fn to_json_string(record: &InvoiceRecord) -> Result<String, InvoicError> {
    serde_json::to_string_pretty(record).map_err(|e| InvoicError::Json(e.to_string()))
}
