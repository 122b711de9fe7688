use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::countries::{country_codes, is_known_country_code};
use super::error::{ValidationError, ValidationKind};
use super::sanitize::{char_len, is_alphanumeric_text, sanitize};
use super::types::*;

/// Maximum product code length (LIN).
pub const MAX_PRODUCT_CODE_LENGTH: usize = 35;
/// Maximum item description length (IMD).
pub const MAX_DESCRIPTION_LENGTH: usize = 70;
/// Party names are truncated to this length on output.
pub const MAX_NAME_LENGTH: usize = 35;
/// Street lines are truncated to this length on output.
pub const MAX_ADDRESS_LINE_LENGTH: usize = 35;
/// City names are truncated to this length on output.
pub const MAX_CITY_LENGTH: usize = 35;
/// Unit of measure used when an item does not name one.
pub const DEFAULT_UNIT: &str = "EA";

/// An invoice record that passed [`check`], with its dates and amounts parsed.
#[derive(Debug, Clone)]
pub struct ValidatedInvoice<'a> {
    pub record: &'a InvoiceRecord,
    pub invoice_date: NaiveDate,
    /// Parsed `payment_terms.due_date`, if present.
    pub due_date: Option<NaiveDate>,
    /// One entry per record item, same order.
    pub lines: Vec<ValidatedLine<'a>>,
}

/// A line item with sanitized text and exact decimal amounts.
#[derive(Debug, Clone)]
pub struct ValidatedLine<'a> {
    pub item: &'a LineItem,
    pub product_code: String,
    pub description: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub tax_rate: Option<Decimal>,
    /// Upper-cased unit of measure, [`DEFAULT_UNIT`] if absent.
    pub unit: String,
}

/// Validate an invoice record before encoding.
///
/// Stops at the first violated rule and reports which field failed and why.
pub fn validate(record: &InvoiceRecord) -> Result<(), ValidationError> {
    check(record).map(|_| ())
}

/// Validate an invoice record and return its parsed form.
///
/// Rules are evaluated in a fixed order: required fields, dates, message
/// reference, parties, items, payment method, currency, reference.
pub fn check(record: &InvoiceRecord) -> Result<ValidatedInvoice<'_>, ValidationError> {
    let result = check_record(record);
    match &result {
        Ok(_) => tracing::debug!(invoice = %record.invoice_number, "invoice record valid"),
        Err(e) => tracing::warn!(field = %e.field, reason = %e.message, "invoice record rejected"),
    }
    result
}

fn check_record(record: &InvoiceRecord) -> Result<ValidatedInvoice<'_>, ValidationError> {
    require("message_ref", &record.message_ref)?;
    require("invoice_number", &record.invoice_number)?;
    require("invoice_date", &record.invoice_date)?;
    if record.parties.is_empty() {
        return Err(ValidationError::missing("parties"));
    }
    if record.items.is_empty() {
        return Err(ValidationError::new(
            "items",
            ValidationKind::Missing,
            "invoice must contain at least one item",
        ));
    }

    let invoice_date = parse_date("invoice_date", &record.invoice_date)?;
    let due_date = match record
        .payment_terms
        .as_ref()
        .and_then(|t| t.due_date.as_deref())
    {
        Some(raw) => Some(parse_date("payment_terms.due_date", raw)?),
        None => None,
    };

    check_charset(
        "message_ref",
        &sanitize(record.message_ref.as_str(), false, None),
    )?;

    check_parties(&record.parties)?;

    let lines = record
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| check_item(item, i))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(method) = record.payment_terms.as_ref().and_then(|t| t.method.as_ref()) {
        if !method.is_known() {
            return Err(unknown_code(
                "payment_terms.method",
                "payment method",
                method.code(),
                PaymentMethod::KNOWN.iter().map(|m| m.code().to_string()),
            ));
        }
    }

    if let Some(currency) = &record.currency {
        if !currency.is_known() {
            return Err(unknown_code(
                "currency",
                "currency",
                currency.code(),
                Currency::KNOWN.iter().map(|c| c.code().to_string()),
            ));
        }
    }

    if let Some(reference) = &record.reference {
        let reference = sanitize(reference.as_str(), false, None);
        if reference.is_empty() {
            return Err(ValidationError::new(
                "reference",
                ValidationKind::Missing,
                "reference must not be empty when present",
            ));
        }
        check_charset("reference", &reference)?;
    }

    Ok(ValidatedInvoice {
        record,
        invoice_date,
        due_date,
        lines,
    })
}

fn check_parties(parties: &[Party]) -> Result<(), ValidationError> {
    let missing: Vec<String> = [PartyQualifier::Buyer, PartyQualifier::Supplier]
        .into_iter()
        .filter(|q| !parties.iter().any(|p| &p.qualifier == q))
        .map(|q| q.code().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::new(
            "parties",
            ValidationKind::MissingParty,
            format!("missing required party qualifiers: {}", missing.join(", ")),
        ));
    }

    for (i, party) in parties.iter().enumerate() {
        let prefix = format!("parties[{i}]");

        if !party.qualifier.is_known() {
            if party.qualifier.code().is_empty() {
                return Err(ValidationError::missing(format!("{prefix}.qualifier")));
            }
            return Err(unknown_code(
                &format!("{prefix}.qualifier"),
                "party qualifier",
                party.qualifier.code(),
                PartyQualifier::KNOWN.iter().map(|q| q.code().to_string()),
            ));
        }

        if sanitize(party.id.as_str(), false, None).is_empty() {
            return Err(ValidationError::new(
                format!("{prefix}.id"),
                ValidationKind::Missing,
                "party id must be a non-empty string",
            ));
        }

        if let Some(name) = party.name.as_deref() {
            check_charset(
                &format!("{prefix}.name"),
                &sanitize(name, false, Some(MAX_NAME_LENGTH)),
            )?;
        }

        if let Some(country) = party.country.as_deref() {
            let country = sanitize(country, true, None);
            if !is_known_country_code(&country) {
                return Err(unknown_code(
                    &format!("{prefix}.country"),
                    "country code",
                    &country,
                    country_codes().iter().map(|c| c.to_string()),
                ));
            }
        }
    }

    Ok(())
}

fn check_item(item: &LineItem, index: usize) -> Result<ValidatedLine<'_>, ValidationError> {
    let prefix = format!("items[{index}]");

    for (name, value) in [
        ("product_code", &item.product_code),
        ("description", &item.description),
        ("quantity", &item.quantity),
        ("price", &item.price),
    ] {
        require(&format!("{prefix}.{name}"), value)?;
    }

    let product_code = sanitize(item.product_code.as_str(), false, None);
    let description = sanitize(item.description.as_str(), false, None);
    check_charset(&format!("{prefix}.product_code"), &product_code)?;
    check_charset(&format!("{prefix}.description"), &description)?;
    check_length(
        &format!("{prefix}.product_code"),
        &product_code,
        MAX_PRODUCT_CODE_LENGTH,
    )?;
    check_length(
        &format!("{prefix}.description"),
        &description,
        MAX_DESCRIPTION_LENGTH,
    )?;

    let quantity = parse_non_negative(&format!("{prefix}.quantity"), &item.quantity)?;
    let price = parse_non_negative(&format!("{prefix}.price"), &item.price)?;
    let tax_rate = match item.tax_rate.as_deref() {
        Some(raw) => Some(parse_non_negative(&format!("{prefix}.tax_rate"), raw)?),
        None => None,
    };

    let unit = match item.unit.as_deref() {
        Some(raw) => {
            let unit = sanitize(raw, true, None);
            check_charset(&format!("{prefix}.unit"), &unit)?;
            unit
        }
        None => DEFAULT_UNIT.to_string(),
    };

    Ok(ValidatedLine {
        item,
        product_code,
        description,
        quantity,
        price,
        tax_rate,
        unit,
    })
}

fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::missing(field))
    } else {
        Ok(())
    }
}

fn check_charset(field: &str, value: &str) -> Result<(), ValidationError> {
    if is_alphanumeric_text(value) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            ValidationKind::Charset,
            format!(
                "invalid characters in '{value}' (allowed: letters, digits, space, _ - . @ # &)"
            ),
        ))
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if char_len(value) > max {
        Err(ValidationError::new(
            field,
            ValidationKind::Length,
            format!("exceeds maximum length of {max} characters"),
        ))
    } else {
        Ok(())
    }
}

fn unknown_code(
    field: &str,
    what: &str,
    code: &str,
    valid: impl Iterator<Item = String>,
) -> ValidationError {
    ValidationError::new(
        field,
        ValidationKind::UnknownCode,
        format!(
            "invalid {what} '{code}', valid values are: {}",
            valid.collect::<Vec<_>>().join(", ")
        ),
    )
}

/// Parse a `YYYYMMDD` date. Exactly eight digits, calendar-valid.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, ValidationError> {
    let s = raw.trim();
    let invalid = || {
        ValidationError::new(
            field,
            ValidationKind::Format,
            format!("'{s}' is not a valid date in YYYYMMDD format"),
        )
    };

    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let year: i32 = s[0..4].parse().map_err(|_| invalid())?;
    let month: u32 = s[4..6].parse().map_err(|_| invalid())?;
    let day: u32 = s[6..8].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Parse a non-negative exact decimal.
pub fn parse_non_negative(field: &str, raw: &str) -> Result<Decimal, ValidationError> {
    let s = raw.trim();
    let value: Decimal = s.parse().map_err(|_| {
        ValidationError::new(
            field,
            ValidationKind::Format,
            format!("'{s}' is not a decimal number"),
        )
    })?;
    if value < Decimal::ZERO {
        return Err(ValidationError::new(
            field,
            ValidationKind::Negative,
            format!("'{s}' must not be negative"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InvoiceRecordBuilder, LineItemBuilder, PartyBuilder};
    use rust_decimal_macros::dec;

    fn record() -> InvoiceRecordBuilder {
        InvoiceRecordBuilder::new("789123", "INV2025001", "20250322")
            .party(PartyQualifier::Buyer, "123456789")
            .party(PartyQualifier::Supplier, "987654321")
            .add_item(
                LineItemBuilder::new("ABC123", "Product A", "10", "25.50")
                    .tax_rate("20")
                    .build(),
            )
    }

    #[test]
    fn valid_record_passes() {
        let rec = record().build_unchecked();
        let checked = check(&rec).unwrap();
        assert_eq!(
            checked.invoice_date,
            NaiveDate::from_ymd_opt(2025, 3, 22).unwrap()
        );
        assert_eq!(checked.lines[0].quantity, dec!(10));
        assert_eq!(checked.lines[0].price, dec!(25.50));
        assert_eq!(checked.lines[0].tax_rate, Some(dec!(20)));
        assert_eq!(checked.lines[0].unit, "EA");
    }

    #[test]
    fn date_must_be_eight_digits() {
        assert!(parse_date("d", "20250322").is_ok());
        assert!(parse_date("d", " 20250322 ").is_ok());
        assert!(parse_date("d", "2025-03-22").is_err());
        assert!(parse_date("d", "250322").is_err());
        assert!(parse_date("d", "20250230").is_err());
        assert!(parse_date("d", "20251301").is_err());
    }

    #[test]
    fn decimals_must_be_non_negative() {
        assert_eq!(parse_non_negative("q", "10").unwrap(), dec!(10));
        assert_eq!(parse_non_negative("q", " 0.5 ").unwrap(), dec!(0.5));
        assert_eq!(parse_non_negative("q", "-0").unwrap(), dec!(0));
        let err = parse_non_negative("q", "-1").unwrap_err();
        assert_eq!(err.kind, ValidationKind::Negative);
        let err = parse_non_negative("q", "ten").unwrap_err();
        assert_eq!(err.kind, ValidationKind::Format);
    }

    #[test]
    fn missing_field_reported_first() {
        let mut rec = record().build_unchecked();
        rec.invoice_number = "  ".into();
        rec.invoice_date = "garbage".into();
        let err = validate(&rec).unwrap_err();
        assert_eq!(err.field, "invoice_number");
        assert_eq!(err.kind, ValidationKind::Missing);
    }

    #[test]
    fn missing_qualifiers_are_named() {
        let rec = InvoiceRecordBuilder::new("1", "2", "20250322")
            .party(PartyQualifier::Invoicee, "555")
            .add_item(LineItemBuilder::new("A", "B", "1", "1").build())
            .build_unchecked();
        let err = validate(&rec).unwrap_err();
        assert_eq!(err.kind, ValidationKind::MissingParty);
        assert!(err.message.contains("BY"));
        assert!(err.message.contains("SU"));
    }

    #[test]
    fn product_code_length_is_rejected_not_truncated() {
        let rec = record()
            .add_item(LineItemBuilder::new("X".repeat(36), "Too long", "1", "1").build())
            .build_unchecked();
        let err = validate(&rec).unwrap_err();
        assert_eq!(err.field, "items[1].product_code");
        assert_eq!(err.kind, ValidationKind::Length);
    }

    #[test]
    fn name_longer_than_cap_still_passes() {
        let payee = PartyBuilder::new(PartyQualifier::Payee, "1")
            .name("N".repeat(80))
            .build();
        let rec = record().add_party(payee).build_unchecked();
        assert!(validate(&rec).is_ok());
    }
}
