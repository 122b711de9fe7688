//! Edge cases: hostile characters, caps, zero amounts, extreme values.

#![cfg(feature = "edifact")]

use invoic::core::*;
use invoic::edifact::*;

fn base() -> InvoiceRecordBuilder {
    InvoiceRecordBuilder::new("789123", "INV2025001", "20250322")
        .party(PartyQualifier::Buyer, "123456789")
        .party(PartyQualifier::Supplier, "987654321")
}

fn one_item(quantity: &str, price: &str, rate: Option<&str>) -> InvoiceRecord {
    let mut item = LineItemBuilder::new("ABC123", "Product A", quantity, price);
    if let Some(rate) = rate {
        item = item.tax_rate(rate);
    }
    base().add_item(item.build()).build_unchecked()
}

fn generate(record: &InvoiceRecord) -> Result<EncodedMessage, InvoicError> {
    MessageAssembler::new(EdifactConfig::default())?.assemble(record)
}

/// True if every segment terminator except the last one of each line is released.
fn all_terminators_released(text: &str) -> bool {
    text.lines().skip(1).all(|line| {
        let body = match line.strip_suffix('\'') {
            Some(body) => body,
            None => return false,
        };
        let mut released = false;
        for c in body.chars() {
            if released {
                released = false;
            } else if c == '?' {
                released = true;
            } else if c == '\'' {
                return false;
            }
        }
        !released
    })
}

// --- Escaping ---

#[test]
fn delimiters_in_free_text_are_released() {
    let rec = base()
        .add_party(
            PartyBuilder::new(PartyQualifier::Invoicee, "ID+1:2'3?")
                .street("O'Brien's Yard + Co: Unit 4?")
                .city("St. John's")
                .build(),
        )
        .add_item(LineItemBuilder::new("ABC123", "Product A", "1", "1").build())
        .build_unchecked();
    let message = generate(&rec).unwrap();
    let nad = message.segments().iter().find(|s| s.as_str().starts_with("NAD+IV")).unwrap();
    assert_eq!(
        nad.as_str(),
        "NAD+IV+ID?+1?:2?'3??::91+++O?'Brien?'s? Yard? ?+? Co?:? Unit? 4??+St.? John?'s'"
    );
    assert!(all_terminators_released(message.text()));
}

#[test]
fn escape_example_has_no_bare_delimiters() {
    let escaped = Syntax::default().escape("A+B:C'D", false);
    assert_eq!(escaped, "A?+B?:C?'D");
    let bare = escaped
        .char_indices()
        .filter(|(_, c)| matches!(c, '+' | ':' | '\''))
        .any(|(i, _)| escaped.as_bytes()[i - 1] != b'?');
    assert!(!bare);
}

#[test]
fn invoice_number_with_release_character() {
    let mut rec = one_item("1", "1", None);
    rec.invoice_number = "INV?1".into();
    let message = generate(&rec).unwrap();
    assert_eq!(message.segment("BGM").unwrap().as_str(), "BGM+380+INV??1+9'");
}

// --- Caps and normalisation ---

#[test]
fn long_party_fields_truncated_on_output() {
    let rec = base()
        .add_party(
            PartyBuilder::new(PartyQualifier::Payee, "1")
                .name("N".repeat(50))
                .street("S".repeat(50))
                .build(),
        )
        .add_item(LineItemBuilder::new("ABC123", "Product A", "1", "1").build())
        .build_unchecked();
    let message = generate(&rec).unwrap();
    let expected = format!("NAD+PE+1::91++{}+{}'", "N".repeat(35), "S".repeat(35));
    assert!(message.segments().iter().any(|s| s.as_str() == expected));
}

#[test]
fn whitespace_is_trimmed_and_codes_upper_cased() {
    let rec = base()
        .add_party(
            PartyBuilder::new(PartyQualifier::from_code(" dp "), "  42  ")
                .country(" de ")
                .build(),
        )
        .add_item(
            LineItemBuilder::new("  ABC123 ", "  Product A ", " 2 ", " 3.5 ")
                .unit(" kgm ")
                .build(),
        )
        .build_unchecked();
    let text = generate(&rec).unwrap().into_text();
    assert!(text.contains("NAD+DP+42::91+++++++DE'"));
    assert!(text.contains("LIN+1++ABC123:EN'"));
    assert!(text.contains("QTY+47:2:KGM'"));
    assert!(text.contains("PRI+AAA:3.50:KGM'"));
}

#[test]
fn product_code_at_cap_is_accepted() {
    let code = "P".repeat(35);
    let rec = base()
        .add_item(LineItemBuilder::new(code.clone(), "Product A", "1", "1").build())
        .build_unchecked();
    let message = generate(&rec).unwrap();
    assert_eq!(
        message.segment("LIN").unwrap().as_str(),
        format!("LIN+1++{code}:EN'")
    );
}

// --- Amounts ---

#[test]
fn zero_quantity_and_zero_rate() {
    let message = generate(&one_item("0", "25.50", Some("0"))).unwrap();
    let text = message.text();
    assert!(message.segment("TAX").is_none());
    assert!(text.contains("QTY+47:0:EA'"));
    assert!(text.contains("MOA+86:0.00'"));
    assert!(text.contains("MOA+9:0.00'"));
}

#[test]
fn fractional_quantity_keeps_its_scale() {
    let message = generate(&one_item("2.500", "1.999", Some("19"))).unwrap();
    let text = message.text();
    assert!(text.contains("QTY+47:2.500:EA'"));
    // price rendered to two places, totals from the exact price
    assert!(text.contains("PRI+AAA:2.00:EA'"));
    // 2.5 × 1.999 = 4.9975
    assert!(text.contains("MOA+86:5.00'"));
    // 4.9975 × 0.19 = 0.949525
    assert!(text.contains("MOA+176:0.95'"));
    // 5.947025
    assert!(text.contains("MOA+9:5.95'"));
}

#[test]
fn midpoint_rounds_to_even_cent() {
    // 1 × 0.125 at 0 % → 0.125 → 0.12
    let message = generate(&one_item("1", "0.125", None)).unwrap();
    let text = message.text();
    assert!(text.contains("PRI+AAA:0.12:EA'"));
    assert!(text.contains("MOA+86:0.12'"));
    assert!(text.contains("MOA+9:0.12'"));

    // 1 × 0.135 → 0.14
    let message = generate(&one_item("1", "0.135", None)).unwrap();
    assert!(message.text().contains("MOA+86:0.14'"));
}

#[test]
fn fractional_tax_rate() {
    // 100 × 7.7 % = 7.7
    let message = generate(&one_item("1", "100", Some("7.7"))).unwrap();
    let text = message.text();
    assert!(text.contains("TAX+7+VAT+++7.70+S'"));
    assert!(text.contains("MOA+125:7.70'"));
}

#[test]
fn huge_amounts_overflow_cleanly() {
    let max = rust_decimal::Decimal::MAX.to_string();
    let err = generate(&one_item(&max, &max, None)).unwrap_err();
    assert!(matches!(err, InvoicError::Arithmetic(_)));
}

#[test]
fn many_items_are_numbered_sequentially() {
    let mut builder = base();
    for i in 0..25 {
        builder = builder.add_item(LineItemBuilder::new(format!("P{i}"), "Item", "1", "1").build());
    }
    let message = generate(&builder.build_unchecked()).unwrap();
    let numbers: Vec<String> = message
        .segments()
        .iter()
        .filter(|s| s.tag() == "LIN")
        .map(|s| s.elements()[0].clone())
        .collect();
    let expected: Vec<String> = (1..=25).map(|n| n.to_string()).collect();
    assert_eq!(numbers, expected);
    // UNB UNH BGM DTM 2×NAD 25×(LIN IMD QTY PRI) 3×MOA UNT
    assert_eq!(message.segment_count(), 4 + 2 + 25 * 4 + 3 + 1);
}

// --- Character set ---

#[test]
fn non_ascii_address_still_generates() {
    let rec = base()
        .add_party(
            PartyBuilder::new(PartyQualifier::Invoicee, "1")
                .street("Königstraße 1")
                .city("München")
                .build(),
        )
        .add_item(LineItemBuilder::new("ABC123", "Product A", "1", "1").build())
        .build_unchecked();
    let message = generate(&rec).unwrap();
    assert!(message.text().contains("Königstraße? 1+München"));
}

#[test]
fn non_ascii_description_rejected() {
    let rec = base()
        .add_item(LineItemBuilder::new("ABC123", "Größe L", "1", "1").build())
        .build_unchecked();
    let err = generate(&rec).unwrap_err();
    match err {
        InvoicError::Validation(e) => {
            assert_eq!(e.field, "items[0].description");
            assert_eq!(e.kind, ValidationKind::Charset);
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn empty_optional_strings_are_omitted() {
    let rec = base()
        .add_party(
            PartyBuilder::new(PartyQualifier::Invoicee, "1")
                .street("")
                .city("   ")
                .build(),
        )
        .add_item(LineItemBuilder::new("ABC123", "Product A", "1", "1").build())
        .build_unchecked();
    let message = generate(&rec).unwrap();
    assert!(message.segments().iter().any(|s| s.as_str() == "NAD+IV+1::91'"));
}
