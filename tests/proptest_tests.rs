//! Property-based tests for validation, escaping and assembly.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "edifact")]

use invoic::core::*;
use invoic::edifact::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Undo release-character escaping.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '?' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000, 0u32..4).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

fn line_item() -> impl Strategy<Value = LineItem> {
    (
        "[A-Z0-9]{1,35}",
        "[A-Za-z0-9]{1,10}( [A-Za-z0-9]{1,10}){0,3}",
        amount(),
        amount(),
        prop::option::of((0i64..3000, 0u32..2).prop_map(|(m, s)| Decimal::new(m, s))),
        prop::option::of("[A-Z]{2,3}"),
    )
        .prop_map(|(code, description, quantity, price, rate, unit)| {
            let mut item = LineItemBuilder::new(code, description, quantity, price);
            if let Some(rate) = rate {
                item = item.tax_rate(rate);
            }
            if let Some(unit) = unit {
                item = item.unit(unit);
            }
            item.build()
        })
}

fn free_text() -> impl Strategy<Value = String> {
    "[ -~]{0,40}"
}

fn record() -> impl Strategy<Value = InvoiceRecord> {
    (
        "[A-Z0-9]{1,14}",
        free_text(),
        prop::collection::vec(line_item(), 1..8),
        free_text(),
        free_text(),
        any::<bool>(),
    )
        .prop_map(|(message_ref, invoice_number, items, street, city, with_terms)| {
            let invoice_number = format!("N{invoice_number}");
            let mut builder = InvoiceRecordBuilder::new(message_ref, invoice_number, "20250322")
                .add_party(
                    PartyBuilder::new(PartyQualifier::Buyer, "123456789")
                        .street(street)
                        .city(city)
                        .build(),
                )
                .party(PartyQualifier::Supplier, "987654321");
            for item in items {
                builder = builder.add_item(item);
            }
            if with_terms {
                builder = builder.due_date("20250422");
            }
            builder.build_unchecked()
        })
}

fn assemble(record: &InvoiceRecord) -> EncodedMessage {
    MessageAssembler::new(EdifactConfig::default())
        .unwrap()
        .assemble(record)
        .unwrap()
}

fn moa(message: &EncodedMessage, qualifier: &str) -> Decimal {
    let prefix = format!("{qualifier}:");
    message
        .segments()
        .iter()
        .filter(|s| s.tag() == "MOA")
        .find_map(|s| s.elements()[0].strip_prefix(prefix.as_str()).map(str::to_string))
        .unwrap()
        .parse()
        .unwrap()
}

proptest! {
    #[test]
    fn escape_leaves_no_bare_delimiter(value in any::<String>(), spaces in any::<bool>()) {
        let escaped = Syntax::default().escape(&value, spaces);
        let mut released = false;
        for c in escaped.chars() {
            if released {
                released = false;
            } else if c == '?' {
                released = true;
            } else {
                prop_assert!(!matches!(c, '+' | ':' | '\''));
                prop_assert!(!(spaces && c == ' '));
            }
        }
        prop_assert!(!released);
        prop_assert_eq!(unescape(&escaped), value);
    }

    #[test]
    fn valid_records_assemble(rec in record()) {
        prop_assert!(validate(&rec).is_ok());
        let message = assemble(&rec);
        let segments = message.segments();
        prop_assert_eq!(segments.first().map(Segment::tag), Some("UNB"));
        prop_assert_eq!(segments.last().map(Segment::tag), Some("UNZ"));
        prop_assert_eq!(
            segments.iter().filter(|s| s.tag() == "LIN").count(),
            rec.items.len()
        );
    }

    #[test]
    fn trailer_count_is_self_consistent(rec in record()) {
        let message = assemble(&rec);
        let segments = message.segments();
        let unt = segments.iter().position(|s| s.tag() == "UNT").unwrap();
        let declared: usize = segments[unt].elements()[0].parse().unwrap();
        prop_assert_eq!(declared, unt + 1);
        // UNZ is the only segment after UNT
        prop_assert_eq!(segments.len(), unt + 2);
    }

    #[test]
    fn totals_add_up_to_a_cent(rec in record()) {
        let message = assemble(&rec);
        let before = moa(&message, "86");
        let tax = moa(&message, "176");
        let grand = moa(&message, "9");
        prop_assert!((before + tax - grand).abs() <= dec!(0.01));

        let checked = check(&rec).unwrap();
        let totals = calculate_totals(&checked.lines).unwrap();
        let exact = totals.grand_total().unwrap();
        prop_assert_eq!(exact, totals.total_before_tax + totals.total_tax);
        prop_assert_eq!(round_amount(exact), grand);
    }

    #[test]
    fn regeneration_is_identical(rec in record()) {
        let first = assemble(&rec);
        let second = assemble(&rec);
        prop_assert_eq!(first.text(), second.text());
    }

    #[test]
    fn missing_buyer_always_fails(mut rec in record()) {
        rec.parties.retain(|p| p.qualifier != PartyQualifier::Buyer);
        let err = validate(&rec).unwrap_err();
        prop_assert_eq!(err.kind, ValidationKind::MissingParty);
    }

    #[test]
    fn negative_quantity_always_fails(mut rec in record(), idx in any::<prop::sample::Index>(), q in 1i64..1000) {
        let i = idx.index(rec.items.len());
        rec.items[i].quantity = format!("-{q}");
        let err = validate(&rec).unwrap_err();
        prop_assert_eq!(err.field, format!("items[{i}].quantity"));
        prop_assert_eq!(err.kind, ValidationKind::Negative);
    }

    #[test]
    fn non_numeric_price_always_fails(mut rec in record(), junk in "[a-z]{1,8}") {
        rec.items[0].price = junk;
        let err = validate(&rec).unwrap_err();
        prop_assert_eq!(err.field, "items[0].price");
        prop_assert_eq!(err.kind, ValidationKind::Format);
    }
}
