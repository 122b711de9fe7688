//! INVOIC message assembly.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use super::config::{CharacterSet, EdifactConfig};
use super::segment::{Segment, SegmentBuilder};
use super::syntax::Syntax;
use crate::core::{
    InvoicError, InvoiceRecord, MAX_ADDRESS_LINE_LENGTH, MAX_CITY_LENGTH, MAX_NAME_LENGTH, Party,
    ValidatedInvoice, ValidatedLine, calculate_totals, check, sanitize,
};

/// Emission stages of one interchange, in wire order.
///
/// Optional stages are skipped when their field is absent; a stage never
/// follows one that comes after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Unstarted,
    InterchangeHeader,
    MessageHeader,
    BeginningOfMessage,
    Date,
    Currency,
    Reference,
    Parties,
    Items,
    Totals,
    PaymentTerms,
    Trailer,
    Complete,
}

struct Assembly {
    stage: Stage,
    segments: Vec<Segment>,
}

impl Assembly {
    fn new(capacity: usize) -> Self {
        Self {
            stage: Stage::Unstarted,
            segments: Vec::with_capacity(capacity),
        }
    }

    fn enter(&mut self, next: Stage) -> Result<(), InvoicError> {
        if next <= self.stage {
            return Err(InvoicError::Encoding(format!(
                "stage {next:?} cannot follow {:?}",
                self.stage
            )));
        }
        tracing::trace!(stage = ?next, "entering stage");
        self.stage = next;
        Ok(())
    }

    fn push(&mut self, segment: Segment) {
        tracing::debug!(segment = segment.tag(), "segment added");
        self.segments.push(segment);
    }
}

/// A complete interchange: UNA advice plus the UNB..UNZ segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMessage {
    service_string_advice: String,
    segments: Vec<Segment>,
    text: String,
}

impl EncodedMessage {
    fn new(service_string_advice: String, segments: Vec<Segment>) -> Self {
        let mut text = String::with_capacity(
            service_string_advice.len()
                + 1
                + segments.iter().map(|s| s.as_str().len() + 1).sum::<usize>(),
        );
        text.push_str(&service_string_advice);
        text.push('\n');
        for segment in &segments {
            text.push_str(segment.as_str());
            text.push('\n');
        }
        Self {
            service_string_advice,
            segments,
            text,
        }
    }

    /// The UNA line, e.g. `UNA:+.? '`.
    pub fn service_string_advice(&self) -> &str {
        &self.service_string_advice
    }

    /// Segments from UNB to UNZ.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First segment with the given tag.
    pub fn segment(&self, tag: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.tag() == tag)
    }

    /// Number of segments from UNB through UNT inclusive, as declared in UNT.
    pub fn segment_count(&self) -> usize {
        self.segments
            .iter()
            .position(|s| s.tag() == "UNT")
            .map_or(0, |i| i + 1)
    }

    /// The full message text, one segment per line.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for EncodedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Builds INVOIC interchanges from invoice records.
///
/// The configuration is fixed at construction. [`assemble`](Self::assemble)
/// validates the record first; nothing is emitted for an invalid record.
///
/// ```
/// use invoic::core::*;
/// use invoic::edifact::{EdifactConfig, MessageAssembler};
///
/// let record = InvoiceRecordBuilder::new("789123", "INV2025001", "20250322")
///     .party(PartyQualifier::Buyer, "123456789")
///     .party(PartyQualifier::Supplier, "987654321")
///     .add_item(LineItemBuilder::new("ABC123", "Product A", "10", "25.50").tax_rate("20").build())
///     .build()
///     .unwrap();
///
/// let assembler = MessageAssembler::new(EdifactConfig::default()).unwrap();
/// let message = assembler.assemble(&record).unwrap();
/// assert!(message.text().contains("MOA+9:306.00'"));
/// ```
#[derive(Debug, Clone)]
pub struct MessageAssembler {
    config: EdifactConfig,
    builder: SegmentBuilder,
}

impl MessageAssembler {
    /// Create an assembler. Fails if the configured service characters clash.
    pub fn new(config: EdifactConfig) -> Result<Self, InvoicError> {
        config.syntax.validate()?;
        let builder = SegmentBuilder::new(config.syntax, config.escape_spaces);
        Ok(Self { config, builder })
    }

    pub fn config(&self) -> &EdifactConfig {
        &self.config
    }

    /// Validate `record` and assemble the complete interchange.
    pub fn assemble(&self, record: &InvoiceRecord) -> Result<EncodedMessage, InvoicError> {
        let invoice = check(record)?;
        tracing::info!(
            invoice = %record.invoice_number.trim(),
            items = invoice.lines.len(),
            "generating INVOIC message"
        );

        let b = &self.builder;
        let message_ref = self.escape_text(&record.message_ref);
        let control_ref = self.escape_text(
            self.config
                .interchange_ref
                .as_deref()
                .unwrap_or(record.message_ref.as_str()),
        );
        let (total_before_tax, total_tax, item_segments) = self.process_items(&invoice.lines)?;
        let grand_total = total_before_tax
            .checked_add(total_tax)
            .ok_or_else(|| InvoicError::Arithmetic("grand total exceeds the decimal range".into()))?;

        let mut asm = Assembly::new(item_segments.len() + record.parties.len() + 12);

        asm.enter(Stage::InterchangeHeader)?;
        asm.push(self.interchange_header(&invoice, &control_ref));

        asm.enter(Stage::MessageHeader)?;
        let message_type = b.composite([
            "INVOIC".to_string(),
            b.escape(&self.config.message_version),
            b.escape(&self.config.message_release),
            b.escape(&self.config.controlling_agency),
            self.config.character_set.code().to_string(),
        ]);
        asm.push(b.build("UNH", [message_ref.clone(), message_type]));

        asm.enter(Stage::BeginningOfMessage)?;
        asm.push(b.build(
            "BGM",
            [
                "380".to_string(),
                self.escape_text(&record.invoice_number),
                "9".to_string(),
            ],
        ));

        asm.enter(Stage::Date)?;
        asm.push(self.date_segment("137", invoice.invoice_date));

        if let Some(currency) = &record.currency {
            asm.enter(Stage::Currency)?;
            let code = b.escape(currency.code());
            asm.push(b.build("CUX", [b.composite(["2", code.as_str(), "9"])]));
        }

        if let Some(reference) = &record.reference {
            asm.enter(Stage::Reference)?;
            let reference = self.escape_text(reference);
            asm.push(b.build("RFF", [b.composite(["ON", reference.as_str()])]));
        }

        asm.enter(Stage::Parties)?;
        for party in &record.parties {
            asm.push(self.party_segment(party));
        }

        asm.enter(Stage::Items)?;
        for segment in item_segments {
            asm.push(segment);
        }

        asm.enter(Stage::Totals)?;
        for (qualifier, amount) in [
            ("86", total_before_tax),
            ("176", total_tax),
            ("9", grand_total),
        ] {
            asm.push(self.amount_segment(qualifier, amount));
        }

        // PAT and DTM+13 go out as a pair, only with a due date
        if let (Some(terms), Some(due)) = (&record.payment_terms, invoice.due_date) {
            asm.enter(Stage::PaymentTerms)?;
            let method = terms.method.clone().unwrap_or_default();
            asm.push(b.build(
                "PAT",
                ["1".to_string(), String::new(), b.escape(method.code())],
            ));
            asm.push(self.date_segment("13", due));
        }

        asm.enter(Stage::Trailer)?;
        // UNB through UNT inclusive
        let count = asm.segments.len() + 1;
        asm.push(b.build("UNT", [count.to_string(), message_ref]));
        asm.push(b.build("UNZ", ["1".to_string(), control_ref]));
        asm.enter(Stage::Complete)?;

        let message = EncodedMessage::new(self.config.syntax.service_string_advice(), asm.segments);
        verify(&message, &self.config.syntax)?;

        if self.config.character_set == CharacterSet::Unoa && !message.text().is_ascii() {
            tracing::warn!(
                charset = %self.config.character_set,
                "message contains non-ASCII characters outside the declared character set"
            );
        }
        tracing::info!(
            segments = message.segment_count(),
            bytes = message.text().len(),
            "INVOIC message generated"
        );
        Ok(message)
    }

    /// Build the per-item segment groups and return them with the unrounded
    /// invoice totals `(total_before_tax, total_tax, segments)`.
    ///
    /// Each group is LIN, IMD, QTY, PRI and, for a tax rate above zero, TAX
    /// and MOA+125. Amounts are rounded only when rendered.
    pub fn process_items(
        &self,
        lines: &[ValidatedLine<'_>],
    ) -> Result<(Decimal, Decimal, Vec<Segment>), InvoicError> {
        let totals = calculate_totals(lines)?;
        let b = &self.builder;
        let syntax = b.syntax();
        let mut segments = Vec::with_capacity(lines.len() * 6);

        for (i, (line, amounts)) in lines.iter().zip(&totals.lines).enumerate() {
            let code = b.escape(&line.product_code);
            let description = b.escape(&line.description);
            let unit = b.escape(&line.unit);
            let quantity = syntax.format_decimal(line.quantity);
            let price = syntax.format_amount(line.price);

            segments.push(b.build(
                "LIN",
                [
                    (i + 1).to_string(),
                    String::new(),
                    b.composite([code.as_str(), "EN"]),
                ],
            ));
            segments.push(b.build(
                "IMD",
                [
                    "F".to_string(),
                    String::new(),
                    b.composite(["", "", "", description.as_str()]),
                ],
            ));
            segments.push(b.build(
                "QTY",
                [b.composite(["47", quantity.as_str(), unit.as_str()])],
            ));
            segments.push(b.build(
                "PRI",
                [b.composite(["AAA", price.as_str(), unit.as_str()])],
            ));

            if let (Some(rate), Some(tax)) = (line.tax_rate, amounts.tax_amount) {
                let rate = syntax.format_amount(rate);
                segments.push(b.build(
                    "TAX",
                    [
                        "7".to_string(),
                        "VAT".to_string(),
                        String::new(),
                        String::new(),
                        rate,
                        "S".to_string(),
                    ],
                ));
                segments.push(self.amount_segment("125", tax));
            }
        }

        Ok((totals.total_before_tax, totals.total_tax, segments))
    }

    fn interchange_header(&self, invoice: &ValidatedInvoice<'_>, control_ref: &str) -> Segment {
        let b = &self.builder;
        let c = &self.config;
        let prepared = c
            .prepared_at
            .unwrap_or_else(|| invoice.invoice_date.and_time(NaiveTime::MIN));

        b.build(
            "UNB",
            [
                b.composite([b.escape(&c.syntax_identifier), b.escape(&c.syntax_version)]),
                b.composite([b.escape(&c.application_ref), control_ref.to_string()]),
                b.composite([b.escape(&c.recipient_id), b.escape(&c.recipient_qualifier)]),
                b.composite([
                    prepared.format("%y%m%d").to_string(),
                    prepared.format("%H%M").to_string(),
                ]),
                control_ref.to_string(),
                b.composite(["1", c.character_set.code()]),
            ],
        )
    }

    fn party_segment(&self, party: &Party) -> Segment {
        let b = &self.builder;
        let id = self.escape_text(&party.id);
        let text = |value: &Option<String>, max: usize| {
            value
                .as_deref()
                .map(|v| b.escape(&sanitize(v, false, Some(max))))
                .unwrap_or_default()
        };

        let mut elements = vec![
            b.escape(party.qualifier.code()),
            b.composite([id.as_str(), "", "91"]),
            String::new(),
            text(&party.name, MAX_NAME_LENGTH),
            text(&party.street, MAX_ADDRESS_LINE_LENGTH),
            text(&party.city, MAX_CITY_LENGTH),
            String::new(),
            String::new(),
            party
                .country
                .as_deref()
                .map(|c| b.escape(&sanitize(c, true, None)))
                .unwrap_or_default(),
        ];
        while elements.last().is_some_and(String::is_empty) {
            elements.pop();
        }
        b.build("NAD", elements)
    }

    fn date_segment(&self, qualifier: &str, date: NaiveDate) -> Segment {
        let date = date.format("%Y%m%d").to_string();
        let b = &self.builder;
        b.build("DTM", [b.composite([qualifier, date.as_str(), "102"])])
    }

    fn amount_segment(&self, qualifier: &str, amount: Decimal) -> Segment {
        let amount = self.builder.syntax().format_amount(amount);
        let b = &self.builder;
        b.build("MOA", [b.composite([qualifier, amount.as_str()])])
    }

    fn escape_text(&self, raw: &str) -> String {
        self.builder.escape(&sanitize(raw, false, None))
    }
}

/// Validate `record` and render it with `config` in one step.
pub fn to_invoic(record: &InvoiceRecord, config: &EdifactConfig) -> Result<String, InvoicError> {
    let message = MessageAssembler::new(config.clone())?.assemble(record)?;
    Ok(message.into_text())
}

fn verify(message: &EncodedMessage, syntax: &Syntax) -> Result<(), InvoicError> {
    let segments = message.segments();
    match (segments.first(), segments.last()) {
        (Some(first), Some(last)) if first.tag() == "UNB" && last.tag() == "UNZ" => {}
        _ => return Err(encoding("interchange must start with UNB and end with UNZ")),
    }

    let count = message.segment_count();
    let declared = segments
        .get(count.wrapping_sub(1))
        .and_then(|unt| unt.elements().first())
        .and_then(|n| n.parse::<usize>().ok());
    if count == 0 || declared != Some(count) {
        return Err(encoding(format!(
            "UNT declares {declared:?} segments but {count} were emitted"
        )));
    }

    segments.iter().try_for_each(|s| check_terminated(s, syntax))
}

/// The terminator may only appear released, except as the final character.
fn check_terminated(segment: &Segment, syntax: &Syntax) -> Result<(), InvoicError> {
    let body = segment
        .as_str()
        .strip_suffix(syntax.segment_terminator)
        .ok_or_else(|| encoding(format!("{} is not terminated", segment.tag())))?;

    let mut released = false;
    for c in body.chars() {
        if released {
            released = false;
        } else if c == syntax.release_character {
            released = true;
        } else if c == syntax.segment_terminator {
            return Err(encoding(format!(
                "unreleased segment terminator inside {}",
                segment.tag()
            )));
        }
    }
    if released {
        return Err(encoding(format!(
            "{} ends with a dangling release character",
            segment.tag()
        )));
    }
    Ok(())
}

fn encoding(message: impl Into<String>) -> InvoicError {
    InvoicError::Encoding(message.into())
}
