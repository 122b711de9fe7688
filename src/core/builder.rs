use std::fmt::Display;

use super::error::InvoicError;
use super::types::*;
use super::validation;

/// Builder for constructing invoice records.
///
/// ```
/// use invoic::core::*;
/// use rust_decimal_macros::dec;
///
/// let record = InvoiceRecordBuilder::new("789123", "INV2025001", "20250322")
///     .currency(Currency::Eur)
///     .party(PartyQualifier::Buyer, "123456789")
///     .party(PartyQualifier::Supplier, "987654321")
///     .add_item(LineItemBuilder::new("ABC123", "Product A", dec!(10), dec!(25.50))
///         .tax_rate(dec!(20))
///         .build())
///     .due_date("20250422")
///     .build()
///     .unwrap();
/// assert_eq!(record.items.len(), 1);
/// ```
pub struct InvoiceRecordBuilder {
    message_ref: String,
    invoice_number: String,
    invoice_date: String,
    currency: Option<Currency>,
    reference: Option<String>,
    parties: Vec<Party>,
    items: Vec<LineItem>,
    payment_terms: Option<PaymentTerms>,
}

impl InvoiceRecordBuilder {
    /// Start a record. `invoice_date` is `YYYYMMDD`.
    pub fn new(
        message_ref: impl Into<String>,
        invoice_number: impl Into<String>,
        invoice_date: impl Into<String>,
    ) -> Self {
        Self {
            message_ref: message_ref.into(),
            invoice_number: invoice_number.into(),
            invoice_date: invoice_date.into(),
            currency: None,
            reference: None,
            parties: Vec::new(),
            items: Vec::new(),
            payment_terms: None,
        }
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Add a party with only a qualifier and an id.
    pub fn party(self, qualifier: PartyQualifier, id: impl Into<String>) -> Self {
        self.add_party(PartyBuilder::new(qualifier, id).build())
    }

    pub fn add_party(mut self, party: Party) -> Self {
        self.parties.push(party);
        self
    }

    pub fn add_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    /// Payment due date, `YYYYMMDD`.
    pub fn due_date(mut self, date: impl Into<String>) -> Self {
        self.payment_terms
            .get_or_insert_with(PaymentTerms::default)
            .due_date = Some(date.into());
        self
    }

    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_terms
            .get_or_insert_with(PaymentTerms::default)
            .method = Some(method);
        self
    }

    pub fn payment_terms(mut self, terms: PaymentTerms) -> Self {
        self.payment_terms = Some(terms);
        self
    }

    /// Build the record and run validation on it.
    pub fn build(self) -> Result<InvoiceRecord, InvoicError> {
        let record = self.build_unchecked();
        validation::validate(&record)?;
        Ok(record)
    }

    /// Build without validation, for testing rejection paths or
    /// importing external data that is validated at encode time anyway.
    pub fn build_unchecked(self) -> InvoiceRecord {
        InvoiceRecord {
            message_ref: self.message_ref,
            invoice_number: self.invoice_number,
            invoice_date: self.invoice_date,
            currency: self.currency,
            reference: self.reference,
            parties: self.parties,
            items: self.items,
            payment_terms: self.payment_terms,
        }
    }
}

/// Builder for [`Party`].
pub struct PartyBuilder {
    qualifier: PartyQualifier,
    id: String,
    name: Option<String>,
    street: Option<String>,
    city: Option<String>,
    country: Option<String>,
}

impl PartyBuilder {
    pub fn new(qualifier: PartyQualifier, id: impl Into<String>) -> Self {
        Self {
            qualifier,
            id: id.into(),
            name: None,
            street: None,
            city: None,
            country: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// ISO 3166-1 alpha-2 code, e.g. "US".
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn build(self) -> Party {
        Party {
            qualifier: self.qualifier,
            id: self.id,
            name: self.name,
            street: self.street,
            city: self.city,
            country: self.country,
        }
    }
}

/// Builder for [`LineItem`].
///
/// Amounts accept anything that prints as a decimal: `dec!(25.50)`, `"25.50"`, `10`.
pub struct LineItemBuilder {
    product_code: String,
    description: String,
    quantity: String,
    price: String,
    tax_rate: Option<String>,
    unit: Option<String>,
}

impl LineItemBuilder {
    pub fn new(
        product_code: impl Into<String>,
        description: impl Into<String>,
        quantity: impl Display,
        price: impl Display,
    ) -> Self {
        Self {
            product_code: product_code.into(),
            description: description.into(),
            quantity: quantity.to_string(),
            price: price.to_string(),
            tax_rate: None,
            unit: None,
        }
    }

    /// Tax rate in percent.
    pub fn tax_rate(mut self, rate: impl Display) -> Self {
        self.tax_rate = Some(rate.to_string());
        self
    }

    /// Unit of measure (UN/ECE Rec 20), e.g. "PCE".
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn build(self) -> LineItem {
        LineItem {
            product_code: self.product_code,
            description: self.description,
            quantity: self.quantity,
            price: self.price,
            tax_rate: self.tax_rate,
            unit: self.unit,
        }
    }
}
