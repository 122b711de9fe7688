use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// The invoice record handed to the encoder.
///
/// Dates and numbers are kept as received (`YYYYMMDD` text, decimal text)
/// so that the validator can report malformed input field by field. The
/// encoder only reads the record; it never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Message reference (UNH/UNT), also the default interchange control reference.
    #[serde(default)]
    pub message_ref: String,
    /// Invoice number (BGM).
    #[serde(default)]
    pub invoice_number: String,
    /// Invoice date, `YYYYMMDD`.
    #[serde(default)]
    pub invoice_date: String,
    /// Invoice currency (CUX).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    /// Order reference (RFF+ON).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Parties in emission order. Must include a buyer and a supplier.
    #[serde(default)]
    pub parties: Vec<Party>,
    /// Line items in emission order.
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Payment terms (PAT/DTM+13).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<PaymentTerms>,
}

/// A party named in the invoice (NAD).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Party function qualifier (UNTDID 3035 subset).
    #[serde(default = "PartyQualifier::unset")]
    pub qualifier: PartyQualifier,
    /// Party identifier.
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// An invoice line (LIN group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product code, at most 35 characters.
    #[serde(default)]
    pub product_code: String,
    /// Item description, at most 70 characters.
    #[serde(default)]
    pub description: String,
    /// Invoiced quantity as decimal text.
    #[serde(default, deserialize_with = "decimal_text::required")]
    pub quantity: String,
    /// Unit price as decimal text.
    #[serde(default, deserialize_with = "decimal_text::required")]
    pub price: String,
    /// Tax rate in percent as decimal text.
    #[serde(
        default,
        deserialize_with = "decimal_text::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_rate: Option<String>,
    /// Unit of measure; `EA` (each) when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Payment terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTerms {
    /// Due date, `YYYYMMDD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Payment method; bank transfer when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
}

/// UNTDID 3035: party function code qualifiers accepted in NAD.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PartyQualifier {
    /// BY: Buyer.
    Buyer,
    /// SU: Supplier.
    Supplier,
    /// IV: Invoicee.
    Invoicee,
    /// DP: Delivery party.
    Delivery,
    /// PE: Payee.
    Payee,
    /// Any other code value. Rejected by validation.
    Other(String),
}

impl PartyQualifier {
    /// Every accepted qualifier, in code-list order.
    pub const KNOWN: [PartyQualifier; 5] = [
        Self::Buyer,
        Self::Supplier,
        Self::Invoicee,
        Self::Delivery,
        Self::Payee,
    ];

    /// UNTDID 3035 code.
    pub fn code(&self) -> &str {
        match self {
            Self::Buyer => "BY",
            Self::Supplier => "SU",
            Self::Invoicee => "IV",
            Self::Delivery => "DP",
            Self::Payee => "PE",
            Self::Other(code) => code,
        }
    }

    /// Parse a qualifier code. Surrounding whitespace and case are ignored.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_uppercase();
        match code.as_str() {
            "BY" => Self::Buyer,
            "SU" => Self::Supplier,
            "IV" => Self::Invoicee,
            "DP" => Self::Delivery,
            "PE" => Self::Payee,
            _ => Self::Other(code),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    fn unset() -> Self {
        Self::Other(String::new())
    }
}

/// Invoice currencies accepted in CUX.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cad,
    Aud,
    Chf,
    Cny,
    /// Any other code value. Rejected by validation.
    Other(String),
}

impl Currency {
    pub const KNOWN: [Currency; 8] = [
        Self::Usd,
        Self::Eur,
        Self::Gbp,
        Self::Jpy,
        Self::Cad,
        Self::Aud,
        Self::Chf,
        Self::Cny,
    ];

    /// ISO 4217 alphabetic code.
    pub fn code(&self) -> &str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
            Self::Cad => "CAD",
            Self::Aud => "AUD",
            Self::Chf => "CHF",
            Self::Cny => "CNY",
            Self::Other(code) => code,
        }
    }

    /// Parse an ISO 4217 code. Surrounding whitespace and case are ignored.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_uppercase();
        match code.as_str() {
            "USD" => Self::Usd,
            "EUR" => Self::Eur,
            "GBP" => Self::Gbp,
            "JPY" => Self::Jpy,
            "CAD" => Self::Cad,
            "AUD" => Self::Aud,
            "CHF" => Self::Chf,
            "CNY" => Self::Cny,
            _ => Self::Other(code),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

/// UNTDID 4461 subset: payment means used in PAT.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    /// 5: Bank transfer.
    #[default]
    BankTransfer,
    /// 1: Credit card.
    CreditCard,
    /// 10: Cash.
    Cash,
    /// Any other code value. Rejected by validation.
    Other(String),
}

impl PaymentMethod {
    pub const KNOWN: [PaymentMethod; 3] = [Self::BankTransfer, Self::CreditCard, Self::Cash];

    pub fn code(&self) -> &str {
        match self {
            Self::BankTransfer => "5",
            Self::CreditCard => "1",
            Self::Cash => "10",
            Self::Other(code) => code,
        }
    }

    pub fn from_code(code: &str) -> Self {
        let code = code.trim();
        match code {
            "5" => Self::BankTransfer,
            "1" => Self::CreditCard,
            "10" => Self::Cash,
            _ => Self::Other(code.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

macro_rules! code_conversions {
    ($($ty:ty),*) => {$(
        impl From<String> for $ty {
            fn from(code: String) -> Self {
                Self::from_code(&code)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.code().to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    )*};
}

code_conversions!(PartyQualifier, Currency, PaymentMethod);

/// Accept decimal fields as JSON strings or JSON numbers and keep them as text.
mod decimal_text {
    use std::fmt;

    use serde::de::{self, Visitor};

    use super::Deserializer;

    struct TextVisitor;

    impl Visitor<'_> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal number or a string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    pub fn required<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        d.deserialize_any(TextVisitor)
    }

    pub fn optional<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        struct OptionalVisitor;

        impl<'de> Visitor<'de> for OptionalVisitor {
            type Value = Option<String>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an optional decimal number or string")
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_some<D: Deserializer<'de>>(
                self,
                d: D,
            ) -> Result<Self::Value, D::Error> {
                required(d).map(Some)
            }
        }

        d.deserialize_option(OptionalVisitor)
    }
}
