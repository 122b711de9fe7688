//! Line and invoice totals with exact decimal arithmetic.
//!
//! Amounts are accumulated at full precision and only rounded when they are
//! rendered. Summing the rounded per-line tax amounts can therefore differ
//! from the rounded invoice tax total by a cent or so on inputs with
//! fractional cents; the invoice total is the authoritative figure.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::error::InvoicError;
use super::validation::ValidatedLine;

/// Amounts for one line item, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    /// `price × quantity`.
    pub line_total: Decimal,
    /// `line_total × tax_rate / 100`, present only when the rate is above zero.
    pub tax_amount: Option<Decimal>,
}

/// Invoice-level totals, unrounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceTotals {
    /// Sum of all line totals.
    pub total_before_tax: Decimal,
    /// Sum of all line tax amounts.
    pub total_tax: Decimal,
    /// Per-line amounts, same order as the items.
    pub lines: Vec<LineAmounts>,
}

impl InvoiceTotals {
    /// `total_before_tax + total_tax`.
    pub fn grand_total(&self) -> Result<Decimal, InvoicError> {
        self.total_before_tax
            .checked_add(self.total_tax)
            .ok_or_else(|| overflow("grand total"))
    }
}

/// Compute the amounts for a single line.
pub fn line_amounts(
    quantity: Decimal,
    price: Decimal,
    tax_rate: Option<Decimal>,
) -> Result<LineAmounts, InvoicError> {
    let line_total = price
        .checked_mul(quantity)
        .ok_or_else(|| overflow("line total"))?;

    let tax_amount = match tax_rate {
        Some(rate) if rate > Decimal::ZERO => Some(
            line_total
                .checked_mul(rate)
                .and_then(|v| v.checked_div(dec!(100)))
                .ok_or_else(|| overflow("tax amount"))?,
        ),
        _ => None,
    };

    Ok(LineAmounts {
        line_total,
        tax_amount,
    })
}

/// Compute line and invoice totals for validated lines.
pub fn calculate_totals(lines: &[ValidatedLine<'_>]) -> Result<InvoiceTotals, InvoicError> {
    let mut total_before_tax = Decimal::ZERO;
    let mut total_tax = Decimal::ZERO;
    let mut amounts = Vec::with_capacity(lines.len());

    for line in lines {
        let la = line_amounts(line.quantity, line.price, line.tax_rate)?;
        total_before_tax = total_before_tax
            .checked_add(la.line_total)
            .ok_or_else(|| overflow("total before tax"))?;
        if let Some(tax) = la.tax_amount {
            total_tax = total_tax
                .checked_add(tax)
                .ok_or_else(|| overflow("total tax"))?;
        }
        amounts.push(la);
    }

    let totals = InvoiceTotals {
        total_before_tax,
        total_tax,
        lines: amounts,
    };
    totals.grand_total()?;
    Ok(totals)
}

/// Round to 2 decimal places, ties to the even cent.
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

fn overflow(what: &str) -> InvoicError {
    InvoicError::Arithmetic(format!("{what} exceeds the decimal range"))
}
