use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{InvoicError, round_amount};

/// EDIFACT service characters, as advertised in the UNA segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syntax {
    /// Component data element separator, `:` by default.
    pub component_separator: char,
    /// Data element separator, `+` by default.
    pub data_separator: char,
    /// Decimal mark, `.` by default.
    pub decimal_mark: char,
    /// Release (escape) character, `?` by default.
    pub release_character: char,
    /// Segment terminator, `'` by default.
    pub segment_terminator: char,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            component_separator: ':',
            data_separator: '+',
            decimal_mark: '.',
            release_character: '?',
            segment_terminator: '\'',
        }
    }
}

impl Syntax {
    /// Check that the service characters can delimit a message unambiguously.
    pub fn validate(&self) -> Result<(), InvoicError> {
        let delimiters = [
            self.component_separator,
            self.data_separator,
            self.release_character,
            self.segment_terminator,
        ];
        for (i, c) in delimiters.iter().enumerate() {
            if c.is_alphanumeric() || c.is_whitespace() {
                return Err(InvoicError::Encoding(format!(
                    "service character {c:?} must not be a letter, digit or whitespace"
                )));
            }
            if delimiters[i + 1..].contains(c) {
                return Err(InvoicError::Encoding(format!(
                    "service character {c:?} is used twice"
                )));
            }
        }
        if !matches!(self.decimal_mark, '.' | ',') {
            return Err(InvoicError::Encoding(format!(
                "decimal mark must be '.' or ',', got {:?}",
                self.decimal_mark
            )));
        }
        if delimiters.contains(&self.decimal_mark) {
            return Err(InvoicError::Encoding(format!(
                "decimal mark {:?} is also used as a delimiter",
                self.decimal_mark
            )));
        }
        Ok(())
    }

    /// The UNA service string advice, e.g. `UNA:+.? '`.
    pub fn service_string_advice(&self) -> String {
        format!(
            "UNA{}{}{}{} {}",
            self.component_separator,
            self.data_separator,
            self.decimal_mark,
            self.release_character,
            self.segment_terminator
        )
    }

    /// Apply release-character escaping to a raw value.
    ///
    /// The release character itself is doubled, and the segment terminator,
    /// data separator, component separator and (if `escape_spaces`) spaces
    /// are prefixed with it. Apply exactly once per raw value: escaping an
    /// already escaped value escapes it again.
    ///
    /// ```
    /// use invoic::edifact::Syntax;
    ///
    /// let syntax = Syntax::default();
    /// assert_eq!(syntax.escape("A+B:C'D?", false), "A?+B?:C?'D??");
    /// assert_eq!(syntax.escape("Main Street", true), "Main? Street");
    /// ```
    pub fn escape(&self, value: &str, escape_spaces: bool) -> String {
        let mut out = String::with_capacity(value.len() + 4);
        for c in value.chars() {
            if self.needs_release(c, escape_spaces) {
                out.push(self.release_character);
            }
            out.push(c);
        }
        out
    }

    fn needs_release(&self, c: char, escape_spaces: bool) -> bool {
        c == self.release_character
            || c == self.segment_terminator
            || c == self.data_separator
            || c == self.component_separator
            || (escape_spaces && c == ' ')
    }

    /// Format a monetary amount: rounded to 2 places, configured decimal mark.
    pub fn format_amount(&self, value: Decimal) -> String {
        self.with_decimal_mark(format!("{:.2}", round_amount(value)))
    }

    /// Format a decimal as given (scale preserved), configured decimal mark.
    pub fn format_decimal(&self, value: Decimal) -> String {
        self.with_decimal_mark(value.to_string())
    }

    fn with_decimal_mark(&self, s: String) -> String {
        if self.decimal_mark == '.' {
            s
        } else {
            s.replace('.', &self.decimal_mark.to_string())
        }
    }
}
