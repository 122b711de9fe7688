//! Interchange and message configuration.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::syntax::Syntax;
use crate::core::InvoicError;

/// Character repertoire declared in the interchange header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterSet {
    /// Level A: upper-case letters, digits and a few symbols.
    #[default]
    #[serde(rename = "UNOA")]
    Unoa,
    /// Level B: level A plus lower-case letters.
    #[serde(rename = "UNOB")]
    Unob,
}

impl CharacterSet {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unoa => "UNOA",
            Self::Unob => "UNOB",
        }
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CharacterSet {
    type Err = InvoicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UNOA" => Ok(Self::Unoa),
            "UNOB" => Ok(Self::Unob),
            other => Err(InvoicError::Encoding(format!(
                "unsupported character set '{other}', expected UNOA or UNOB"
            ))),
        }
    }
}

/// Configuration for INVOIC generation.
///
/// Passed to [`MessageAssembler::new`](super::MessageAssembler::new) and
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdifactConfig {
    /// Service characters and decimal mark.
    pub syntax: Syntax,
    /// Release spaces inside data values (`Main? Street`).
    pub escape_spaces: bool,
    /// Syntax identifier in UNB, e.g. `UNOC`.
    pub syntax_identifier: String,
    /// Syntax version number in UNB, e.g. `3`.
    pub syntax_version: String,
    /// Character set declared at the end of UNB.
    pub character_set: CharacterSet,
    /// Message type version, `D`.
    pub message_version: String,
    /// Message type release, `96A`.
    pub message_release: String,
    /// Controlling agency, `UN`.
    pub controlling_agency: String,
    /// Sender identification in UNB.
    pub application_ref: String,
    /// Recipient identification in UNB.
    pub recipient_id: String,
    /// Recipient code qualifier in UNB.
    pub recipient_qualifier: String,
    /// Interchange control reference; the message reference when absent.
    pub interchange_ref: Option<String>,
    /// Preparation date/time in UNB; the invoice date at 00:00 when absent.
    pub prepared_at: Option<NaiveDateTime>,
}

impl Default for EdifactConfig {
    fn default() -> Self {
        Self {
            syntax: Syntax::default(),
            escape_spaces: true,
            syntax_identifier: "UNOC".into(),
            syntax_version: "3".into(),
            character_set: CharacterSet::Unoa,
            message_version: "D".into(),
            message_release: "96A".into(),
            controlling_agency: "UN".into(),
            application_ref: "INVOIC".into(),
            recipient_id: "RECEIVER".into(),
            recipient_qualifier: "001".into(),
            interchange_ref: None,
            prepared_at: None,
        }
    }
}

/// Builder for [`EdifactConfig`].
///
/// # Example
///
/// ```
/// use invoic::edifact::{CharacterSet, EdifactConfigBuilder};
///
/// let config = EdifactConfigBuilder::new()
///     .application_ref("ERP01")
///     .character_set(CharacterSet::Unob)
///     .escape_spaces(false)
///     .build();
/// assert_eq!(config.application_ref, "ERP01");
/// ```
#[derive(Debug, Default)]
pub struct EdifactConfigBuilder {
    config: EdifactConfig,
}

impl EdifactConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service characters.
    pub fn syntax(mut self, syntax: Syntax) -> Self {
        self.config.syntax = syntax;
        self
    }

    /// Set the decimal mark (`.` or `,`).
    pub fn decimal_mark(mut self, mark: char) -> Self {
        self.config.syntax.decimal_mark = mark;
        self
    }

    pub fn escape_spaces(mut self, escape: bool) -> Self {
        self.config.escape_spaces = escape;
        self
    }

    pub fn syntax_identifier(mut self, id: impl Into<String>, version: impl Into<String>) -> Self {
        self.config.syntax_identifier = id.into();
        self.config.syntax_version = version.into();
        self
    }

    pub fn character_set(mut self, charset: CharacterSet) -> Self {
        self.config.character_set = charset;
        self
    }

    /// Set the message type version, release and controlling agency.
    pub fn message_version(
        mut self,
        version: impl Into<String>,
        release: impl Into<String>,
        agency: impl Into<String>,
    ) -> Self {
        self.config.message_version = version.into();
        self.config.message_release = release.into();
        self.config.controlling_agency = agency.into();
        self
    }

    pub fn application_ref(mut self, reference: impl Into<String>) -> Self {
        self.config.application_ref = reference.into();
        self
    }

    pub fn recipient(mut self, id: impl Into<String>, qualifier: impl Into<String>) -> Self {
        self.config.recipient_id = id.into();
        self.config.recipient_qualifier = qualifier.into();
        self
    }

    pub fn interchange_ref(mut self, reference: impl Into<String>) -> Self {
        self.config.interchange_ref = Some(reference.into());
        self
    }

    pub fn prepared_at(mut self, at: NaiveDateTime) -> Self {
        self.config.prepared_at = Some(at);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> EdifactConfig {
        self.config
    }
}
