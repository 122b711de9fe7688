//! Persisting an assembled interchange.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::message::EncodedMessage;
use crate::core::InvoicError;

/// Byte encoding used when writing the message text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1.
    Latin1,
    Ascii,
}

impl TextEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Latin1 => "ISO-8859-1",
            Self::Ascii => "ASCII",
        }
    }

    /// Encode `text`, failing on the first character outside the repertoire.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, InvoicError> {
        let limit = match self {
            Self::Utf8 => return Ok(text.as_bytes().to_vec()),
            Self::Latin1 => 0xFF,
            Self::Ascii => 0x7F,
        };
        text.char_indices()
            .map(|(offset, ch)| {
                u8::try_from(u32::from(ch))
                    .ok()
                    .filter(|b| u32::from(*b) <= limit)
                    .ok_or(InvoicError::Charset {
                        ch,
                        offset,
                        encoding: self.label(),
                    })
            })
            .collect()
    }
}

/// Options for [`write_message`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Replace an existing file instead of failing.
    pub overwrite: bool,
    pub encoding: TextEncoding,
}

/// Write the message text to `path`.
///
/// Fails with [`InvoicError::OutputExists`] if the file exists and
/// `overwrite` is not set. The message itself stays usable on failure.
pub fn write_message(
    message: &EncodedMessage,
    path: impl AsRef<Path>,
    options: &WriteOptions,
) -> Result<(), InvoicError> {
    let path = path.as_ref();
    let bytes = options.encoding.encode(message.text())?;

    let mut open = OpenOptions::new();
    open.write(true);
    if options.overwrite {
        open.create(true).truncate(true);
    } else {
        open.create_new(true);
    }

    let io_error = |source: std::io::Error| InvoicError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = open.open(path).map_err(|e| {
        if e.kind() == ErrorKind::AlreadyExists {
            InvoicError::OutputExists(path.to_path_buf())
        } else {
            io_error(e)
        }
    })?;
    file.write_all(&bytes).map_err(io_error)?;
    file.flush().map_err(io_error)?;

    tracing::info!(
        path = %path.display(),
        encoding = options.encoding.label(),
        bytes = bytes.len(),
        "INVOIC message written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_accepts_umlauts() {
        assert_eq!(TextEncoding::Latin1.encode("Müller").unwrap(), b"M\xfcller");
    }

    #[test]
    fn ascii_rejects_umlauts_with_offset() {
        let err = TextEncoding::Ascii.encode("Müller").unwrap_err();
        match err {
            InvoicError::Charset { ch, offset, .. } => {
                assert_eq!(ch, 'ü');
                assert_eq!(offset, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn latin1_rejects_euro_sign() {
        assert!(TextEncoding::Latin1.encode("5 €").is_err());
    }

    #[test]
    fn utf8_is_passthrough() {
        assert_eq!(TextEncoding::Utf8.encode("€").unwrap(), "€".as_bytes());
    }
}
