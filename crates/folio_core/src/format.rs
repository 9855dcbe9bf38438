//! Output document formats.

use serde::{Deserialize, Serialize};

/// A compiled document format.
///
/// # Examples
///
/// ```
/// use folio_core::OutputFormat;
/// use strum::IntoEnumIterator;
///
/// let all: Vec<_> = OutputFormat::iter().collect();
/// assert_eq!(all, vec![OutputFormat::Docx, OutputFormat::Pdf, OutputFormat::Txt]);
/// assert_eq!(OutputFormat::Pdf.extension(), "pdf");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    /// Word-processor document (Office Open XML)
    Docx,
    /// Paginated print document
    Pdf,
    /// Plain text
    Txt,
}

impl OutputFormat {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Txt => "txt",
        }
    }

    /// MIME type of the rendered bytes.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Txt => "text/plain; charset=utf-8",
        }
    }
}
