//! Document formats whose tags live in embedded metadata

use std::collections::HashMap;
use std::fmt;

/// Key/value metadata read from a document
pub type Metadata = HashMap<String, String>;

/// Document formats whose tags come from an embedded keyword field
/// instead of the file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// DjVu documents, read with `djvused -e print-meta`
    Djvu,
    /// PDF documents, read with `pdftk dump_data`
    Pdf,
}

impl DocumentFormat {
    /// Detect the format from a file name's suffix.
    ///
    /// The suffix is everything after the last `.` and is compared
    /// case-sensitively, so `scan.DJVU` is not a DjVu document.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match suffix(name)? {
            "djvu" => Some(Self::Djvu),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Metadata field that holds the comma-separated tag list
    #[must_use]
    pub const fn keyword_field(self) -> &'static str {
        match self {
            Self::Djvu => "keywords",
            Self::Pdf => "Keywords",
        }
    }

    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Djvu => "djvu",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Substring after the last `.` of `name`, if there is one
#[must_use]
pub fn suffix(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, suffix)| suffix)
}
