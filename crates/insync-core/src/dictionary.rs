//! Attendance code dictionary
//!
//! Maps the short codes typed into the monthly tracker (`S`, `V-H`, `H`, ...)
//! to the leave labels shown in the calendar view. Lookups ignore case and
//! surrounding whitespace.
//!
//! A dictionary can be extended or replaced from a TOML file:
//!
//! ```toml
//! inherit = true
//!
//! [codes]
//! "W-H" = "Work From Home Half day"
//! ```
//!
//! ```rust
//! use insync_core::CodeDictionary;
//!
//! let codes = CodeDictionary::from_toml_str(r#"
//! inherit = false
//! [codes]
//! x = "Leave: Unpaid"
//! "#).unwrap();
//!
//! assert_eq!(codes.len(), 1);
//! assert_eq!(codes.lookup("X"), Some("Leave: Unpaid"));
//! assert_eq!(codes.lookup("S"), None);
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Built-in attendance codes of the monthly tracker.
///
/// The highlight rules of the Excel output key on the `ILL`, `V01` and
/// `Work From Home` substrings of these labels.
pub const STANDARD_CODES: [(&str, &str); 16] = [
    ("S", "Leave: ILL"),
    ("S-H", "Leave: ILL Half day"),
    ("V", "Leave: V01"),
    ("V-H", "Leave: V01 Half day"),
    ("C", "Leave: Caregiver Leave"),
    ("C-H", "Leave: Caregiver Half day"),
    ("B", "Leave: Bereavement Leave"),
    ("L-O", "Leave: Others"),
    ("L", "Leave: LOA"),
    ("RH", "Holiday: RH"),
    ("H-WGF", "Holiday: WGF"),
    ("H-C", "Holiday: Office Closed"),
    ("T-I", "Others: Induction"),
    ("T-B", "Others- Training (BCN Academy/ Global)"),
    ("T", "Others: Training"),
    ("H", "Work From Home"),
];

/// Canonical form of a code: trimmed and upper-cased
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Code dictionary error
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("Failed to read code dictionary {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid code dictionary: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Empty attendance code mapped to '{0}'")]
    EmptyCode(String),

    #[error("Attendance code '{0}' has an empty label")]
    EmptyLabel(String),
}

/// On-disk shape of a dictionary file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DictionaryFile {
    #[serde(default = "default_inherit")]
    inherit: bool,
    #[serde(default)]
    codes: BTreeMap<String, String>,
}

fn default_inherit() -> bool {
    true
}

/// Mapping from normalized attendance code to leave label
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeDictionary {
    entries: BTreeMap<String, String>,
}

impl CodeDictionary {
    /// A dictionary with no codes
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in tracker codes
    pub fn standard() -> Self {
        STANDARD_CODES
            .iter()
            .fold(Self::empty(), |dict, (code, label)| dict.with(*code, *label))
    }

    /// Add a code, returning the label it replaced (if any)
    pub fn insert(&mut self, code: &str, label: impl Into<String>) -> Option<String> {
        self.entries.insert(normalize_code(code), label.into())
    }

    /// Builder-style insert
    pub fn with(mut self, code: &str, label: impl Into<String>) -> Self {
        self.insert(code, label);
        self
    }

    /// Label for `code`, ignoring case and surrounding whitespace
    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.entries.get(&normalize_code(code)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(code, label)` pairs ordered by code
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(c, l)| (c.as_str(), l.as_str()))
    }

    /// Parse a TOML dictionary file body
    pub fn from_toml_str(input: &str) -> Result<Self, DictionaryError> {
        let file: DictionaryFile = toml::from_str(input)?;
        let mut dict = if file.inherit {
            Self::standard()
        } else {
            Self::empty()
        };

        for (code, label) in file.codes {
            if normalize_code(&code).is_empty() {
                return Err(DictionaryError::EmptyCode(label));
            }
            if label.trim().is_empty() {
                return Err(DictionaryError::EmptyLabel(code));
            }
            dict.insert(&code, label);
        }

        Ok(dict)
    }

    /// Load a TOML dictionary file
    pub fn load(path: &Path) -> Result<Self, DictionaryError> {
        let content = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
