use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::privacy::IdentityKind;

/// Attempts at drawing an unused name before falling back to a numbered one
pub const MAX_NAME_ATTEMPTS: usize = 1000;

/// Base URL for regenerated pitch-deck links
pub const PITCH_BASE_URL: &str = "https://pitch.vc/companies";

/// Top-level domain used for regenerated company websites
pub const SITE_DOMAIN: &str = "example";

/// One row of a table: ordered (field name, value) pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrite an existing field. Unknown fields are ignored so the
    /// column layout never changes.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        match self.fields.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => {
                *v = value;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }
}

/// A delimited file loaded in memory: header plus records in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            records: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the header width
    pub fn push_row<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = values.into_iter().map(Into::into);
        let fields = self
            .headers
            .iter()
            .map(|h| (h.clone(), values.next().unwrap_or_default()))
            .collect();
        self.records.push(Record::new(fields));
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// All values of one column, or `None` if the column is absent
    pub fn column(&self, name: &str) -> Option<Vec<String>> {
        if !self.has_column(name) {
            return None;
        }
        Some(
            self.records
                .iter()
                .map(|r| r.get(name).unwrap_or_default().to_string())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Tsv,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "tsv" | "tab" => Some(FileFormat::Tsv),
            _ => None,
        }
    }

    pub fn delimiter(self) -> u8 {
        match self {
            FileFormat::Csv => b',',
            FileFormat::Tsv => b'\t',
        }
    }
}

/// Built-in column layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// People with a biography: `Full Name`, `Bio`
    Mentors,
    /// Companies with a description and categorical attributes
    Portfolio,
}

/// Which columns play which part in anonymization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoles {
    /// Column holding the subject's own name
    pub identity: String,

    /// Whether the subject is a person or an organization
    pub kind: IdentityKind,

    /// Free-text columns rewritten by the redactor
    pub text: Vec<String>,

    /// Categorical columns reassigned across records
    pub shuffled: Vec<String>,

    /// Column overwritten with the regenerated website
    pub website: Option<String>,

    /// Column overwritten with the regenerated pitch link
    pub pitch: Option<String>,
}

impl ColumnRoles {
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Mentors => Self {
                identity: "Full Name".to_string(),
                kind: IdentityKind::Person,
                text: vec!["Bio".to_string()],
                shuffled: Vec::new(),
                website: None,
                pitch: None,
            },
            Profile::Portfolio => Self {
                identity: "Name".to_string(),
                kind: IdentityKind::Organization,
                text: vec!["Description".to_string()],
                shuffled: vec![
                    "Location".to_string(),
                    "Stage".to_string(),
                    "Sales Model".to_string(),
                ],
                website: Some("Website".to_string()),
                pitch: Some("Pitch".to_string()),
            },
        }
    }
}

/// Options for an anonymization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizeOptions {
    /// Column layout
    pub profile: Profile,

    /// Override for the free-text columns of the profile
    pub text_columns: Option<Vec<String>>,

    /// Override for the shuffled columns of the profile
    pub shuffle_columns: Option<Vec<String>>,

    /// Seed for a reproducible run
    pub seed: Option<u64>,

    /// Extra known-entity table merged over the built-in one
    pub entities: Option<PathBuf>,
}

impl AnonymizeOptions {
    pub fn column_roles(&self) -> ColumnRoles {
        let mut roles = ColumnRoles::for_profile(self.profile);
        if let Some(text) = &self.text_columns {
            roles.text = text.clone();
        }
        if let Some(shuffled) = &self.shuffle_columns {
            roles.shuffled = shuffled.clone();
        }
        roles
    }
}

impl Default for AnonymizeOptions {
    fn default() -> Self {
        Self {
            profile: Profile::Mentors,
            text_columns: None,
            shuffle_columns: None,
            seed: None,
            entities: None,
        }
    }
}

/// Result type for the application
pub type Result<T> = std::result::Result<T, crate::error::Error>;
