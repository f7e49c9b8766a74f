use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::Error;
use crate::types::Result;

use super::classifier::OrgKind;

/// Built-in table of real organizations
const BUILTIN_TABLE: &str = include_str!("../../data/known_entities.json");

/// Read-only mapping from organization name (case-folded) to its category
#[derive(Debug, Clone)]
pub struct KnownEntityTable {
    entries: HashMap<String, OrgKind>,
    pattern: Option<Regex>,
}

impl KnownEntityTable {
    /// Load the built-in table
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TABLE)
    }

    /// Parse a table of the form `{"Technology Company": ["Google", ...], ...}`
    pub fn from_json(json: &str) -> Result<Self> {
        let mut table = Self {
            entries: HashMap::new(),
            pattern: None,
        };
        table.merge_json(json)?;
        Ok(table)
    }

    /// Load the built-in table and merge a user table over it
    pub fn with_overrides(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let mut table = Self::builtin()?;
        let json = fs::read_to_string(path)?;
        table.merge_json(&json)?;
        log::debug!(
            "merged known-entity overrides from {} ({} entries total)",
            path.display(),
            table.len()
        );
        Ok(table)
    }

    fn merge_json(&mut self, json: &str) -> Result<()> {
        let groups: BTreeMap<OrgKind, Vec<String>> = serde_json::from_str(json)?;
        for (kind, names) in groups {
            for name in names {
                let key = name.trim().to_lowercase();
                if key.is_empty() {
                    continue;
                }
                self.entries.insert(key, kind);
            }
        }
        self.pattern = self.build_pattern()?;
        Ok(())
    }

    /// Compile one alternation over every name, longest first so that
    /// "Bank of America" wins over any shorter overlapping entry
    fn build_pattern(&self) -> Result<Option<Regex>> {
        if self.entries.is_empty() {
            return Ok(None);
        }
        let mut names: Vec<&String> = self.entries.keys().collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = names
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))
            .map_err(|e| Error::InvalidInput(format!("known-entity table: {}", e)))?;
        Ok(Some(pattern))
    }

    /// Look up a surface form, ignoring case
    pub fn lookup(&self, surface: &str) -> Option<OrgKind> {
        self.entries.get(&surface.trim().to_lowercase()).copied()
    }

    /// Whole-word, case-insensitive matcher over every table entry
    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
