use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::privacy::{
    EntityClassifier, IdentityToken, KnownEntityTable, NamePool, ShuffleRegistry, TextRedactor,
    UsedTokens,
};
use crate::types::{
    AnonymizeOptions, ColumnRoles, Record, Result, Table, PITCH_BASE_URL, SITE_DOMAIN,
};

/// Outcome of anonymizing a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnonymizeSummary {
    pub records: usize,
    pub identities_issued: usize,
}

/// Build the run's random source: deterministic when seeded
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Per-record anonymization driven by a column-role profile.
///
/// Owns every piece of run state: the random source, the names issued so
/// far and the shuffled column cursors. Records are processed in order.
pub struct RecordAnonymizer<R: Rng> {
    roles: ColumnRoles,
    pool: NamePool,
    used: UsedTokens,
    redactor: TextRedactor,
    shuffler: ShuffleRegistry,
    rng: R,
}

impl<R: Rng> RecordAnonymizer<R> {
    pub fn new(roles: ColumnRoles, redactor: TextRedactor, rng: R) -> Self {
        Self {
            roles,
            pool: NamePool::new(),
            used: UsedTokens::new(),
            redactor,
            shuffler: ShuffleRegistry::new(),
            rng,
        }
    }

    /// Build an anonymizer from run options, loading the known-entity table
    /// and any user overrides
    pub fn from_options(options: &AnonymizeOptions, rng: R) -> Result<Self> {
        let table = match &options.entities {
            Some(path) => KnownEntityTable::with_overrides(path)?,
            None => KnownEntityTable::builtin()?,
        };
        log::debug!("loaded {} known entities", table.len());
        let redactor = TextRedactor::new(EntityClassifier::new(table));
        Ok(Self::new(options.column_roles(), redactor, rng))
    }

    /// Names issued so far in this run
    pub fn used_tokens(&self) -> &UsedTokens {
        &self.used
    }

    /// Shuffle every configured categorical column of `table`.
    /// Absent columns are skipped.
    pub fn prepare(&mut self, table: &Table) {
        for name in &self.roles.shuffled {
            match table.column(name) {
                Some(values) => self.shuffler.register_column(name, values, &mut self.rng),
                None => log::debug!("shuffle column '{}' not present", name),
            }
        }
    }

    /// Anonymize every record of a table in place
    pub fn anonymize_table(&mut self, table: &mut Table) -> AnonymizeSummary {
        let issued_before = self.used.len();
        self.prepare(table);

        for (index, record) in table.records.iter_mut().enumerate() {
            log::debug!("anonymizing record {}", index + 1);
            self.anonymize_record(record);
        }

        let summary = AnonymizeSummary {
            records: table.len(),
            identities_issued: self.used.len() - issued_before,
        };
        log::info!(
            "anonymized {} records with {} new identities",
            summary.records,
            summary.identities_issued
        );
        summary
    }

    /// Anonymize one record in place and return the identity it now carries
    pub fn anonymize_record(&mut self, record: &mut Record) -> IdentityToken {
        let raw = record.get(&self.roles.identity).unwrap_or_default();
        let original = IdentityToken::parse(self.roles.kind, raw);
        let replacement = self
            .pool
            .issue_replacement(&original, &mut self.used, &mut self.rng);
        record.set(&self.roles.identity, replacement.display_form.clone());

        let slug = replacement.slug();
        if let Some(column) = &self.roles.website {
            record.set(column, format!("https://{}.{}", slug, SITE_DOMAIN));
        }
        if let Some(column) = &self.roles.pitch {
            record.set(column, format!("{}/{}", PITCH_BASE_URL, slug));
        }

        for column in &self.roles.text {
            let Some(text) = record.get(column).map(str::to_string) else {
                continue;
            };
            let redacted = self
                .redactor
                .redact(&text, &original, &replacement, &mut self.rng);
            record.set(column, redacted);
        }

        for column in &self.roles.shuffled {
            // Empty cells keep their place so the drawn values match the input exactly
            if record.get(column).map_or(true, str::is_empty) {
                continue;
            }
            if let Some(value) = self.shuffler.draw(column) {
                record.set(column, value);
            }
        }

        replacement
    }
}
