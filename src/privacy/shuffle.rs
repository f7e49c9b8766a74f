use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

/// A permuted copy of one column's values, drawn front to back.
///
/// The values drawn over a full pass are exactly the values prepared, so the
/// column's frequency distribution survives while the row linkage does not.
#[derive(Debug, Clone, Default)]
pub struct ShuffledColumn {
    values: Vec<String>,
    cursor: usize,
}

impl ShuffledColumn {
    /// Copy the non-empty values and permute them uniformly
    pub fn prepare<I, S, R>(values: I, rng: &mut R) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let mut values: Vec<String> = values
            .into_iter()
            .filter(|v| !v.as_ref().is_empty())
            .map(|v| v.as_ref().to_string())
            .collect();
        values.shuffle(rng);
        Self { values, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values not yet drawn
    pub fn remaining(&self) -> usize {
        self.values.len() - self.cursor
    }
}

impl Iterator for ShuffledColumn {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let value = self.values.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

/// Shuffled columns keyed by column name
#[derive(Debug, Clone, Default)]
pub struct ShuffleRegistry {
    columns: HashMap<String, ShuffledColumn>,
}

impl ShuffleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a column for reassignment. Empty columns are not registered.
    pub fn register_column<I, S, R>(&mut self, name: &str, values: I, rng: &mut R)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let column = ShuffledColumn::prepare(values, rng);
        if column.is_empty() {
            log::debug!("column '{}' has no values to shuffle", name);
            return;
        }
        log::debug!("shuffling {} values of column '{}'", column.len(), name);
        self.columns.insert(name.to_string(), column);
    }

    /// Check if a column is registered
    pub fn is_shuffled(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Draw the next reassigned value for a column
    pub fn draw(&mut self, name: &str) -> Option<String> {
        self.columns.get_mut(name).and_then(Iterator::next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn counts<'a>(values: impl IntoIterator<Item = &'a str>) -> HashMap<&'a str, usize> {
        let mut counts = HashMap::new();
        for v in values {
            *counts.entry(v).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_shuffle_preserves_multiset() {
        let mut rng = StdRng::seed_from_u64(99);
        let input = ["A", "A", "B"];
        let drawn: Vec<String> = ShuffledColumn::prepare(input, &mut rng).collect();

        assert_eq!(drawn.len(), 3);
        assert_eq!(
            counts(drawn.iter().map(String::as_str)),
            counts(input.iter().copied())
        );
    }

    #[test]
    fn test_large_column_multiset() {
        let mut rng = StdRng::seed_from_u64(4);
        let input: Vec<String> = (0..500).map(|i| format!("v{}", i % 7)).collect();
        let drawn: Vec<String> = ShuffledColumn::prepare(&input, &mut rng).collect();

        assert_eq!(
            counts(drawn.iter().map(String::as_str)),
            counts(input.iter().map(String::as_str))
        );
    }

    #[test]
    fn test_cursor_exhausts_after_len_draws() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut column = ShuffledColumn::prepare(["x", "", "y"], &mut rng);
        assert_eq!(column.len(), 2);
        assert!(column.next().is_some());
        assert!(column.next().is_some());
        assert_eq!(column.remaining(), 0);
        assert_eq!(column.next(), None);
    }

    #[test]
    fn test_registry() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut registry = ShuffleRegistry::new();
        registry.register_column("Stage", ["Seed", "Seed"], &mut rng);
        registry.register_column("Location", Vec::<String>::new(), &mut rng);

        assert!(registry.is_shuffled("Stage"));
        assert!(!registry.is_shuffled("Location"));
        assert_eq!(registry.draw("Stage"), Some("Seed".to_string()));
        assert_eq!(registry.draw("Stage"), Some("Seed".to_string()));
        assert_eq!(registry.draw("Stage"), None);
        assert_eq!(registry.draw("Location"), None);
    }
}
