use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::entities::KnownEntityTable;
use super::lexicon::{
    is_common_acronym, is_excluded_word, is_phrase_stopword, is_professional_abbreviation,
};

/// Kind of organization a surface form refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrgKind {
    #[serde(rename = "Technology Company")]
    Technology,
    #[serde(rename = "Financial Institution")]
    Financial,
    #[serde(rename = "Consulting Firm")]
    Consulting,
    #[serde(rename = "Insurance Company")]
    Insurance,
    #[serde(rename = "University")]
    University,
    #[serde(rename = "Investment Network")]
    InvestmentNetwork,
}

impl OrgKind {
    pub fn label(self) -> &'static str {
        match self {
            OrgKind::Technology => "Technology Company",
            OrgKind::Financial => "Financial Institution",
            OrgKind::Consulting => "Consulting Firm",
            OrgKind::Insurance => "Insurance Company",
            OrgKind::University => "University",
            OrgKind::InvestmentNetwork => "Investment Network",
        }
    }
}

/// Redaction category of a surface form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Organization(OrgKind),
    Person,
    Product,
}

impl Category {
    /// Bracketed placeholder substituted for the entity
    pub fn placeholder(self) -> String {
        format!("[{}]", self.label())
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Organization(kind) => kind.label(),
            Category::Person => "Person",
            Category::Product => "Product",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified span of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMatch {
    pub start: usize,
    pub end: usize,
    pub surface_form: String,
    pub category: Category,
}

impl EntityMatch {
    pub fn new(start: usize, surface_form: &str, category: Category) -> Self {
        Self {
            start,
            end: start + surface_form.len(),
            surface_form: surface_form.to_string(),
            category,
        }
    }
}

static CAMEL_CASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-z]+[A-Z]").unwrap());

static MIXED_CAPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-z]*[A-Z]").unwrap());

static ALL_CAPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3,}$").unwrap());

static CAPITALIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-z]+$").unwrap());

static PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Z][a-z]+\s+){1,4}(?:[A-Z][a-z]+|[A-Z]{2,})$").unwrap()
});

/// Substring cues for multi-word phrases, checked in order
const PHRASE_CUES: &[(&[&str], OrgKind)] = &[
    (&["university", "college", "school", "institute"], OrgKind::University),
    (
        &["bank", "financial", "capital", "ventures", "partners", "investment", "fund", "equity"],
        OrgKind::Financial,
    ),
    (&["consulting", "advisors", "advisory"], OrgKind::Consulting),
    (&["insurance", "life"], OrgKind::Insurance),
];

/// Minimum length of a stand-alone capitalized word treated as a proper noun
const MIN_PROPER_NOUN_LEN: usize = 4;

/// Rule-based entity classifier.
///
/// Layers are evaluated in a fixed order and each returns a definite
/// category or `None`:
///
/// 1. exact lookup in the known-entity table
/// 2. token shape (CamelCase, all-caps acronyms)
/// 3. multi-word capitalized phrases, classified by substring cues
/// 4. stand-alone capitalized words outside the exclusion lexicon
///
/// Short tokens, numerals and lowercase-initial tokens never reach layers 2-4.
#[derive(Debug, Clone)]
pub struct EntityClassifier {
    table: KnownEntityTable,
}

impl EntityClassifier {
    pub fn new(table: KnownEntityTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &KnownEntityTable {
        &self.table
    }

    /// Classify a surface form through every layer
    pub fn classify(&self, surface: &str) -> Option<Category> {
        let surface = surface.trim();
        if let Some(category) = self.known_entity(surface) {
            return Some(category);
        }
        if surface.split_whitespace().nth(1).is_some() {
            return self.phrase(surface);
        }
        self.shape(surface).or_else(|| self.proper_noun(surface))
    }

    /// Layer 1: known-entity table
    pub fn known_entity(&self, surface: &str) -> Option<Category> {
        self.table.lookup(surface).map(Category::Organization)
    }

    /// Layer 2: CamelCase or all-caps token
    pub fn shape(&self, token: &str) -> Option<Category> {
        if is_ineligible(token) {
            return None;
        }
        if CAMEL_CASE.is_match(token) {
            if is_professional_abbreviation(token) || is_common_acronym(token) {
                return None;
            }
            return Some(Category::Organization(OrgKind::Technology));
        }
        if ALL_CAPS.is_match(token) && !is_common_acronym(token) {
            return Some(Category::Organization(OrgKind::Technology));
        }
        None
    }

    /// Layer 2 continued: multi-word capitalized phrase
    pub fn phrase(&self, phrase: &str) -> Option<Category> {
        if !PHRASE.is_match(phrase) {
            return None;
        }
        let lower = phrase.to_lowercase();
        let words: Vec<&str> = lower.split_whitespace().collect();
        let (first, last) = (words.first()?, words.last()?);
        if is_phrase_stopword(first) || is_phrase_stopword(last) {
            return None;
        }

        for (cues, kind) in PHRASE_CUES {
            if cues.iter().any(|cue| lower.contains(cue)) {
                return Some(Category::Organization(*kind));
            }
        }
        if lower.contains("angel") && lower.contains("network") {
            return Some(Category::Organization(OrgKind::InvestmentNetwork));
        }
        Some(Category::Organization(OrgKind::Technology))
    }

    /// Layer 3: stand-alone capitalized word
    pub fn proper_noun(&self, word: &str) -> Option<Category> {
        if is_ineligible(word) || is_common_acronym(word) || is_excluded_word(word) {
            return None;
        }
        if MIXED_CAPS.is_match(word) {
            return Some(Category::Product);
        }
        if CAPITALIZED.is_match(word) && word.chars().count() >= MIN_PROPER_NOUN_LEN {
            return Some(Category::Product);
        }
        None
    }
}

/// Layer 4: tokens that are never entities
fn is_ineligible(token: &str) -> bool {
    if token.chars().count() <= 2 {
        return true;
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    !token.chars().next().is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> EntityClassifier {
        EntityClassifier::new(KnownEntityTable::builtin().unwrap())
    }

    #[test]
    fn test_known_entity_any_case() {
        let c = classifier();
        let tech = Some(Category::Organization(OrgKind::Technology));
        assert_eq!(c.classify("Google"), tech);
        assert_eq!(c.classify("GOOGLE"), tech);
        assert_eq!(
            c.classify("Goldman Sachs"),
            Some(Category::Organization(OrgKind::Financial))
        );
    }

    #[test]
    fn test_short_known_entity_still_resolves() {
        assert_eq!(
            classifier().classify("EY"),
            Some(Category::Organization(OrgKind::Consulting))
        );
    }

    #[test]
    fn test_camel_case() {
        let c = classifier();
        assert_eq!(
            c.classify("DataViz"),
            Some(Category::Organization(OrgKind::Technology))
        );
        assert_eq!(c.classify("PhD"), None);
        assert_eq!(c.classify("SaaS"), None);
    }

    #[test]
    fn test_acronyms() {
        let c = classifier();
        assert_eq!(
            c.classify("ACME"),
            Some(Category::Organization(OrgKind::Technology))
        );
        for acronym in ["API", "CEO", "AI", "IoT", "SBIR"] {
            assert_eq!(c.classify(acronym), None, "{} should be left alone", acronym);
        }
    }

    #[test]
    fn test_phrase_cues() {
        let c = classifier();
        let cases = [
            ("Rice University", OrgKind::University),
            ("Silverline Capital Partners", OrgKind::Financial),
            ("Summit Advisory Group", OrgKind::Consulting),
            ("Lone Star Life", OrgKind::Insurance),
            ("Central Texas Angel Network", OrgKind::InvestmentNetwork),
            ("Blue Ocean Robotics", OrgKind::Technology),
        ];
        for (phrase, kind) in cases {
            assert_eq!(
                c.classify(phrase),
                Some(Category::Organization(kind)),
                "{}",
                phrase
            );
        }
    }

    #[test]
    fn test_phrase_with_function_word_edges() {
        let c = classifier();
        assert_eq!(c.phrase("The Company"), None);
        assert_eq!(c.phrase("Ventures And"), None);
        assert_eq!(c.phrase("lowercase words here"), None);
    }

    #[test]
    fn test_phrase_of_excluded_words_still_classified() {
        assert_eq!(
            classifier().phrase("United States"),
            Some(Category::Organization(OrgKind::Technology))
        );
    }

    #[test]
    fn test_proper_noun() {
        let c = classifier();
        assert_eq!(c.classify("Brightly"), Some(Category::Product));
        assert_eq!(c.classify("HRTech"), None);
        assert_eq!(c.classify("ORVis"), Some(Category::Product));
        assert_eq!(c.classify("However"), None);
        assert_eq!(c.classify("Customers"), None);
        assert_eq!(c.classify("March"), None);
        assert_eq!(c.classify("Zed"), None);
    }

    #[test]
    fn test_ineligible_tokens() {
        let c = classifier();
        assert_eq!(c.classify("Qx"), None);
        assert_eq!(c.classify("2024"), None);
        assert_eq!(c.classify("brightly"), None);
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            Category::Organization(OrgKind::University).placeholder(),
            "[University]"
        );
        assert_eq!(Category::Product.placeholder(), "[Product]");
        assert_eq!(
            Category::Organization(OrgKind::InvestmentNetwork).to_string(),
            "Investment Network"
        );
    }
}
