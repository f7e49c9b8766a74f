use std::collections::HashSet;

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::MAX_NAME_ATTEMPTS;

use super::lexicon::HONORIFICS;

/// Name pools by region: (region, first names, last names)
const PERSON_POOLS: &[(&str, &[&str], &[&str])] = &[
    (
        "us",
        &["Michael", "Jennifer", "Robert", "Sarah", "David", "Lisa", "James", "Emily", "John", "Amanda"],
        &["Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Martinez", "Rodriguez"],
    ),
    (
        "mexico",
        &["Carlos", "María", "José", "Gabriela", "Luis", "Ana", "Miguel", "Sofía", "Diego", "Isabella"],
        &["García", "Rodríguez", "Martínez", "López", "González", "Hernández", "Pérez", "Sánchez", "Ramírez", "Torres"],
    ),
    (
        "china",
        &["Wei", "Li", "Ming", "Yan", "Chen", "Hua", "Jun", "Xin", "Jian", "Mei"],
        &["Wang", "Li", "Zhang", "Liu", "Chen", "Yang", "Huang", "Zhao", "Wu", "Zhou"],
    ),
    (
        "india",
        &["Raj", "Priya", "Amit", "Anjali", "Arjun", "Kavya", "Rohan", "Neha", "Vikram", "Sanya"],
        &["Sharma", "Patel", "Singh", "Kumar", "Reddy", "Gupta", "Mehta", "Rao", "Iyer", "Nair"],
    ),
];

const COMPANY_PREFIXES: &[&str] = &[
    "Quantum", "Stellar", "Nexus", "Apex", "Vertex", "Synergy", "Fusion", "Pinnacle", "Nova",
    "Zenith", "Prime", "Atlas", "Titan", "Phoenix", "Orion", "Echo", "Pulse", "Spark", "Flux",
    "Prism", "Vortex", "Ember", "Horizon", "Catalyst", "Lumina", "Cipher", "Matrix", "Vector",
    "Helix", "Nexum", "Axiom", "Zenon",
];

const COMPANY_SUFFIXES: &[&str] = &[
    "Tech", "Labs", "Systems", "Solutions", "Dynamics", "Works", "Innovations", "Digital",
    "Analytics", "Networks", "Platform", "Data", "Cloud", "AI", "Robotics", "Energy", "Medical",
    "Health", "Finance", "Security", "Vision", "Media", "Logic", "Flow", "Core", "Hub", "Link",
    "Wave", "Pulse", "Sync",
];

const STANDALONE_COMPANY_NAMES: &[&str] = &[
    "Brightpath", "Clearview", "Swiftline", "Truepoint", "Mindshift", "Skyward", "Groundwork",
    "Firefly", "Blueprint", "Keystone", "Milestone", "Touchstone", "Cornerstone", "Redwood",
    "Bluestream", "Greenfield", "Whitespace", "Blackstone", "Silverlake", "Goldmine", "Irongate",
    "Steelbridge", "Copperleaf", "Platinum",
];

/// Gender-neutral first names used for people mentioned in passing
pub const MENTION_FIRST_NAMES: &[&str] = &[
    "Alex", "Jordan", "Taylor", "Morgan", "Casey", "Riley", "Drew", "Quinn", "Blake", "Parker",
];

/// Last names used for people mentioned in passing
pub const MENTION_LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Davis", "Miller", "Wilson", "Moore", "Taylor",
    "Anderson",
];

/// Trailing corporate form: optional comma, suffix, optional period
static LEGAL_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i),?\s*\b(inc\.?|llc\.?|ltd\.?|corp\.?|co\.?|gmbh|plc)\s*$").unwrap()
});

/// Legal suffixes anywhere in a name, for slugs
static ANY_LEGAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:inc|llc|ltd|corp|co|gmbh|plc)\b\.?").unwrap());

static SLUG_INVALID: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
static SLUG_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SLUG_HYPHENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// Whether a name belongs to a person or an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityKind {
    Person,
    Organization,
}

/// Given and family name components
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameParts {
    pub first: Option<String>,
    pub last: Option<String>,
}

/// A real or generated name for the subject of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityToken {
    pub kind: IdentityKind,
    /// Full name as shown, honorific and legal suffix included
    pub display_form: String,
    pub parts: NameParts,
    pub honorific: Option<String>,
    pub legal_suffix: Option<String>,
}

impl IdentityToken {
    /// Parse a person's name from a source record, e.g. "Dr. Jane Carter"
    pub fn person(raw: &str) -> Self {
        let raw = raw.trim();
        let (honorific, rest) = split_honorific(raw);
        let words: Vec<&str> = rest.split_whitespace().collect();
        let parts = match words.as_slice() {
            [] => NameParts::default(),
            [only] => NameParts {
                first: Some(only.to_string()),
                last: None,
            },
            [first, rest @ ..] => NameParts {
                first: Some(first.to_string()),
                last: Some(rest.join(" ")),
            },
        };
        Self {
            kind: IdentityKind::Person,
            display_form: raw.to_string(),
            parts,
            honorific: honorific.map(str::to_string),
            legal_suffix: None,
        }
    }

    /// Parse an organization's name from a source record, e.g. "Acme Widgets, Inc."
    pub fn organization(raw: &str) -> Self {
        let raw = raw.trim();
        Self {
            kind: IdentityKind::Organization,
            display_form: raw.to_string(),
            parts: NameParts::default(),
            honorific: None,
            legal_suffix: legal_suffix(raw).map(str::to_string),
        }
    }

    pub fn parse(kind: IdentityKind, raw: &str) -> Self {
        match kind {
            IdentityKind::Person => Self::person(raw),
            IdentityKind::Organization => Self::organization(raw),
        }
    }

    /// The name without honorific or legal suffix
    pub fn base_name(&self) -> &str {
        match self.kind {
            IdentityKind::Person => split_honorific(&self.display_form).1,
            IdentityKind::Organization => strip_legal_suffix(&self.display_form),
        }
    }

    /// Uppercase initials of the base name; digits are kept as written
    pub fn initials(&self) -> String {
        initials(self.base_name())
    }

    /// URL slug of the name, legal suffix removed
    pub fn slug(&self) -> String {
        slug(&self.display_form)
    }

    pub fn is_empty(&self) -> bool {
        self.display_form.is_empty()
    }
}

/// Base names issued during one run.
///
/// Created at batch start and dropped at batch end; every name handed out
/// by [`NamePool`] is recorded here first.
#[derive(Debug, Clone, Default)]
pub struct UsedTokens {
    names: HashSet<String>,
}

impl UsedTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Record a name, returning `false` if it was already issued
    pub fn insert(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Generator of unique pseudonymous names
#[derive(Debug, Clone)]
pub struct NamePool {
    max_attempts: usize,
}

impl Default for NamePool {
    fn default() -> Self {
        Self {
            max_attempts: MAX_NAME_ATTEMPTS,
        }
    }
}

impl NamePool {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn with_max_attempts(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Issue a fresh name of the given kind that is not yet in `used`
    pub fn issue<R: Rng + ?Sized>(
        &self,
        kind: IdentityKind,
        used: &mut UsedTokens,
        rng: &mut R,
    ) -> IdentityToken {
        for _ in 0..self.max_attempts {
            let candidate = match kind {
                IdentityKind::Person => draw_person(rng),
                IdentityKind::Organization => draw_company(rng),
            };
            let Some((name, parts)) = candidate else { break };
            if used.insert(&name) {
                return IdentityToken {
                    kind,
                    display_form: name,
                    parts,
                    honorific: None,
                    legal_suffix: None,
                };
            }
        }

        let label = match kind {
            IdentityKind::Person => "Person",
            IdentityKind::Organization => "Company",
        };
        let fallback = format!("{} {}", label, used.len() + 1);
        log::warn!(
            "name pool exhausted after {} attempts; using '{}'",
            self.max_attempts,
            fallback
        );
        used.insert(&fallback);
        let parts = match kind {
            IdentityKind::Person => NameParts {
                first: Some(fallback.clone()),
                last: None,
            },
            IdentityKind::Organization => NameParts::default(),
        };
        IdentityToken {
            kind,
            display_form: fallback,
            parts,
            honorific: None,
            legal_suffix: None,
        }
    }

    /// Issue a substitute for an original identity, keeping its honorific
    /// or legal suffix
    pub fn issue_replacement<R: Rng + ?Sized>(
        &self,
        original: &IdentityToken,
        used: &mut UsedTokens,
        rng: &mut R,
    ) -> IdentityToken {
        let mut token = self.issue(original.kind, used, rng);
        if let Some(honorific) = &original.honorific {
            token.display_form = format!("{} {}", honorific, token.display_form);
            token.honorific = Some(honorific.clone());
        }
        if let Some(suffix) = &original.legal_suffix {
            token.display_form = format!("{}, {}", token.display_form, suffix);
            token.legal_suffix = Some(suffix.clone());
        }
        token
    }
}

fn draw_person<R: Rng + ?Sized>(rng: &mut R) -> Option<(String, NameParts)> {
    let (_, firsts, lasts) = PERSON_POOLS.choose(rng)?;
    let first = firsts.choose(rng)?;
    let last = lasts.choose(rng)?;
    let parts = NameParts {
        first: Some(first.to_string()),
        last: Some(last.to_string()),
    };
    Some((format!("{} {}", first, last), parts))
}

fn draw_company<R: Rng + ?Sized>(rng: &mut R) -> Option<(String, NameParts)> {
    let name = if rng.gen_bool(0.5) {
        format!(
            "{} {}",
            COMPANY_PREFIXES.choose(rng)?,
            COMPANY_SUFFIXES.choose(rng)?
        )
    } else {
        STANDALONE_COMPANY_NAMES.choose(rng)?.to_string()
    };
    Some((name, NameParts::default()))
}

/// Split a leading honorific from a name
pub fn split_honorific(name: &str) -> (Option<&'static str>, &str) {
    let name = name.trim();
    for honorific in HONORIFICS {
        if let Some(rest) = name.strip_prefix(honorific) {
            return (Some(*honorific), rest.trim());
        }
    }
    (None, name)
}

/// Trailing legal suffix of an organization name, as written
pub fn legal_suffix(name: &str) -> Option<&str> {
    LEGAL_SUFFIX
        .captures(name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Organization name without its trailing legal suffix
pub fn strip_legal_suffix(name: &str) -> &str {
    match LEGAL_SUFFIX.find(name) {
        Some(m) => name[..m.start()].trim_end_matches([',', ' ']),
        None => name.trim(),
    }
}

/// Uppercase initials of each word; words starting with a digit keep the digit
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Convert a name to a URL slug: lowercase, hyphen-separated, no legal suffix
pub fn slug(name: &str) -> String {
    let without_suffix = ANY_LEGAL_SUFFIX.replace_all(name, "");
    let lower = without_suffix.to_lowercase();
    let cleaned = SLUG_INVALID.replace_all(&lower, "");
    let hyphenated = SLUG_SPACES.replace_all(&cleaned, "-");
    let collapsed = SLUG_HYPHENS.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}
