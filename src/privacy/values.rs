//! Randomization of values embedded in prose.
//!
//! Amounts are jittered within a bounded multiplicative factor, years move
//! inside a plausible window and funding rounds step at most one rung along
//! the funding ladder. Anything that fails to parse is left as written.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::{Captures, Regex};

use super::segments::SegmentedText;

/// Bounds of the multiplicative jitter applied to amounts
pub const AMOUNT_FACTOR_MIN: f64 = 0.67;
pub const AMOUNT_FACTOR_MAX: f64 = 1.33;

/// Years outside this range are never touched
pub const YEAR_CLASS_MIN: i32 = 2000;
pub const YEAR_CLASS_MAX: i32 = 2025;

/// Randomized years never leave this window
pub const YEAR_WINDOW_MIN: i32 = 2010;
pub const YEAR_WINDOW_MAX: i32 = 2025;

/// Maximum distance between an original year and its replacement
pub const YEAR_SPREAD: i32 = 5;

/// Financing stages in order
pub const FUNDING_LADDER: &[&str] = &["Angel", "Pre-Seed", "Seed", "Series A", "Series B", "Series C"];

static AMOUNT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\$([0-9](?:[0-9,]*[0-9])?(?:\.[0-9]+)?)(?:\s*(trillion|billion|million|thousand|[kmbt])\b)?",
    )
    .unwrap()
});

static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b20\d{2}\b").unwrap());

static ROUND_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:Angel|Pre-Seed|Seed|Series [A-Z])\b").unwrap());

/// Magnitude suffix of an amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountUnit {
    None,
    Thousand,
    Million,
    Billion,
    Trillion,
}

impl AmountUnit {
    pub fn parse(suffix: &str) -> Option<Self> {
        match suffix.to_lowercase().as_str() {
            "" => Some(AmountUnit::None),
            "k" | "thousand" => Some(AmountUnit::Thousand),
            "m" | "million" => Some(AmountUnit::Million),
            "b" | "billion" => Some(AmountUnit::Billion),
            "t" | "trillion" => Some(AmountUnit::Trillion),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            AmountUnit::None => 1.0,
            AmountUnit::Thousand => 1e3,
            AmountUnit::Million => 1e6,
            AmountUnit::Billion => 1e9,
            AmountUnit::Trillion => 1e12,
        }
    }
}

/// A dollar amount parsed from text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountExpression {
    pub numeric_value: f64,
    pub unit: AmountUnit,
}

impl AmountExpression {
    /// Parse the number and suffix of a `$` amount. Commas are ignored.
    pub fn parse(number: &str, suffix: &str) -> Option<Self> {
        let numeric_value: f64 = number.replace(',', "").parse().ok()?;
        if !numeric_value.is_finite() {
            return None;
        }
        let unit = AmountUnit::parse(suffix)?;
        Some(Self {
            numeric_value,
            unit,
        })
    }

    /// Value in plain dollars
    pub fn base_value(&self) -> f64 {
        self.numeric_value * self.unit.multiplier()
    }

    /// Render with the largest suffix the magnitude clears
    pub fn render(value: f64) -> String {
        const SCALES: &[(f64, &str)] = &[(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];
        for (threshold, suffix) in SCALES {
            if value >= *threshold {
                return format!("${:.1}{}", value / threshold, suffix);
            }
        }
        format!("${:.0}", value)
    }
}

/// Apply amount, year and funding-round randomization to a plain string
pub fn randomize_values<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let mut segmented = SegmentedText::new(text);
    randomize_segments(&mut segmented, rng);
    segmented.to_string()
}

/// Apply every value randomization to the open segments of a text
pub fn randomize_segments<R: Rng + ?Sized>(text: &mut SegmentedText, rng: &mut R) -> usize {
    let amounts = text.replace_all(&AMOUNT_PATTERN, |caps, _| jitter_amount(caps, &mut *rng));
    let years = text.replace_all(&YEAR_PATTERN, |caps, _| {
        let year: i32 = caps[0].parse().ok()?;
        perturb_year(year, &mut *rng).map(|y| y.to_string())
    });
    let rounds = text.replace_all(&ROUND_PATTERN, |caps, _| shift_round(&caps[0], &mut *rng));
    log::trace!(
        "randomized {} amounts, {} years, {} funding rounds",
        amounts,
        years,
        rounds
    );
    amounts + years + rounds
}

fn jitter_amount<R: Rng + ?Sized>(caps: &Captures<'_>, rng: &mut R) -> Option<String> {
    let suffix = caps.get(2).map_or("", |m| m.as_str());
    let Some(amount) = AmountExpression::parse(&caps[1], suffix) else {
        log::trace!("leaving malformed amount '{}' unchanged", &caps[0]);
        return None;
    };
    let factor = rng.gen_range(AMOUNT_FACTOR_MIN..=AMOUNT_FACTOR_MAX);
    Some(AmountExpression::render(amount.base_value() * factor))
}

/// Move a plausible year up to five years within the allowed window.
/// Returns `None` for years outside the randomized class.
pub fn perturb_year<R: Rng + ?Sized>(year: i32, rng: &mut R) -> Option<i32> {
    if !(YEAR_CLASS_MIN..=YEAR_CLASS_MAX).contains(&year) {
        return None;
    }
    let mut low = YEAR_WINDOW_MIN.max(year - YEAR_SPREAD);
    let mut high = YEAR_WINDOW_MAX.min(year + YEAR_SPREAD);
    if low > high {
        std::mem::swap(&mut low, &mut high);
    }
    Some(rng.gen_range(low..=high))
}

/// Step a funding round at most one rung along the ladder
pub fn shift_round<R: Rng + ?Sized>(round: &str, rng: &mut R) -> Option<String> {
    let index = FUNDING_LADDER
        .iter()
        .position(|r| r.eq_ignore_ascii_case(round))?;
    let offset: i32 = rng.gen_range(-1..=1);
    let shifted = (index as i32 + offset).clamp(0, FUNDING_LADDER.len() as i32 - 1) as usize;
    let replacement = FUNDING_LADDER[shifted];

    if round.starts_with(|c: char| c.is_lowercase()) {
        Some(replacement.to_lowercase())
    } else {
        Some(replacement.to_string())
    }
}
