use once_cell::sync::Lazy;
use regex::Regex;

use super::segments::SegmentedText;

/// Generic token for a redacted email address
pub const EMAIL_TOKEN: &str = "[email]";

/// Generic token for a redacted phone number
pub const PHONE_TOKEN: &str = "[phone]";

/// Generic token for a redacted website when no substitute site exists
pub const WEBSITE_TOKEN: &str = "[website]";

// Compiled patterns for contact details embedded in prose
static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s,)\]]*[^\s,)\].]").unwrap());

static WWW_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bwww\.[^\s,)\]]*[^\s,)\].]").unwrap());

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

static PAREN_PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\d{3}\)\s*\d{3}[-. ]?\d{4}\b").unwrap());

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{3}[-. ]?\d{3}[-. ]?\d{4}\b").unwrap());

/// Replace every URL and `www.` form with one canonical link.
///
/// `site` is the full substitute URL; the `www.` form gets it without
/// its scheme. `None` uses the generic website token for both.
pub fn redact_links(text: &mut SegmentedText, site: Option<&str>) -> usize {
    let full = site.unwrap_or(WEBSITE_TOKEN).to_string();
    let bare = site
        .map(strip_scheme)
        .unwrap_or(WEBSITE_TOKEN)
        .to_string();

    text.replace_all(&URL_PATTERN, |_, _| Some(full.clone()))
        + text.replace_all(&WWW_PATTERN, |_, _| Some(bare.clone()))
}

/// Replace email addresses and phone numbers with generic tokens
pub fn redact_contacts(text: &mut SegmentedText) -> usize {
    let mut count = text.replace_all(&EMAIL_PATTERN, |_, _| Some(EMAIL_TOKEN.to_string()));
    count += text.replace_all(&PAREN_PHONE_PATTERN, |_, _| Some(PHONE_TOKEN.to_string()));
    count += text.replace_all(&PHONE_PATTERN, |_, _| Some(PHONE_TOKEN.to_string()));
    count
}

fn strip_scheme(url: &str) -> &str {
    url.trim_start_matches("https://")
        .trim_start_matches("http://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(input: &str, site: Option<&str>) -> String {
        let mut text = SegmentedText::new(input);
        redact_links(&mut text, site);
        text.to_string()
    }

    fn contacts(input: &str) -> String {
        let mut text = SegmentedText::new(input);
        redact_contacts(&mut text);
        text.to_string()
    }

    #[test]
    fn test_urls_use_substitute_site() {
        let site = Some("https://nova-labs.example");
        assert_eq!(
            links("See https://acme.io/about, or www.acme.io.", site),
            "See https://nova-labs.example, or nova-labs.example."
        );
    }

    #[test]
    fn test_urls_without_site() {
        assert_eq!(
            links("Blog: http://janecarter.me (personal)", None),
            "Blog: [website] (personal)"
        );
    }

    #[test]
    fn test_email_detection() {
        assert_eq!(
            contacts("Reach jane.carter@acme.co.uk today"),
            "Reach [email] today"
        );
    }

    #[test]
    fn test_phone_detection() {
        for phone in ["555-123-4567", "5551234567", "(555) 123-4567", "555.123.4567", "555 123 4567"] {
            assert_eq!(contacts(&format!("Call {} now", phone)), "Call [phone] now", "{}", phone);
        }
    }

    #[test]
    fn test_short_numbers_untouched() {
        assert_eq!(contacts("Raised in 2019 with 12 staff"), "Raised in 2019 with 12 staff");
    }
}
