use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Professional abbreviations that look like CamelCase but are never entities
const PROFESSIONAL_ABBREVIATIONS: &[&str] = &["PhD", "MBA", "CTO", "CEO", "CFO"];

/// Generic business and tech acronyms left untouched (exact case)
const COMMON_ACRONYMS: &[&str] = &[
    // ===== ROLES =====
    "CEO", "CFO", "CTO", "COO", "CMO", "CIO", "CPO", "VP", "SVP", "EVP",
    // ===== DEGREES & CREDENTIALS =====
    "MBA", "PhD", "CPA", "CFA", "JD", "MD", "RN", "BS", "BA", "MS", "MA", "ASA", "MAAA",
    // ===== PLACES =====
    "USA", "US", "NYC", "UK", "EU",
    // ===== TECHNOLOGY =====
    "IT", "AI", "ML", "API", "SDK", "AWS", "GCP", "SaaS", "PaaS", "IaaS", "BI", "SEO", "SEM",
    "SQL", "NoSQL", "IoT", "VR", "AR", "XR", "CRM", "ERP", "CMS", "HVAC", "AVs", "GPS", "LLM",
    // ===== BUSINESS =====
    "B2B", "B2C", "B2G", "R&D", "M&A", "HR", "PR", "STEM", "AUM", "MAU", "FTE", "KPI", "ROI",
    "HRTech", "InsurTech", "AgTech", "FinTech", "EdTech", "MedTech", "CleanTech", "PropTech",
    // ===== GOVERNMENT PROGRAMS =====
    "SBIR", "STTR", "NSF", "CBM", "DEC",
    // ===== LEGAL FORMS =====
    "LLC", "PLC", "LLP",
];

/// Function words that disqualify a capitalized phrase at either end
const PHRASE_STOPWORDS: &[&str] = &[
    "the", "a", "an", "in", "on", "at", "to", "for", "of", "and", "or", "but",
];

/// Capitalized words that are never redacted on their own (compared lowercase)
const EXCLUDED_WORDS: &[&str] = &[
    // ===== FUNCTION WORDS =====
    "a", "an", "the", "in", "on", "at", "to", "for", "of", "and", "or", "but", "as", "by",
    "with", "from", "about", "into", "through", "during", "before", "after", "above", "below",
    "up", "down", "out", "off", "over", "under", "again", "further", "then", "once", "here",
    "there", "when", "where", "why", "how", "all", "both", "each", "few", "more", "most",
    "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too",
    "very", "can", "will", "just", "should", "now", "also", "many", "much", "every", "while",
    // ===== PRONOUNS & DETERMINERS =====
    "our", "we", "they", "he", "she", "it", "i", "you", "your", "their", "his", "her", "its",
    "my", "this", "that", "these", "those", "what", "which", "who", "whom", "them", "ours",
    // ===== ROLES =====
    "director", "manager", "president", "chief", "senior", "junior", "lead", "head",
    "executive", "officer", "team", "founder", "cofounder", "partner", "advisor", "mentor",
    "board", "chair", "chairman", "owner", "principal", "engineer", "scientist", "professor",
    "investor", "entrepreneur", "consultant", "member", "vice",
    // ===== GENERIC BUSINESS & TECH NOUNS =====
    "company", "business", "product", "service", "services", "platform", "technology",
    "software", "hardware", "system", "systems", "solution", "solutions", "tool", "tools",
    "application", "app", "website", "site", "network", "digital", "online", "mobile",
    "cloud", "data", "analytics", "startup", "startups", "enterprise", "consumer",
    "commercial", "industrial", "professional", "industry", "market", "sector", "space",
    "field", "area", "domain", "vertical", "horizontal", "user", "customer", "client",
    "vendor", "provider", "supplier", "developer", "sales", "marketing", "finance",
    "operations", "strategy", "healthcare", "health", "medical", "energy", "education",
    "security", "research", "development", "engineering", "design", "management",
    "program", "project", "group", "global", "international", "national", "local",
    // ===== GENERIC ADJECTIVES =====
    "first", "last", "next", "new", "old", "good", "better", "best", "great", "leading",
    "world", "advanced", "modern", "smart", "innovative", "revolutionary", "cutting", "edge",
    "state", "art", "high", "early", "late", "major", "full",
    // ===== TIME & MEASURE =====
    "year", "years", "month", "months", "week", "weeks", "days", "today",
    "january", "february", "march", "april", "june", "july", "august", "september",
    "october", "november", "december", "monday", "tuesday", "wednesday", "thursday",
    "friday", "saturday", "sunday",
    // ===== SENTENCE STARTERS =====
    "following", "often", "despite", "instead", "thus", "based", "additionally", "however",
    "therefore", "furthermore", "moreover", "meanwhile", "currently", "recently", "finally",
    "initially", "generally", "typically", "essentially", "specifically", "particularly",
    "notably", "importantly", "fortunately", "unfortunately", "existing", "since",
    "although", "because", "within", "without", "beyond", "prior", "today", "founded",
    "previously", "together", "along", "among", "across", "using", "having", "being",
    // ===== PLURAL COLLECTIVES =====
    "americans", "people", "users", "customers", "clients", "companies", "businesses",
    "organizations", "individuals", "teams", "members", "patients", "students",
    "families", "investors", "founders", "employees", "partners", "consumers",
    // ===== MILITARY BRANCHES =====
    "force", "navy", "army", "marines", "coast", "guard",
    // ===== FUNDING LADDER =====
    "angel", "seed", "series", "round", "funding",
    // ===== TITLES & LEGAL SUFFIXES =====
    "prof", "inc", "ltd", "corp", "gmbh",
    // ===== PLACES =====
    "austin", "dallas", "houston", "texas", "california", "york", "america", "united",
    "states", "francisco", "angeles", "seattle", "boston", "chicago", "denver", "atlanta",
    "miami", "phoenix", "portland", "antonio",
];

/// Honorific titles recognized before a person's name
pub const HONORIFICS: &[&str] = &["Dr.", "Prof.", "Mr.", "Ms.", "Mrs."];

static ACRONYM_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| COMMON_ACRONYMS.iter().copied().collect());

static ABBREVIATION_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| PROFESSIONAL_ABBREVIATIONS.iter().copied().collect());

static EXCLUDED_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| EXCLUDED_WORDS.iter().copied().collect());

/// Check whether a token is an allow-listed acronym (exact case)
pub fn is_common_acronym(token: &str) -> bool {
    ACRONYM_SET.contains(token) || ABBREVIATION_SET.contains(token)
}

/// Check whether a token is a whitelisted professional abbreviation
pub fn is_professional_abbreviation(token: &str) -> bool {
    ABBREVIATION_SET.contains(token)
}

/// Check whether a capitalized word belongs to the exclusion lexicon
pub fn is_excluded_word(word: &str) -> bool {
    EXCLUDED_SET.contains(word.to_lowercase().as_str())
}

/// Check whether a lowercase word is a phrase-boundary function word
pub fn is_phrase_stopword(word: &str) -> bool {
    PHRASE_STOPWORDS.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acronyms_are_case_sensitive() {
        assert!(is_common_acronym("API"));
        assert!(is_common_acronym("SaaS"));
        assert!(!is_common_acronym("Api"));
        assert!(!is_common_acronym("NASA"));
    }

    #[test]
    fn test_professional_abbreviations() {
        assert!(is_professional_abbreviation("PhD"));
        assert!(!is_professional_abbreviation("IoT"));
    }

    #[test]
    fn test_excluded_words_ignore_case() {
        assert!(is_excluded_word("However"));
        assert!(is_excluded_word("Customers"));
        assert!(is_excluded_word("September"));
        assert!(is_excluded_word("Seed"));
        assert!(!is_excluded_word("Brightpath"));
    }

    #[test]
    fn test_phrase_stopwords() {
        assert!(is_phrase_stopword("the"));
        assert!(!is_phrase_stopword("The"));
        assert!(!is_phrase_stopword("university"));
    }
}
