use regex::{Captures, Regex};

/// Where a candidate match sits in the text
#[derive(Debug, Clone, Copy)]
pub struct MatchContext {
    /// Byte offset of the match in the full text
    pub offset: usize,
    /// Character immediately before the match, within the same segment
    pub before: Option<char>,
    /// Character immediately after the match, within the same segment
    pub after: Option<char>,
}

impl MatchContext {
    pub fn is_quoted(&self) -> bool {
        self.before.is_some_and(is_quote) && self.after.is_some_and(is_quote)
    }
}

pub fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\u{201C}' | '\u{201D}')
}

#[derive(Debug, Clone)]
struct Segment {
    text: String,
    locked: bool,
}

/// Text split into open and locked segments.
///
/// Every replacement is stored as a locked segment; later passes only ever
/// search open segments, so nothing a pass inserts can be matched again.
#[derive(Debug, Clone)]
pub struct SegmentedText {
    segments: Vec<Segment>,
}

impl SegmentedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment {
                text: text.into(),
                locked: false,
            }],
        }
    }

    /// Replace matches in open segments. The callback returns the
    /// replacement, or `None` to leave the match in place.
    pub fn replace_all<F>(&mut self, re: &Regex, mut replace: F) -> usize
    where
        F: FnMut(&Captures<'_>, MatchContext) -> Option<String>,
    {
        let mut replaced = 0;
        let mut offset = 0;
        let mut out = Vec::with_capacity(self.segments.len());

        for segment in self.segments.drain(..) {
            let seg_len = segment.text.len();
            if segment.locked {
                out.push(segment);
                offset += seg_len;
                continue;
            }

            let text = segment.text;
            let mut last = 0;
            for caps in re.captures_iter(&text) {
                let Some(m) = caps.get(0) else { continue };
                if m.as_str().is_empty() {
                    continue;
                }
                let ctx = MatchContext {
                    offset: offset + m.start(),
                    before: text[..m.start()].chars().next_back(),
                    after: text[m.end()..].chars().next(),
                };
                if let Some(replacement) = replace(&caps, ctx) {
                    push_open(&mut out, &text[last..m.start()]);
                    out.push(Segment {
                        text: replacement,
                        locked: true,
                    });
                    last = m.end();
                    replaced += 1;
                }
            }
            push_open(&mut out, &text[last..]);
            offset += seg_len;
        }

        self.segments = out;
        replaced
    }

    /// Open text only, in order, with the byte offset of each piece
    pub fn open_segments(&self) -> Vec<(usize, &str)> {
        let mut offset = 0;
        let mut pieces = Vec::new();
        for segment in &self.segments {
            if !segment.locked {
                pieces.push((offset, segment.text.as_str()));
            }
            offset += segment.text.len();
        }
        pieces
    }

    pub fn len(&self) -> usize {
        self.segments.iter().map(|s| s.text.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn push_open(out: &mut Vec<Segment>, text: &str) {
    if !text.is_empty() {
        out.push(Segment {
            text: text.to_string(),
            locked: false,
        });
    }
}

impl std::fmt::Display for SegmentedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for segment in &self.segments {
            f.write_str(&segment.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replacements_are_not_rematched() {
        let mut text = SegmentedText::new("Acme hired Acme Labs");
        let acme = Regex::new(r"\bAcme\b").unwrap();
        let labs = Regex::new(r"\b[A-Z][a-z]+ [A-Z][a-z]+\b").unwrap();

        assert_eq!(text.replace_all(&acme, |_, _| Some("Nova Labs".to_string())), 2);
        assert_eq!(text.replace_all(&labs, |_, _| Some("[X]".to_string())), 0);
        assert_eq!(text.to_string(), "Nova Labs hired Nova Labs Labs");
    }

    #[test]
    fn test_declined_matches_stay_open() {
        let mut text = SegmentedText::new("API and ACME");
        let caps = Regex::new(r"\b[A-Z]{3,}\b").unwrap();
        text.replace_all(&caps, |c, _| (&c[0] != "API").then(|| "[Org]".to_string()));
        assert_eq!(text.to_string(), "API and [Org]");
        let open: Vec<&str> = text.open_segments().into_iter().map(|(_, s)| s).collect();
        assert_eq!(open, vec!["API and "]);
    }

    #[test]
    fn test_context_offsets_and_quotes() {
        let mut text = SegmentedText::new("Known as \u{201C}ABS\u{201D} today");
        let caps = Regex::new(r"[A-Z]{3}").unwrap();
        let mut seen = Vec::new();
        text.replace_all(&caps, |_, ctx| {
            seen.push((ctx.offset, ctx.is_quoted()));
            None
        });
        assert_eq!(seen, vec![(12, true)]);
    }
}
