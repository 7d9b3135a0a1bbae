//! Script detection and whitespace-insensitive matching over report and source text.

/// Invisible characters that reformatting tends to add or drop.
const ZERO_WIDTH: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

fn is_invisible(c: char) -> bool {
    c.is_whitespace() || ZERO_WIDTH.contains(&c)
}

/// Remove every whitespace and zero-width character.
pub fn compact(s: &str) -> String {
    s.chars().filter(|&c| !is_invisible(c)).collect()
}

/// Trim whitespace and zero-width characters from both ends.
pub fn trim_invisible(s: &str) -> &str {
    s.trim_matches(is_invisible)
}

/// Whether `fragment` occurs in `source`, exactly or once all whitespace is removed.
///
/// An empty fragment never matches.
pub fn contains_fragment(source: &str, fragment: &str) -> bool {
    if fragment.trim().is_empty() {
        return false;
    }
    if source.contains(fragment) {
        return true;
    }
    let needle = compact(fragment);
    !needle.is_empty() && compact(source).contains(&needle)
}

/// Hangul syllable or jamo, including compatibility jamo.
pub fn is_hangul(c: char) -> bool {
    matches!(c,
        '\u{AC00}'..='\u{D7A3}'   // syllables
        | '\u{1100}'..='\u{11FF}' // jamo
        | '\u{3130}'..='\u{318F}' // compatibility jamo
    )
}

/// ASCII letters plus Latin-1 Supplement and Latin Extended-A/B letters.
pub fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic() || (('\u{00C0}'..='\u{024F}').contains(&c) && c.is_alphabetic())
}

/// Writing systems present in a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scripts {
    pub hangul: bool,
    pub latin: bool,
}

impl Scripts {
    /// Scan `s`; characters of other scripts are ignored.
    pub fn of(s: &str) -> Self {
        let mut scripts = Self::default();
        for c in s.chars() {
            if is_hangul(c) {
                scripts.hangul = true;
            } else if is_latin(c) {
                scripts.latin = true;
            }
        }
        scripts
    }

    /// No Hangul or Latin letters at all, e.g. digits or punctuation only.
    pub fn is_empty(&self) -> bool {
        !self.hangul && !self.latin
    }

    /// Both sides share at least one script.
    pub fn overlaps(&self, other: &Self) -> bool {
        (self.hangul && other.hangul) || (self.latin && other.latin)
    }
}

/// True if the text has at least one letter of any script.
pub fn has_letter(s: &str) -> bool {
    s.chars().any(|c| is_hangul(c) || c.is_alphabetic())
}

/// Non-blank lines of a report, trimmed.
pub fn report_lines(report: &str) -> impl Iterator<Item = &str> {
    report.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// Join report lines back into a report string.
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
}
