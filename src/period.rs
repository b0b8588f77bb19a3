//! Chronological ranking of free-text period and dynasty labels.
//!
//! Dated alternative forms arrive labeled either with a named period
//! ("Old Kingdom", "Ptolemaic Period") or a dynasty ordinal ("18th Dynasty",
//! "Dynasty 26"). Both are mapped onto a single integer scale so any two
//! dated forms can be compared. Attestation-corpus names (Pyramid Texts,
//! Coffin Texts, Book of the Dead) alias the kingdom period they belong to.

use std::sync::OnceLock;

use regex::Regex;

/// Rank assigned to unrecognized or absent labels. Sorts after every
/// dated form.
pub const UNDATED_RANK: u32 = 999;

// ── Named periods ────────────────────────────────────────────────────────

/// (lowercase match pattern, canonical display name, rank).
///
/// Matched by substring in table order, so more specific patterns come
/// before the ones they contain ("predynastic" before "early dynastic",
/// which would otherwise match inside it).
const PERIODS: &[(&str, &str, u32)] = &[
    ("predynastic", "Predynastic", 0),
    ("early dynastic", "Early Dynastic", 1),
    ("pyramid texts", "Old Kingdom", 2),
    ("pyramid text", "Old Kingdom", 2),
    ("old kingdom", "Old Kingdom", 2),
    ("first intermediate", "First Intermediate Period", 3),
    ("coffin texts", "Middle Kingdom", 4),
    ("coffin text", "Middle Kingdom", 4),
    ("middle kingdom", "Middle Kingdom", 4),
    ("second intermediate", "Second Intermediate Period", 5),
    ("book of the dead", "New Kingdom", 6),
    ("new kingdom", "New Kingdom", 6),
    ("third intermediate", "Third Intermediate Period", 7),
    ("late egyptian", "Late Period", 8),
    ("late period", "Late Period", 8),
    ("ptolemaic", "Ptolemaic", 9),
    ("greco-roman", "Roman", 10),
    ("graeco-roman", "Roman", 10),
    ("roman", "Roman", 10),
];

fn dynasty_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:(\d+)\s*(?:st|nd|rd|th)?\s+dynasty|dynasty\s+(\d+|[ivxl]+)\b)").unwrap()
    })
}

/// Substring match that refuses to start or end inside a word, so
/// "romance" never matches "roman".
fn contains_label(haystack: &str, pattern: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(pattern) {
        let i = start + pos;
        let j = i + pattern.len();
        let before_ok = haystack[..i]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[j..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = j;
    }
    false
}

/// Parse a dynasty ordinal, either decimal or Roman ("xviii").
fn parse_ordinal(s: &str) -> Option<u32> {
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    let mut total: i64 = 0;
    let mut prev = 0i64;
    for c in s.chars().rev() {
        let v = match c {
            'i' => 1,
            'v' => 5,
            'x' => 10,
            'l' => 50,
            _ => return None,
        };
        if v < prev {
            total -= v;
        } else {
            total += v;
            prev = v;
        }
    }
    (total > 0).then_some(total as u32)
}

/// Map a dynasty number onto the rank of its surrounding kingdom period.
fn dynasty_rank(n: u32) -> u32 {
    match n {
        0..=2 => 1,   // Early Dynastic
        3..=6 => 2,   // Old Kingdom
        7..=11 => 3,  // First Intermediate
        12..=13 => 4, // Middle Kingdom
        14..=17 => 5, // Second Intermediate
        18..=20 => 6, // New Kingdom
        21..=25 => 7, // Third Intermediate
        26..=31 => 8, // Late Period
        _ => 9,       // Ptolemaic and beyond
    }
}

/// Total chronological order over period labels. Pure: unknown input
/// degrades to [`UNDATED_RANK`] instead of failing.
pub fn rank(label: &str) -> u32 {
    let needle = label.trim().to_lowercase();
    if needle.is_empty() {
        return UNDATED_RANK;
    }
    for &(pattern, _, r) in PERIODS {
        if contains_label(&needle, pattern) {
            return r;
        }
    }
    if let Some(caps) = dynasty_regex().captures(&needle)
        && let Some(m) = caps.get(1).or_else(|| caps.get(2))
        && let Some(n) = parse_ordinal(m.as_str())
    {
        return dynasty_rank(n);
    }
    UNDATED_RANK
}

/// Canonical display name for a recognized label, for node `period` fields.
pub fn normalize(label: &str) -> Option<&'static str> {
    let needle = label.trim().to_lowercase();
    for &(pattern, canonical, _) in PERIODS {
        if contains_label(&needle, pattern) {
            return Some(canonical);
        }
    }
    let r = rank(&needle);
    if r == UNDATED_RANK {
        return None;
    }
    PERIODS
        .iter()
        .find(|&&(_, _, pr)| pr == r)
        .map(|&(_, canonical, _)| canonical)
}

/// Distinct (canonical name, rank) pairs in chronological order, for the
/// `periods` subcommand.
pub fn inventory() -> Vec<(&'static str, u32)> {
    let mut out: Vec<(&'static str, u32)> = Vec::new();
    for &(_, canonical, r) in PERIODS {
        if !out.iter().any(|&(name, _)| name == canonical) {
            out.push((canonical, r));
        }
    }
    out.sort_by_key(|(_, r)| *r);
    out
}

/// Dynasty ranges folded into each kingdom period, for the `periods`
/// subcommand display.
pub const DYNASTY_RANGES: &[(&str, &str)] = &[
    ("Dynasties 1-2", "Early Dynastic"),
    ("Dynasties 3-6", "Old Kingdom"),
    ("Dynasties 7-11", "First Intermediate Period"),
    ("Dynasties 12-13", "Middle Kingdom"),
    ("Dynasties 14-17", "Second Intermediate Period"),
    ("Dynasties 18-20", "New Kingdom"),
    ("Dynasties 21-25", "Third Intermediate Period"),
    ("Dynasties 26-31", "Late Period"),
];
