//! Typed records for the parsed scraper output.
//!
//! The external scrapers and TEI/PDF parsers emit one JSON map per language
//! (lemma id → entry). Shapes vary with scraper coverage, so every field is
//! optional or defaulted and partial records still load.

use serde::Deserialize;
use std::sync::OnceLock;

use regex::Regex;

// ── Entry shapes ─────────────────────────────────────────────────────────

/// One dictionary entry as emitted by the parsers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LemmaEntry {
    #[serde(default)]
    pub etymologies: Vec<Etymology>,
}

/// One sense-cluster of a lemma. Position in `etymologies` is the
/// etymology index carried onto every node built from it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Etymology {
    #[serde(default)]
    pub definitions: Vec<Definition>,
    /// Compound breakdown, when the headword is a compound.
    #[serde(default)]
    pub components: Vec<WordRef>,
    /// Egyptian ancestor named by a Demotic or Coptic etymology section.
    #[serde(default)]
    pub ancestor: Option<WordRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub glosses: Vec<String>,
    #[serde(default)]
    pub hieroglyphs: Option<String>,
    #[serde(default)]
    pub alternative_forms: Vec<AlternativeForm>,
    #[serde(default)]
    pub derived_terms: Vec<String>,
    #[serde(default)]
    pub descendants: Vec<WordRef>,
    #[serde(default)]
    pub borrowed_from: Option<WordRef>,
    #[serde(default)]
    pub inherited_from: Option<WordRef>,
}

/// A dated or dialectal spelling variant of the headword.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlternativeForm {
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub hieroglyphs: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    /// Free-text usage label ("plural", "feminine", "as the name of a god").
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub dialect: Option<String>,
}

impl AlternativeForm {
    /// A form with neither a spelling nor a sign sequence carries nothing
    /// usable and is skipped.
    pub fn is_malformed(&self) -> bool {
        self.form.as_deref().is_none_or(str::is_empty)
            && self.hieroglyphs.as_deref().is_none_or(str::is_empty)
    }
}

/// A cross-reference to a word in some language (descendant, component,
/// ancestor, or loan source).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WordRef {
    #[serde(default)]
    pub word: String,
    /// Wiktionary language code ("egy", "dem", "cop-sah", "grc", ...).
    #[serde(default)]
    pub language: Option<String>,
}

// ── Hieroglyph markup ────────────────────────────────────────────────────

/// Strip `<hiero>…</hiero>` wrapper tags, keeping the sign sequence.
pub fn strip_hiero_tags(raw: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"</?hiero>").unwrap());
    re.replace_all(raw, "").trim().to_string()
}
