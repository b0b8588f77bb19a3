//! Shared output schema for the lemma network artifact.
//!
//! These are the shapes serialized to `lemma_networks.json` and consumed by
//! the visualization frontend, so field names and enum spellings are part of
//! the wire format.

use serde::{Deserialize, Serialize};

// ── Language ─────────────────────────────────────────────────────────────

/// A language stage or loan-source language attached to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "egy")]
    Egyptian,
    #[serde(rename = "egy-late")]
    LateEgyptian,
    #[serde(rename = "dem")]
    Demotic,
    #[serde(rename = "cop")]
    Coptic,
    #[serde(rename = "grc")]
    Greek,
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "he")]
    Hebrew,
    #[serde(rename = "arc")]
    Aramaic,
    #[serde(rename = "akk")]
    Akkadian,
    #[serde(rename = "sem-pro")]
    ProtoSemitic,
    #[serde(rename = "nub")]
    Nubian,
    #[serde(other, rename = "und")]
    Other,
}

impl Language {
    /// Parse a Wiktionary language code. Coptic dialect codes like `cop-sah`
    /// split into the language plus a dialect name.
    pub fn from_code(code: &str) -> (Language, Option<&'static str>) {
        match code.trim() {
            "egy" => (Language::Egyptian, None),
            "egy-late" => (Language::LateEgyptian, None),
            "dem" | "egx-dem" => (Language::Demotic, None),
            "cop" => (Language::Coptic, None),
            "cop-sah" => (Language::Coptic, Some("Sahidic")),
            "cop-boh" => (Language::Coptic, Some("Bohairic")),
            "cop-akh" => (Language::Coptic, Some("Akhmimic")),
            "cop-fay" => (Language::Coptic, Some("Fayyumic")),
            "cop-lyc" => (Language::Coptic, Some("Lycopolitan")),
            "cop-old" => (Language::Coptic, Some("Old Coptic")),
            "cop-oxy" => (Language::Coptic, Some("Oxyrhynchite")),
            "grc" => (Language::Greek, None),
            "ar" => (Language::Arabic, None),
            "he" => (Language::Hebrew, None),
            "arc" => (Language::Aramaic, None),
            "akk" => (Language::Akkadian, None),
            "sem-pro" => (Language::ProtoSemitic, None),
            "nub" => (Language::Nubian, None),
            _ => (Language::Other, None),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Egyptian => "egy",
            Language::LateEgyptian => "egy-late",
            Language::Demotic => "dem",
            Language::Coptic => "cop",
            Language::Greek => "grc",
            Language::Arabic => "ar",
            Language::Hebrew => "he",
            Language::Aramaic => "arc",
            Language::Akkadian => "akk",
            Language::ProtoSemitic => "sem-pro",
            Language::Nubian => "nub",
            Language::Other => "und",
        }
    }

    /// Human-readable name for edge notes and run statistics.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Egyptian => "Egyptian",
            Language::LateEgyptian => "Late Egyptian",
            Language::Demotic => "Demotic",
            Language::Coptic => "Coptic",
            Language::Greek => "Greek",
            Language::Arabic => "Arabic",
            Language::Hebrew => "Hebrew",
            Language::Aramaic => "Aramaic",
            Language::Akkadian => "Akkadian",
            Language::ProtoSemitic => "Proto-Semitic",
            Language::Nubian => "Nubian",
            Language::Other => "Unknown",
        }
    }

    /// Whether this language belongs to the Egyptian lineage
    /// (Egyptian → Late Egyptian → Demotic → Coptic).
    pub fn is_egyptian_family(&self) -> bool {
        matches!(
            self,
            Language::Egyptian | Language::LateEgyptian | Language::Demotic | Language::Coptic
        )
    }

    /// Position within the Egyptian lineage. Non-family languages sort last.
    pub fn stage(&self) -> u8 {
        match self {
            Language::Egyptian => 0,
            Language::LateEgyptian => 1,
            Language::Demotic => 2,
            Language::Coptic => 3,
            _ => u8::MAX,
        }
    }
}

// ── Edge types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    #[serde(rename = "EVOLVES")]
    Evolves,
    #[serde(rename = "DESCENDS")]
    Descends,
    #[serde(rename = "VARIANT")]
    Variant,
    #[serde(rename = "DERIVED")]
    Derived,
    #[serde(rename = "COMPONENT")]
    Component,
    #[serde(rename = "BORROWED")]
    Borrowed,
    #[serde(rename = "INHERITED")]
    Inherited,
}

impl EdgeType {
    /// Edges that carry a form forward in time within the lineage.
    pub fn is_temporal(&self) -> bool {
        matches!(self, EdgeType::Evolves | EdgeType::Descends)
    }
}

// ── Nodes and edges ──────────────────────────────────────────────────────

/// One attested form in a network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub form: String,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dialects: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hieroglyphs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meanings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etymology_index: Option<usize>,
}

impl Node {
    /// Identity key within a network.
    pub fn dedup_key(&self) -> (&str, Language, Option<&str>, &[String]) {
        (
            self.form.as_str(),
            self.language,
            self.period.as_deref(),
            self.dialects.as_slice(),
        )
    }
}

/// A directed relation between two nodes of one network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

// ── Network ──────────────────────────────────────────────────────────────

/// One egocentric network: a root lemma (for one of its etymologies) plus
/// every form related to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub network_id: String,
    pub root_form: String,
    pub root_language: Language,
    pub root_etymology_index: usize,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Network {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Check referential integrity and node-key uniqueness.
    pub fn validate(&self) -> Result<(), String> {
        for edge in &self.edges {
            if self.node(&edge.from).is_none() {
                return Err(format!(
                    "{}: edge references missing node {}",
                    self.network_id, edge.from
                ));
            }
            if self.node(&edge.to).is_none() {
                return Err(format!(
                    "{}: edge references missing node {}",
                    self.network_id, edge.to
                ));
            }
        }
        for (i, a) in self.nodes.iter().enumerate() {
            for b in &self.nodes[i + 1..] {
                if a.dedup_key() == b.dedup_key() {
                    return Err(format!(
                        "{}: duplicate node key for form {:?} ({} / {})",
                        self.network_id, a.form, a.id, b.id
                    ));
                }
            }
        }
        Ok(())
    }
}
