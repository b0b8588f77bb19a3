//! In-memory index of parsed dictionary entries, one map per language.
//!
//! Populated once at startup from the per-language JSON files the scrapers
//! produce, then read-only for the rest of the run. Keys are lemma
//! identifiers for lookups and lemma forms for iteration, so `BTreeMap`
//! keeps root processing order stable across runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use lemma_types::Language;
use walkdir::WalkDir;

use crate::input::LemmaEntry;

#[derive(Debug, Default)]
pub struct LemmaStore {
    egyptian: BTreeMap<String, LemmaEntry>,
    demotic: BTreeMap<String, LemmaEntry>,
    coptic: BTreeMap<String, LemmaEntry>,
}

/// Paths of the per-language input files found under the input directory.
#[derive(Debug, Default)]
pub struct LemmaFiles {
    pub egyptian: Option<PathBuf>,
    pub demotic: Option<PathBuf>,
    pub coptic: Option<PathBuf>,
}

impl LemmaStore {
    pub fn from_maps(
        egyptian: BTreeMap<String, LemmaEntry>,
        demotic: BTreeMap<String, LemmaEntry>,
        coptic: BTreeMap<String, LemmaEntry>,
    ) -> Self {
        LemmaStore {
            egyptian,
            demotic,
            coptic,
        }
    }

    /// Locate `egyptian*`/`demotic*`/`coptic*` lemma JSON files under `dir`.
    /// First match per language wins, in directory walk order.
    pub fn discover(dir: &Path) -> LemmaFiles {
        let mut files = LemmaFiles::default();
        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let name = name.to_lowercase();
            if name.contains("egyptian") && files.egyptian.is_none() {
                files.egyptian = Some(path.to_path_buf());
            } else if name.contains("demotic") && files.demotic.is_none() {
                files.demotic = Some(path.to_path_buf());
            } else if name.contains("coptic") && files.coptic.is_none() {
                files.coptic = Some(path.to_path_buf());
            }
        }
        files
    }

    /// Load the discovered files. A missing or unreadable file degrades to
    /// an empty map for that language with a warning on stderr.
    pub fn load(files: &LemmaFiles) -> LemmaStore {
        LemmaStore {
            egyptian: load_map(files.egyptian.as_deref(), "Egyptian"),
            demotic: load_map(files.demotic.as_deref(), "Demotic"),
            coptic: load_map(files.coptic.as_deref(), "Coptic"),
        }
    }

    fn map(&self, language: Language) -> Option<&BTreeMap<String, LemmaEntry>> {
        match language {
            Language::Egyptian | Language::LateEgyptian => Some(&self.egyptian),
            Language::Demotic => Some(&self.demotic),
            Language::Coptic => Some(&self.coptic),
            _ => None,
        }
    }

    pub fn lookup(&self, language: Language, id: &str) -> Option<&LemmaEntry> {
        self.map(language)?.get(id)
    }

    /// Root lemmas for network construction, in stable key order.
    pub fn iter_language(
        &self,
        language: Language,
    ) -> impl Iterator<Item = (&String, &LemmaEntry)> {
        self.map(language).into_iter().flatten()
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        (self.egyptian.len(), self.demotic.len(), self.coptic.len())
    }
}

fn load_map(path: Option<&Path>, label: &str) -> BTreeMap<String, LemmaEntry> {
    let Some(path) = path else {
        eprintln!("warning: no {label} lemma file found, continuing without");
        return BTreeMap::new();
    };
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("warning: cannot read {}: {e}", path.display());
            return BTreeMap::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("warning: cannot parse {}: {e}", path.display());
            BTreeMap::new()
        }
    }
}
