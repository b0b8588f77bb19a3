//! Egocentric network construction.
//!
//! One network per (root lemma, etymology). Egyptian lemmas drive the main
//! pass: their alternative forms become chronological chains, their
//! descendant references become Demotic/Coptic nodes hung off the latest
//! dated form. Demotic and Coptic entries then either attach to the network
//! of the Egyptian ancestor their etymology names or, lacking one, start
//! standalone networks of their own.

use std::collections::BTreeMap;

use lemma_types::{Edge, EdgeType, Language, Network, Node};

use crate::input::{strip_hiero_tags, AlternativeForm, Definition, Etymology, WordRef};
use crate::period::{self, UNDATED_RANK};
use crate::store::LemmaStore;

// ── Form-type chains ─────────────────────────────────────────────────────

/// Which temporal chain an alternative form belongs to, read off its
/// usage label. Each kind chains separately from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum FormKind {
    Base,
    Plural,
    Dual,
    Feminine,
    Godhood,
    Determinative,
}

impl FormKind {
    fn detect(label: Option<&str>) -> FormKind {
        let Some(label) = label else {
            return FormKind::Base;
        };
        let l = label.to_lowercase();
        if l.contains("plural") || l.contains("pl.") {
            FormKind::Plural
        } else if l.contains("dual") {
            FormKind::Dual
        } else if l.contains("feminine") || l.contains("fem.") {
            FormKind::Feminine
        } else if l.contains("god") || l.contains("deity") || l.contains("divine") {
            FormKind::Godhood
        } else if l.contains("determinative") {
            FormKind::Determinative
        } else {
            FormKind::Base
        }
    }

    fn note_name(&self) -> &'static str {
        match self {
            FormKind::Base => "Base",
            FormKind::Plural => "Plural",
            FormKind::Dual => "Dual",
            FormKind::Feminine => "Feminine",
            FormKind::Godhood => "Godhood",
            FormKind::Determinative => "Determinative",
        }
    }
}

// ── Statistics ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct BuildStats {
    /// Etymologies skipped because they carry no definitions at all.
    pub skipped_etymologies: usize,
    /// Alternative forms dropped for having neither form nor hieroglyphs.
    pub malformed_forms: usize,
    /// Descendant/ancestor nodes created with no matching store entry.
    pub placeholder_nodes: usize,
}

// ── Builder ──────────────────────────────────────────────────────────────

pub struct NetworkBuilder<'a> {
    store: &'a LemmaStore,
    next_node: usize,
    next_network: usize,
    pub stats: BuildStats,
}

impl<'a> NetworkBuilder<'a> {
    pub fn new(store: &'a LemmaStore) -> Self {
        NetworkBuilder {
            store,
            next_node: 0,
            next_network: 0,
            stats: BuildStats::default(),
        }
    }

    /// Run the full construction: Egyptian roots, then Demotic, then Coptic.
    pub fn build_all(&mut self) -> Vec<Network> {
        let store = self.store;
        let mut networks: Vec<Network> = Vec::new();

        for (form, entry) in store.iter_language(Language::Egyptian) {
            for (etym_idx, etym) in entry.etymologies.iter().enumerate() {
                if let Some(net) = self.build_egyptian_network(form, etym_idx, etym) {
                    networks.push(net);
                }
            }
        }

        for stage in [Language::Demotic, Language::Coptic] {
            for (form, entry) in store.iter_language(stage) {
                for (etym_idx, etym) in entry.etymologies.iter().enumerate() {
                    self.place_stage_etymology(&mut networks, form, stage, etym_idx, etym);
                }
            }
        }

        networks
    }

    // ── Egyptian root networks ───────────────────────────────────────────

    fn build_egyptian_network(
        &mut self,
        lemma_form: &str,
        etym_idx: usize,
        etym: &Etymology,
    ) -> Option<Network> {
        if etym.definitions.is_empty() {
            self.stats.skipped_etymologies += 1;
            return None;
        }

        self.next_network += 1;
        let mut net = Network {
            network_id: format!("NET{:05}", self.next_network),
            root_form: lemma_form.to_string(),
            root_language: Language::Egyptian,
            root_etymology_index: etym_idx,
            nodes: Vec::new(),
            edges: Vec::new(),
        };

        let root = Node {
            id: String::new(),
            form: lemma_form.to_string(),
            language: Language::Egyptian,
            period: None,
            dialects: Vec::new(),
            hieroglyphs: etym
                .definitions
                .iter()
                .find_map(|d| d.hieroglyphs.as_deref())
                .map(strip_hiero_tags),
            part_of_speech: etym
                .definitions
                .iter()
                .find_map(|d| d.part_of_speech.clone()),
            meanings: merged_glosses(&etym.definitions),
            etymology_index: Some(etym_idx),
        };
        let root_id = self.insert_node(&mut net, root);

        // Partition alternative forms into per-kind chains, keeping
        // definition order within each chain.
        let mut chains: BTreeMap<FormKind, Vec<&AlternativeForm>> = BTreeMap::new();
        for def in &etym.definitions {
            for af in &def.alternative_forms {
                if af.is_malformed() {
                    self.stats.malformed_forms += 1;
                    continue;
                }
                chains
                    .entry(FormKind::detect(af.label.as_deref()))
                    .or_default()
                    .push(af);
            }
        }
        for (kind, forms) in &chains {
            self.build_chain(&mut net, &root_id, *kind, forms, lemma_form, etym_idx);
        }

        self.add_definition_children(&mut net, &root_id, etym_idx, &etym.definitions);
        self.add_components(&mut net, &root_id, etym_idx, &etym.components);

        Some(net)
    }

    /// Lay one form-kind chain into the network: same-rank VARIANT groups,
    /// EVOLVES between consecutive ranks, root link at the front.
    fn build_chain(
        &mut self,
        net: &mut Network,
        root_id: &str,
        kind: FormKind,
        forms: &[&AlternativeForm],
        lemma_form: &str,
        etym_idx: usize,
    ) {
        let mut dated: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        let mut undated: Vec<String> = Vec::new();

        for af in forms {
            let form = af
                .form
                .clone()
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| lemma_form.to_string());
            let rank = af.date.as_deref().map_or(UNDATED_RANK, period::rank);
            let period = af
                .date
                .as_deref()
                .map(|d| {
                    period::normalize(d)
                        .map(String::from)
                        .unwrap_or_else(|| d.trim().to_string())
                })
                .filter(|p| !p.is_empty());

            let mut node = Node {
                id: String::new(),
                form,
                language: Language::Egyptian,
                period,
                dialects: Vec::new(),
                hieroglyphs: af.hieroglyphs.as_deref().map(strip_hiero_tags),
                part_of_speech: None,
                meanings: Vec::new(),
                etymology_index: Some(etym_idx),
            };
            if let Some(d) = &af.dialect
                && !d.is_empty()
            {
                node.dialects.push(d.clone());
            }

            let id = self.insert_node(net, node);
            if id == root_id {
                continue;
            }
            let bucket = if rank == UNDATED_RANK {
                &mut undated
            } else {
                dated.entry(rank).or_default()
            };
            if !bucket.contains(&id) {
                bucket.push(id);
            }
        }

        // Same-rank groups: full clique up to 4 members, star on the
        // first-inserted member beyond that to bound edge count.
        for ids in dated.values() {
            if ids.len() <= 4 {
                for i in 0..ids.len() {
                    for j in (i + 1)..ids.len() {
                        add_edge(net, &ids[i], &ids[j], EdgeType::Variant, "");
                    }
                }
            } else {
                for other in &ids[1..] {
                    add_edge(net, &ids[0], other, EdgeType::Variant, "");
                }
            }
        }

        let mut prev: Option<String> = None;
        for ids in dated.values() {
            let head = ids[0].clone();
            let period = net
                .node(&head)
                .and_then(|n| n.period.clone())
                .unwrap_or_default();
            match &prev {
                None => {
                    if kind == FormKind::Base {
                        add_edge(
                            net,
                            root_id,
                            &head,
                            EdgeType::Evolves,
                            &format!("First attestation in {period}"),
                        );
                    } else {
                        add_edge(
                            net,
                            root_id,
                            &head,
                            EdgeType::Derived,
                            &format!("{} form from {period}", kind.note_name()),
                        );
                    }
                }
                Some(p) => {
                    let prev_period = net
                        .node(p)
                        .and_then(|n| n.period.clone())
                        .unwrap_or_default();
                    add_edge(
                        net,
                        p,
                        &head,
                        EdgeType::Evolves,
                        &format!("Evolution from {prev_period} to {period}"),
                    );
                }
            }
            prev = Some(head);
        }

        for id in &undated {
            if kind == FormKind::Base {
                add_edge(net, root_id, id, EdgeType::Variant, "");
            } else {
                add_edge(
                    net,
                    root_id,
                    id,
                    EdgeType::Derived,
                    &format!("{} form", kind.note_name()),
                );
            }
        }
    }

    // ── Definition children (shared by all root languages) ───────────────

    fn add_definition_children(
        &mut self,
        net: &mut Network,
        owner_id: &str,
        etym_idx: usize,
        definitions: &[Definition],
    ) {
        // Demotic intermediates must exist before their Coptic
        // continuations, whatever order the source lists them in.
        let mut descendants: Vec<&WordRef> = definitions
            .iter()
            .flat_map(|d| d.descendants.iter())
            .collect();
        descendants.sort_by_key(|d| {
            Language::from_code(d.language.as_deref().unwrap_or(""))
                .0
                .stage()
        });
        for dref in descendants {
            self.add_descendant(net, etym_idx, dref);
        }
        for def in definitions {
            for term in &def.derived_terms {
                if term.is_empty() {
                    continue;
                }
                let id = self.find_or_create_node(net, term, Language::Egyptian, None, etym_idx);
                add_edge(net, owner_id, &id, EdgeType::Derived, "");
            }
            if let Some(src) = &def.borrowed_from {
                self.add_provenance(net, owner_id, etym_idx, src, EdgeType::Borrowed);
            }
            if let Some(src) = &def.inherited_from {
                self.add_provenance(net, owner_id, etym_idx, src, EdgeType::Inherited);
            }
        }
    }

    fn add_components(
        &mut self,
        net: &mut Network,
        owner_id: &str,
        etym_idx: usize,
        components: &[WordRef],
    ) {
        for comp in components {
            if comp.word.is_empty() {
                continue;
            }
            let (lang, dialect) = Language::from_code(comp.language.as_deref().unwrap_or("egy"));
            let id = self.find_or_create_node(net, &comp.word, lang, dialect, etym_idx);
            add_edge(net, &id, owner_id, EdgeType::Component, "");
        }
    }

    fn add_provenance(
        &mut self,
        net: &mut Network,
        owner_id: &str,
        etym_idx: usize,
        src: &WordRef,
        edge_type: EdgeType,
    ) {
        if src.word.is_empty() {
            return;
        }
        let (lang, dialect) = Language::from_code(src.language.as_deref().unwrap_or(""));
        let id = self.find_or_create_node(net, &src.word, lang, dialect, etym_idx);
        add_edge(net, &id, owner_id, edge_type, "");
    }

    /// Place one descendant reference: Demotic and Coptic forms hang off
    /// the lineage, foreign-language forms get a BORROWED edge.
    fn add_descendant(&mut self, net: &mut Network, etym_idx: usize, dref: &WordRef) {
        if dref.word.is_empty() {
            return;
        }
        let (lang, dialect) = Language::from_code(dref.language.as_deref().unwrap_or(""));
        let id = self.find_or_create_node(net, &dref.word, lang, dialect, etym_idx);
        lineage_edge(net, lang, &id);
    }

    // ── Demotic / Coptic placement pass ──────────────────────────────────

    /// Attach a Demotic/Coptic etymology to its Egyptian ancestor's network
    /// when one is named and resolvable, else build a standalone network.
    fn place_stage_etymology(
        &mut self,
        networks: &mut Vec<Network>,
        lemma_form: &str,
        stage: Language,
        etym_idx: usize,
        etym: &Etymology,
    ) {
        if let Some(anc) = &etym.ancestor
            && !anc.word.is_empty()
        {
            let (anc_lang, _) = Language::from_code(anc.language.as_deref().unwrap_or("egy"));
            let target = networks.iter_mut().find(|n| {
                (n.root_language == anc_lang && n.root_form == anc.word)
                    || n.nodes
                        .iter()
                        .any(|node| node.language == anc_lang && node.form == anc.word)
            });
            if let Some(net) = target {
                self.attach_stage_entry(net, lemma_form, stage, etym_idx, etym);
                return;
            }
        }
        if let Some(net) = self.build_stage_network(lemma_form, stage, etym_idx, etym) {
            networks.push(net);
        }
    }

    fn attach_stage_entry(
        &mut self,
        net: &mut Network,
        lemma_form: &str,
        stage: Language,
        etym_idx: usize,
        etym: &Etymology,
    ) {
        let id = match find_node_by_form(net, lemma_form, stage) {
            Some(id) => {
                // Entry data enriches the node the Egyptian descendants
                // pass already created. Index stays with its first writer.
                if let Some(n) = net.nodes.iter_mut().find(|n| n.id == id) {
                    if n.meanings.is_empty() {
                        n.meanings = merged_glosses(&etym.definitions);
                    }
                    if n.part_of_speech.is_none() {
                        n.part_of_speech = etym
                            .definitions
                            .iter()
                            .find_map(|d| d.part_of_speech.clone());
                    }
                }
                id
            }
            None => {
                let node = Node {
                    id: String::new(),
                    form: lemma_form.to_string(),
                    language: stage,
                    period: None,
                    dialects: Vec::new(),
                    hieroglyphs: None,
                    part_of_speech: etym
                        .definitions
                        .iter()
                        .find_map(|d| d.part_of_speech.clone()),
                    meanings: merged_glosses(&etym.definitions),
                    etymology_index: Some(etym_idx),
                };
                let id = self.insert_node(net, node);
                lineage_edge(net, stage, &id);
                id
            }
        };

        self.add_stage_variants(net, &id, stage, etym_idx, &etym.definitions);
        self.add_definition_children(net, &id, etym_idx, &etym.definitions);
        self.add_components(net, &id, etym_idx, &etym.components);
    }

    fn build_stage_network(
        &mut self,
        lemma_form: &str,
        stage: Language,
        etym_idx: usize,
        etym: &Etymology,
    ) -> Option<Network> {
        if etym.definitions.is_empty() {
            self.stats.skipped_etymologies += 1;
            return None;
        }

        self.next_network += 1;
        let mut net = Network {
            network_id: format!("NET{:05}", self.next_network),
            root_form: lemma_form.to_string(),
            root_language: stage,
            root_etymology_index: etym_idx,
            nodes: Vec::new(),
            edges: Vec::new(),
        };

        let root = Node {
            id: String::new(),
            form: lemma_form.to_string(),
            language: stage,
            period: None,
            dialects: Vec::new(),
            hieroglyphs: None,
            part_of_speech: etym
                .definitions
                .iter()
                .find_map(|d| d.part_of_speech.clone()),
            meanings: merged_glosses(&etym.definitions),
            etymology_index: Some(etym_idx),
        };
        let root_id = self.insert_node(&mut net, root);

        // An ancestor that survived to this point never resolved; keep it
        // as a placeholder so the descent is still visible.
        if let Some(anc) = &etym.ancestor
            && !anc.word.is_empty()
        {
            let (anc_lang, dialect) = Language::from_code(anc.language.as_deref().unwrap_or("egy"));
            let anc_id = self.find_or_create_node(&mut net, &anc.word, anc_lang, dialect, etym_idx);
            add_edge(
                &mut net,
                &anc_id,
                &root_id,
                EdgeType::Descends,
                &format!("{} → {}", anc_lang.name(), stage.name()),
            );
        }

        self.add_stage_variants(&mut net, &root_id, stage, etym_idx, &etym.definitions);
        self.add_definition_children(&mut net, &root_id, etym_idx, &etym.definitions);
        self.add_components(&mut net, &root_id, etym_idx, &etym.components);

        Some(net)
    }

    /// Dialectal alternative forms of a Demotic/Coptic entry, VARIANT off
    /// the owning node and labeled with the dialect.
    fn add_stage_variants(
        &mut self,
        net: &mut Network,
        owner_id: &str,
        stage: Language,
        etym_idx: usize,
        definitions: &[Definition],
    ) {
        for def in definitions {
            for af in &def.alternative_forms {
                if af.is_malformed() {
                    self.stats.malformed_forms += 1;
                    continue;
                }
                let Some(form) = af.form.as_deref().filter(|f| !f.is_empty()) else {
                    continue;
                };
                // Dialect sigla ("S", "B") show up as forms in scraped
                // tables; they label columns, they are not spellings.
                if form.len() <= 2 && form.chars().all(|c| c.is_ascii_uppercase()) {
                    continue;
                }
                let mut node = Node {
                    id: String::new(),
                    form: form.to_string(),
                    language: stage,
                    period: None,
                    dialects: Vec::new(),
                    hieroglyphs: None,
                    part_of_speech: None,
                    meanings: Vec::new(),
                    etymology_index: Some(etym_idx),
                };
                let dialect = af.dialect.clone().filter(|d| !d.is_empty());
                if let Some(d) = &dialect {
                    node.dialects.push(d.clone());
                }
                let id = self.insert_node(net, node);
                if id != owner_id {
                    add_edge(
                        net,
                        owner_id,
                        &id,
                        EdgeType::Variant,
                        dialect.as_deref().unwrap_or(""),
                    );
                }
            }
        }
    }

    // ── Node bookkeeping ─────────────────────────────────────────────────

    /// Insert a node unless an identical-keyed one exists; merge missing
    /// detail into the survivor. Ids are assigned on actual insertion.
    fn insert_node(&mut self, net: &mut Network, mut node: Node) -> String {
        if let Some(i) = net
            .nodes
            .iter()
            .position(|n| n.dedup_key() == node.dedup_key())
        {
            let existing = &mut net.nodes[i];
            if existing.etymology_index.is_none() {
                existing.etymology_index = node.etymology_index;
            }
            if existing.meanings.is_empty() {
                existing.meanings = std::mem::take(&mut node.meanings);
            }
            if existing.hieroglyphs.is_none() {
                existing.hieroglyphs = node.hieroglyphs.take();
            }
            if existing.part_of_speech.is_none() {
                existing.part_of_speech = node.part_of_speech.take();
            }
            existing.id.clone()
        } else {
            self.next_node += 1;
            node.id = format!("N{:05}", self.next_node);
            let id = node.id.clone();
            net.nodes.push(node);
            id
        }
    }

    /// Cross-reference nodes (descendants, derived terms, components,
    /// provenance) dedup on (form, language) alone: the reference carries
    /// no date, so a dated twin would be a spurious duplicate.
    fn find_or_create_node(
        &mut self,
        net: &mut Network,
        form: &str,
        lang: Language,
        dialect: Option<&str>,
        etym_idx: usize,
    ) -> String {
        if let Some(id) = find_node_by_form(net, form, lang) {
            if let Some(n) = net.nodes.iter_mut().find(|n| n.id == id) {
                if n.etymology_index.is_none() {
                    n.etymology_index = Some(etym_idx);
                }
                if let Some(d) = dialect
                    && !n.dialects.iter().any(|x| x == d)
                {
                    n.dialects.push(d.to_string());
                }
            }
            return id;
        }
        let mut node = Node {
            id: String::new(),
            form: form.to_string(),
            language: lang,
            period: None,
            dialects: dialect.map(|d| vec![d.to_string()]).unwrap_or_default(),
            hieroglyphs: None,
            part_of_speech: None,
            meanings: Vec::new(),
            etymology_index: Some(etym_idx),
        };
        if !self.enrich_from_store(&mut node) {
            self.stats.placeholder_nodes += 1;
        }
        self.insert_node(net, node)
    }

    /// Pull meanings and part of speech from the store entry for a
    /// cross-referenced word, when one exists.
    fn enrich_from_store(&self, node: &mut Node) -> bool {
        let Some(entry) = self.store.lookup(node.language, &node.form) else {
            return false;
        };
        let Some(def) = entry
            .etymologies
            .first()
            .and_then(|e| e.definitions.first())
        else {
            return false;
        };
        if node.meanings.is_empty() {
            node.meanings = def.glosses.clone();
        }
        if node.part_of_speech.is_none() {
            node.part_of_speech = def.part_of_speech.clone();
        }
        if node.hieroglyphs.is_none() {
            node.hieroglyphs = def.hieroglyphs.as_deref().map(strip_hiero_tags);
        }
        true
    }
}

// ── Network-local helpers ────────────────────────────────────────────────

fn merged_glosses(definitions: &[Definition]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for def in definitions {
        for g in &def.glosses {
            if !out.contains(g) {
                out.push(g.clone());
            }
        }
    }
    out
}

fn add_edge(net: &mut Network, from: &str, to: &str, edge_type: EdgeType, notes: &str) {
    if from == to {
        return;
    }
    if net
        .edges
        .iter()
        .any(|e| e.from == from && e.to == to && e.edge_type == edge_type)
    {
        return;
    }
    net.edges.push(Edge {
        from: from.to_string(),
        to: to.to_string(),
        edge_type,
        notes: notes.to_string(),
    });
}

fn find_node_by_form(net: &Network, form: &str, lang: Language) -> Option<String> {
    net.nodes
        .iter()
        .find(|n| n.language == lang && n.form == form)
        .map(|n| n.id.clone())
}

/// The node Demotic/Coptic descendants descend from: the latest dated
/// Egyptian or Late Egyptian form, first-inserted on ties, the root when
/// nothing is dated.
fn descends_source(net: &Network) -> String {
    let mut best: Option<(&Node, u32)> = None;
    for n in &net.nodes {
        if n.language.stage() > 1 {
            continue;
        }
        let Some(p) = &n.period else { continue };
        let r = period::rank(p);
        if r == UNDATED_RANK {
            continue;
        }
        match best {
            Some((_, br)) if r <= br => {}
            _ => best = Some((n, r)),
        }
    }
    best.map(|(n, _)| n.id.clone())
        .unwrap_or_else(|| net.nodes[0].id.clone())
}

fn first_demotic(net: &Network) -> Option<String> {
    net.nodes
        .iter()
        .find(|n| n.language == Language::Demotic)
        .map(|n| n.id.clone())
}

/// Hang a freshly placed node off the lineage: Coptic prefers a Demotic
/// intermediate, everything Egyptian-family descends from the latest dated
/// Egyptian form, foreign languages take a BORROWED edge instead.
fn lineage_edge(net: &mut Network, lang: Language, id: &str) {
    match lang {
        Language::Coptic => {
            let src = first_demotic(net)
                .filter(|s| s.as_str() != id)
                .unwrap_or_else(|| descends_source(net));
            let src_name = net.node(&src).map(|n| n.language.name()).unwrap_or("Egyptian");
            let notes = format!("{src_name} → Coptic");
            add_edge(net, &src, id, EdgeType::Descends, &notes);
        }
        l if l.is_egyptian_family() => {
            let src = descends_source(net);
            let src_name = net.node(&src).map(|n| n.language.name()).unwrap_or("Egyptian");
            let notes = format!("{src_name} → {}", l.name());
            add_edge(net, &src, id, EdgeType::Descends, &notes);
        }
        _ => {
            let src = descends_source(net);
            let notes = format!("Borrowed into {}", lang.name());
            add_edge(net, &src, id, EdgeType::Borrowed, &notes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::LemmaEntry;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn entry(v: serde_json::Value) -> LemmaEntry {
        serde_json::from_value(v).unwrap()
    }

    fn store_with(
        egyptian: Vec<(&str, serde_json::Value)>,
        demotic: Vec<(&str, serde_json::Value)>,
        coptic: Vec<(&str, serde_json::Value)>,
    ) -> LemmaStore {
        let to_map = |items: Vec<(&str, serde_json::Value)>| {
            items
                .into_iter()
                .map(|(k, v)| (k.to_string(), entry(v)))
                .collect::<BTreeMap<_, _>>()
        };
        LemmaStore::from_maps(to_map(egyptian), to_map(demotic), to_map(coptic))
    }

    fn id_of(net: &Network, form: &str) -> String {
        net.nodes
            .iter()
            .find(|n| n.form == form)
            .unwrap_or_else(|| panic!("no node with form {form:?}"))
            .id
            .clone()
    }

    fn has_edge_between(net: &Network, from: &str, to: &str, ty: EdgeType) -> bool {
        let (f, t) = (id_of(net, from), id_of(net, to));
        net.edges
            .iter()
            .any(|e| e.from == f && e.to == t && e.edge_type == ty)
    }

    #[test]
    fn test_evolution_chain_and_descent() {
        let store = store_with(
            vec![(
                "ḫꜣj",
                json!({"etymologies": [{"definitions": [{
                    "glosses": ["to measure"],
                    "alternative_forms": [
                        {"form": "ḫꜣ", "date": "Old Kingdom"},
                        {"form": "ḫꜣy", "date": "New Kingdom"}
                    ],
                    "descendants": [
                        {"word": "ḫy", "language": "dem"},
                        {"word": "ϧⲉ", "language": "cop"}
                    ]
                }]}]}),
            )],
            vec![],
            vec![],
        );
        let mut builder = NetworkBuilder::new(&store);
        let networks = builder.build_all();

        assert_eq!(networks.len(), 1);
        let net = &networks[0];
        net.validate().unwrap();
        assert_eq!(net.nodes.len(), 5);

        assert!(has_edge_between(net, "ḫꜣj", "ḫꜣ", EdgeType::Evolves));
        assert!(has_edge_between(net, "ḫꜣ", "ḫꜣy", EdgeType::Evolves));
        assert!(has_edge_between(net, "ḫꜣy", "ḫy", EdgeType::Descends));
        assert!(has_edge_between(net, "ḫy", "ϧⲉ", EdgeType::Descends));
        // The Coptic form must go through the Demotic intermediate.
        assert!(!has_edge_between(net, "ḫꜣy", "ϧⲉ", EdgeType::Descends));
        assert_eq!(net.edges.len(), 4);

        let evo = net
            .edges
            .iter()
            .find(|e| e.from == id_of(net, "ḫꜣ") && e.to == id_of(net, "ḫꜣy"))
            .unwrap();
        assert_eq!(evo.notes, "Evolution from Old Kingdom to New Kingdom");
    }

    #[test]
    fn test_coptic_listed_before_demotic_still_routes_through_demotic() {
        let store = store_with(
            vec![(
                "ḫꜣj",
                json!({"etymologies": [{"definitions": [{
                    "glosses": ["to measure"],
                    "descendants": [
                        {"word": "ϧⲉ", "language": "cop"},
                        {"word": "ḫy", "language": "dem"}
                    ]
                }]}]}),
            )],
            vec![],
            vec![],
        );
        let mut builder = NetworkBuilder::new(&store);
        let networks = builder.build_all();
        let net = &networks[0];
        net.validate().unwrap();

        assert!(has_edge_between(net, "ḫꜣj", "ḫy", EdgeType::Descends));
        assert!(has_edge_between(net, "ḫy", "ϧⲉ", EdgeType::Descends));
        // The Demotic node is in the network, so the Coptic form must not
        // attach straight to the Egyptian root.
        assert!(!has_edge_between(net, "ḫꜣj", "ϧⲉ", EdgeType::Descends));
    }

    #[test]
    fn test_polysemous_coptic_lemma_splits_networks() {
        let etym = json!({"definitions": [{"glosses": ["a sense"]}]});
        let store = store_with(
            vec![],
            vec![],
            vec![(
                "ϣⲱϣ",
                json!({"etymologies": vec![etym; 5]}),
            )],
        );
        let mut builder = NetworkBuilder::new(&store);
        let networks = builder.build_all();

        assert_eq!(networks.len(), 5);
        let mut seen_ids = Vec::new();
        for (i, net) in networks.iter().enumerate() {
            assert_eq!(net.root_etymology_index, i);
            assert_eq!(net.root_language, Language::Coptic);
            assert_eq!(net.nodes[0].etymology_index, Some(i));
            for n in &net.nodes {
                assert!(!seen_ids.contains(&n.id));
                seen_ids.push(n.id.clone());
            }
        }
    }

    #[test]
    fn test_same_period_forms_become_variant_clique() {
        let store = store_with(
            vec![(
                "nfr",
                json!({"etymologies": [{"definitions": [{
                    "glosses": ["good"],
                    "alternative_forms": [
                        {"form": "nfr.w", "date": "Old Kingdom"},
                        {"form": "nfrw", "date": "Old Kingdom"},
                        {"form": "nfr.t", "date": "Old Kingdom"}
                    ]
                }]}]}),
            )],
            vec![],
            vec![],
        );
        let mut builder = NetworkBuilder::new(&store);
        let networks = builder.build_all();
        let net = &networks[0];
        net.validate().unwrap();

        let variants = net
            .edges
            .iter()
            .filter(|e| e.edge_type == EdgeType::Variant)
            .count();
        let evolves = net
            .edges
            .iter()
            .filter(|e| e.edge_type == EdgeType::Evolves)
            .count();
        assert_eq!(variants, 3);
        // Only the first-attestation link from the root.
        assert_eq!(evolves, 1);
    }

    #[test]
    fn test_large_variant_group_falls_back_to_star() {
        let forms: Vec<serde_json::Value> = (0..6)
            .map(|i| json!({"form": format!("nfr{i}"), "date": "Old Kingdom"}))
            .collect();
        let store = store_with(
            vec![(
                "nfr",
                json!({"etymologies": [{"definitions": [{
                    "glosses": ["good"],
                    "alternative_forms": forms
                }]}]}),
            )],
            vec![],
            vec![],
        );
        let mut builder = NetworkBuilder::new(&store);
        let networks = builder.build_all();
        let variants = networks[0]
            .edges
            .iter()
            .filter(|e| e.edge_type == EdgeType::Variant)
            .count();
        assert_eq!(variants, 5);
    }

    #[test]
    fn test_malformed_forms_skipped_and_counted() {
        let store = store_with(
            vec![(
                "nfr",
                json!({"etymologies": [{"definitions": [{
                    "glosses": ["good"],
                    "alternative_forms": [
                        {},
                        {"form": "", "hieroglyphs": ""},
                        {"form": "nfrw", "date": "Old Kingdom"}
                    ]
                }]}]}),
            )],
            vec![],
            vec![],
        );
        let mut builder = NetworkBuilder::new(&store);
        let networks = builder.build_all();
        assert_eq!(builder.stats.malformed_forms, 2);
        assert_eq!(networks[0].nodes.len(), 2);
    }

    #[test]
    fn test_no_definitions_means_no_network() {
        let store = store_with(vec![("nfr", json!({"etymologies": [{}]}))], vec![], vec![]);
        let mut builder = NetworkBuilder::new(&store);
        let networks = builder.build_all();
        assert!(networks.is_empty());
        assert_eq!(builder.stats.skipped_etymologies, 1);
    }

    #[test]
    fn test_derived_component_and_provenance_edges() {
        let store = store_with(
            vec![(
                "pr-ꜥꜣ",
                json!({"etymologies": [{
                    "components": [{"word": "pr"}, {"word": "ꜥꜣ"}],
                    "definitions": [{
                        "glosses": ["pharaoh"],
                        "derived_terms": ["pr-ꜥꜣ ꜥnḫ"],
                        "borrowed_from": {"word": "parʿō", "language": "he"}
                    }]
                }]}),
            )],
            vec![],
            vec![],
        );
        let mut builder = NetworkBuilder::new(&store);
        let networks = builder.build_all();
        let net = &networks[0];
        net.validate().unwrap();

        assert!(has_edge_between(net, "pr-ꜥꜣ", "pr-ꜥꜣ ꜥnḫ", EdgeType::Derived));
        assert!(has_edge_between(net, "pr", "pr-ꜥꜣ", EdgeType::Component));
        assert!(has_edge_between(net, "ꜥꜣ", "pr-ꜥꜣ", EdgeType::Component));
        assert!(has_edge_between(net, "parʿō", "pr-ꜥꜣ", EdgeType::Borrowed));
        let hebrew = net.nodes.iter().find(|n| n.form == "parʿō").unwrap();
        assert_eq!(hebrew.language, Language::Hebrew);
    }

    #[test]
    fn test_foreign_descendant_gets_borrowed_edge() {
        let store = store_with(
            vec![(
                "ḥbnj",
                json!({"etymologies": [{"definitions": [{
                    "glosses": ["ebony"],
                    "descendants": [{"word": "ἔβενος", "language": "grc"}]
                }]}]}),
            )],
            vec![],
            vec![],
        );
        let mut builder = NetworkBuilder::new(&store);
        let networks = builder.build_all();
        let net = &networks[0];
        assert!(has_edge_between(net, "ḥbnj", "ἔβενος", EdgeType::Borrowed));
    }

    #[test]
    fn test_demotic_entry_attaches_to_ancestor_network() {
        let store = store_with(
            vec![(
                "ḫꜣj",
                json!({"etymologies": [{"definitions": [{
                    "glosses": ["to measure"],
                    "descendants": [{"word": "ḫy", "language": "dem"}]
                }]}]}),
            )],
            vec![(
                "ḫy",
                json!({"etymologies": [{
                    "ancestor": {"word": "ḫꜣj", "language": "egy"},
                    "definitions": [{
                        "glosses": ["measure (Demotic)"],
                        "descendants": [{"word": "ϧⲉ", "language": "cop"}]
                    }]
                }]}),
            )],
            vec![],
        );
        let mut builder = NetworkBuilder::new(&store);
        let networks = builder.build_all();

        // No standalone Demotic network; everything merged into one.
        assert_eq!(networks.len(), 1);
        let net = &networks[0];
        net.validate().unwrap();
        assert!(has_edge_between(net, "ḫy", "ϧⲉ", EdgeType::Descends));
        // First writer keeps the etymology index it set.
        let dem = net.nodes.iter().find(|n| n.form == "ḫy").unwrap();
        assert_eq!(dem.etymology_index, Some(0));
    }

    #[test]
    fn test_unresolvable_ancestor_becomes_placeholder() {
        let store = store_with(
            vec![],
            vec![(
                "pr",
                json!({"etymologies": [{
                    "ancestor": {"word": "prj", "language": "egy"},
                    "definitions": [{"glosses": ["house"]}]
                }]}),
            )],
            vec![],
        );
        let mut builder = NetworkBuilder::new(&store);
        let networks = builder.build_all();

        assert_eq!(networks.len(), 1);
        let net = &networks[0];
        net.validate().unwrap();
        assert_eq!(net.root_language, Language::Demotic);
        assert!(has_edge_between(net, "prj", "pr", EdgeType::Descends));
        assert!(builder.stats.placeholder_nodes >= 1);
    }

    #[test]
    fn test_standalone_coptic_dialect_variants() {
        let store = store_with(
            vec![],
            vec![],
            vec![(
                "ϣⲉ",
                json!({"etymologies": [{"definitions": [{
                    "glosses": ["wood"],
                    "alternative_forms": [
                        {"form": "ϣⲏ", "dialect": "Bohairic"},
                        {"form": "S"}
                    ]
                }]}]}),
            )],
        );
        let mut builder = NetworkBuilder::new(&store);
        let networks = builder.build_all();
        let net = &networks[0];
        net.validate().unwrap();

        // The bare dialect siglum is dropped.
        assert_eq!(net.nodes.len(), 2);
        assert!(has_edge_between(net, "ϣⲉ", "ϣⲏ", EdgeType::Variant));
        let variant = net.nodes.iter().find(|n| n.form == "ϣⲏ").unwrap();
        assert_eq!(variant.dialects, vec!["Bohairic"]);
        let edge = net
            .edges
            .iter()
            .find(|e| e.edge_type == EdgeType::Variant)
            .unwrap();
        assert_eq!(edge.notes, "Bohairic");
    }

    #[test]
    fn test_descendant_enriched_from_store() {
        let store = store_with(
            vec![(
                "ḫꜣj",
                json!({"etymologies": [{"definitions": [{
                    "glosses": ["to measure"],
                    "descendants": [{"word": "ḫy", "language": "dem"}]
                }]}]}),
            )],
            vec![(
                "ḫy",
                json!({"etymologies": [{"definitions": [{
                    "part_of_speech": "verb",
                    "glosses": ["measure (Demotic)"]
                }]}]}),
            )],
            vec![],
        );
        let mut builder = NetworkBuilder::new(&store);
        let networks = builder.build_all();
        let dem = networks[0].nodes.iter().find(|n| n.form == "ḫy").unwrap();
        assert_eq!(dem.meanings, vec!["measure (Demotic)"]);
        assert_eq!(dem.part_of_speech.as_deref(), Some("verb"));
        assert_eq!(builder.stats.placeholder_nodes, 0);
    }

    #[test]
    fn test_undated_forms_attach_to_root_not_chain() {
        let store = store_with(
            vec![(
                "nfr",
                json!({"etymologies": [{"definitions": [{
                    "glosses": ["good"],
                    "alternative_forms": [
                        {"form": "nfrw", "date": "Old Kingdom"},
                        {"form": "nfr-variant"}
                    ]
                }]}]}),
            )],
            vec![],
            vec![],
        );
        let mut builder = NetworkBuilder::new(&store);
        let networks = builder.build_all();
        let net = &networks[0];
        assert!(has_edge_between(net, "nfr", "nfr-variant", EdgeType::Variant));
        // Undated forms never extend the EVOLVES chain.
        assert!(!net.edges.iter().any(|e| {
            e.edge_type == EdgeType::Evolves && e.to == id_of(net, "nfr-variant")
        }));
    }

    #[test]
    fn test_plural_chain_derives_from_root() {
        let store = store_with(
            vec![(
                "nfr",
                json!({"etymologies": [{"definitions": [{
                    "glosses": ["good"],
                    "alternative_forms": [
                        {"form": "nfrw", "date": "Middle Kingdom", "label": "plural"}
                    ]
                }]}]}),
            )],
            vec![],
            vec![],
        );
        let mut builder = NetworkBuilder::new(&store);
        let networks = builder.build_all();
        let net = &networks[0];
        assert!(has_edge_between(net, "nfr", "nfrw", EdgeType::Derived));
        let edge = &net.edges[0];
        assert!(edge.notes.contains("Plural"));
        assert!(edge.notes.contains("Middle Kingdom"));
    }
}
