//! Post-build edge cleanup.
//!
//! Multiple Egyptian forms independently naming the same descendant leave
//! shortcut DESCENDS edges behind, typically a direct Egyptian → Coptic
//! edge next to the Egyptian → Demotic → Coptic path. The longer path
//! through the later form is the real genealogy; the shortcut goes.

use lemma_types::{EdgeType, Language, Network, Node};

use crate::period::{self, UNDATED_RANK};

#[derive(Debug, Default)]
pub struct CleanupStats {
    pub removed_edges: usize,
    pub networks_touched: usize,
}

/// Remove redundant DESCENDS shortcuts from every network, iterating each
/// network to a fixed point. Deterministic (edges are examined in stored
/// order) and idempotent.
pub fn remove_redundant_descends(networks: &mut [Network]) -> CleanupStats {
    let mut stats = CleanupStats::default();
    for net in networks.iter_mut() {
        let mut removed_here = 0;
        while let Some(i) = find_redundant(net) {
            net.edges.remove(i);
            removed_here += 1;
        }
        if removed_here > 0 {
            stats.removed_edges += removed_here;
            stats.networks_touched += 1;
        }
    }
    stats
}

fn find_redundant(net: &Network) -> Option<usize> {
    (0..net.edges.len())
        .find(|&i| net.edges[i].edge_type == EdgeType::Descends && is_redundant(net, i))
}

/// A DESCENDS edge (f, d) is redundant when some strictly later
/// Egyptian-family form m is reachable from f over the temporal edges
/// (excluding the edge under test) and (m, d) is itself a DESCENDS edge.
fn is_redundant(net: &Network, i: usize) -> bool {
    let edge = &net.edges[i];
    let Some(from) = net.node(&edge.from) else {
        return false;
    };

    let mut queue = vec![edge.from.as_str()];
    let mut seen = vec![edge.from.as_str()];
    while let Some(cur) = queue.pop() {
        for (j, e) in net.edges.iter().enumerate() {
            if j == i || !e.edge_type.is_temporal() || e.from != cur {
                continue;
            }
            if seen.contains(&e.to.as_str()) {
                continue;
            }
            seen.push(&e.to);
            queue.push(&e.to);

            let Some(mid) = net.node(&e.to) else { continue };
            if mid.language.is_egyptian_family()
                && mid.language != Language::Coptic
                && strictly_later(mid, from)
                && net.edges.iter().enumerate().any(|(k, e2)| {
                    k != i && e2.edge_type == EdgeType::Descends && e2.from == e.to && e2.to == edge.to
                })
            {
                return true;
            }
        }
    }
    false
}

/// Chronological order over forms: language stage first, then period rank
/// within a stage. Undated forms never count as later within one stage.
fn strictly_later(m: &Node, f: &Node) -> bool {
    let stage_m = m.language.stage();
    let stage_f = f.language.stage();
    if stage_m != stage_f {
        return stage_m > stage_f;
    }
    let rank_m = m.period.as_deref().map_or(UNDATED_RANK, period::rank);
    let rank_f = f.period.as_deref().map_or(UNDATED_RANK, period::rank);
    rank_m != UNDATED_RANK && rank_f != UNDATED_RANK && rank_m > rank_f
}
