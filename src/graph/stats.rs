use serde::Serialize;
use std::collections::BTreeMap;

use super::catalog::RelationType;
use super::derive::Derivation;
use super::index::NodeIndex;
use super::node::NodeKind;

/// Per-kind and per-relation counts for one build
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphStats {
    pub nodes: BTreeMap<NodeKind, usize>,
    pub links: BTreeMap<RelationType, usize>,
    pub unresolved: BTreeMap<RelationType, usize>,
}

impl GraphStats {
    pub fn collect(index: &NodeIndex, derivation: &Derivation) -> Self {
        let nodes = NodeKind::ALL
            .iter()
            .map(|kind| (*kind, index.of_kind(*kind).len()))
            .collect();

        let mut links = BTreeMap::new();
        for link in &derivation.links {
            *links.entry(link.relation).or_insert(0) += 1;
        }

        GraphStats {
            nodes,
            links,
            unresolved: derivation.unresolved.clone(),
        }
    }

    pub fn total_nodes(&self) -> usize {
        self.nodes.values().sum()
    }

    pub fn total_links(&self) -> usize {
        self.links.values().sum()
    }

    pub fn total_unresolved(&self) -> usize {
        self.unresolved.values().sum()
    }
}
