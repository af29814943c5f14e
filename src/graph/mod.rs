//! Relational graph model: nodes, relation catalog, derivation and assembly.
//!
//! A build materializes every node into a [`NodeIndex`], derives the enabled
//! relations into links and assembles both into a [`GraphPayload`] for the
//! renderer. Each build starts from scratch; nothing is cached between builds.

mod catalog;
mod derive;
mod index;
mod node;
mod relation_config;
mod stats;

pub use catalog::{Expansion, LinkWeights, RelationSpec, RelationType, CATALOG};
pub use derive::{derive, derive_links, Derivation};
pub use index::NodeIndex;
pub use node::{graph_id, Node, NodeDetail, NodeKind};
pub use relation_config::RelationConfig;
pub use stats::GraphStats;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::{Config, WorkloadLabels};
use crate::error::Result;
use crate::inventory::Inventory;

/// A directed, typed edge between two nodes (source --type--> target).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    /// Graph id of the source node.
    #[serde(rename = "source")]
    pub source_id: String,
    /// Graph id of the target node.
    #[serde(rename = "target")]
    pub target_id: String,
    #[serde(rename = "type")]
    pub relation: RelationType,
    #[serde(flatten)]
    pub weights: LinkWeights,
    pub visible: bool,
}

impl Link {
    pub(crate) fn new(source: &Node, target: &Node, spec: &RelationSpec) -> Self {
        Link {
            source_id: source.graph_id.clone(),
            target_id: target.graph_id.clone(),
            relation: spec.relation,
            weights: spec.weights,
            visible: true,
        }
    }
}

/// Final graph handed to the renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphPayload {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl GraphPayload {
    /// Concatenate every node kind with the derived links.
    pub fn assemble(index: &NodeIndex, links: Vec<Link>) -> Self {
        GraphPayload {
            nodes: index.iter().cloned().collect(),
            links,
        }
    }

    /// Same nodes, no links.
    pub fn without_links(&self) -> Self {
        GraphPayload {
            nodes: self.nodes.clone(),
            links: Vec::new(),
        }
    }

    /// SHA-256 of the serialized payload; equal for identical rebuilds.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash = hasher.finalize();
        Ok(format!("{:x}", hash))
    }

    pub fn links_of(&self, relation: RelationType) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |link| link.relation == relation)
    }
}

/// One complete build: the node index plus the derivation run over it.
#[derive(Debug, Clone)]
pub struct GraphBuild {
    pub index: NodeIndex,
    pub derivation: Derivation,
}

impl GraphBuild {
    pub fn run(inventory: &Inventory, relations: &RelationConfig, labels: &WorkloadLabels) -> Self {
        let index = NodeIndex::build(inventory, labels);
        let derivation = derive(&index, relations);

        let unresolved: usize = derivation.unresolved.values().sum();
        log::info!(
            "Built graph: {} nodes, {} links ({} unresolved references skipped)",
            index.len(),
            derivation.links.len(),
            unresolved
        );

        GraphBuild { index, derivation }
    }

    pub fn payload(&self) -> GraphPayload {
        GraphPayload::assemble(&self.index, self.derivation.links.clone())
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats::collect(&self.index, &self.derivation)
    }
}

/// Build the graph for an inventory under the given relation flags.
pub fn build_graph(
    inventory: &Inventory,
    relations: &RelationConfig,
    labels: &WorkloadLabels,
) -> GraphPayload {
    GraphBuild::run(inventory, relations, labels).payload()
}

/// Parse snapshot text and build its graph. Fails only on malformed input.
pub fn build_graph_from_str(text: &str, config: &Config) -> Result<GraphPayload> {
    let inventory = Inventory::from_json_str(text)?;
    Ok(build_graph(&inventory, &config.relations, &config.workloads))
}
