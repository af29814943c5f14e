//! Node index: every materialized node, grouped by kind, with O(1) lookup by
//! natural id.

use std::collections::HashMap;

use crate::config::WorkloadLabels;
use crate::inventory::Inventory;
use crate::materialize;

use super::node::{Node, NodeKind};

/// All nodes of one snapshot, built once per build.
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    by_kind: [Vec<Node>; 7],
    positions: HashMap<(NodeKind, String), usize>,
}

impl NodeIndex {
    /// Run every materializer over the inventory.
    pub fn build(inventory: &Inventory, labels: &WorkloadLabels) -> Self {
        let mut index = NodeIndex::default();
        index.extend(materialize::environments(&inventory.environments));
        index.extend(materialize::workloads(
            &inventory.environments,
            &inventory.snapshots,
            labels,
        ));
        index.extend(materialize::schedules(&inventory.schedules));
        index.extend(materialize::deployment_groups(&inventory.deployment_groups));
        index.extend(materialize::groups(&inventory.groups));
        index.extend(materialize::environment_groups(&inventory.environment_groups));
        index.extend(materialize::labels(&inventory.labels));
        index
    }

    /// Add a node. The first node seen for a graph id wins; later duplicates
    /// are dropped so graph ids stay unique.
    pub fn insert(&mut self, node: Node) -> bool {
        let kind = node.kind();
        let key = (kind, node.natural_id.key());
        if self.positions.contains_key(&key) {
            log::warn!("Dropping duplicate node {}", node.graph_id);
            return false;
        }
        let nodes = &mut self.by_kind[kind.ordinal()];
        self.positions.insert(key, nodes.len());
        nodes.push(node);
        true
    }

    pub fn extend(&mut self, nodes: impl IntoIterator<Item = Node>) {
        for node in nodes {
            self.insert(node);
        }
    }

    /// Nodes of one kind, in source order
    pub fn of_kind(&self, kind: NodeKind) -> &[Node] {
        &self.by_kind[kind.ordinal()]
    }

    /// Look a node up by kind and canonical natural-id key
    pub fn resolve(&self, kind: NodeKind, key: &str) -> Option<&Node> {
        let position = self.positions.get(&(kind, key.to_string()))?;
        self.by_kind[kind.ordinal()].get(*position)
    }

    /// Look a node up by graph id
    pub fn get(&self, graph_id: &str) -> Option<&Node> {
        NodeKind::ALL.iter().find_map(|kind| {
            let key = graph_id.strip_prefix(kind.as_str())?.strip_prefix('-')?;
            self.resolve(*kind, key)
        })
    }

    /// Every node, kinds in [`NodeKind::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.by_kind.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeDetail;
    use crate::inventory::NaturalId;

    fn environment(id: i64, name: &str) -> Node {
        Node::new(
            NaturalId::from(id),
            name,
            NodeDetail::Environment { tag_ids: vec![], environment_group_id: None },
        )
    }

    fn label(id: i64) -> Node {
        Node::new(
            NaturalId::from(id),
            "l",
            NodeDetail::Label { environment_ids: vec![], environment_group_ids: vec![] },
        )
    }

    #[test]
    fn test_first_duplicate_wins() {
        let mut index = NodeIndex::default();
        assert!(index.insert(environment(1, "first")));
        assert!(!index.insert(environment(1, "second")));
        assert_eq!(index.len(), 1);
        assert_eq!(index.resolve(NodeKind::Environment, "1").unwrap().name, "first");
    }

    #[test]
    fn test_same_id_different_kind_coexist() {
        let mut index = NodeIndex::default();
        index.extend(vec![environment(1, "env"), label(1)]);
        assert_eq!(index.len(), 2);
        assert!(index.resolve(NodeKind::Label, "1").is_some());
        assert!(index.resolve(NodeKind::Group, "1").is_none());
    }

    #[test]
    fn test_iter_orders_by_kind_then_source() {
        let mut index = NodeIndex::default();
        index.extend(vec![label(5), environment(2, "b"), environment(1, "a")]);
        let ids: Vec<&str> = index.iter().map(|n| n.graph_id.as_str()).collect();
        assert_eq!(ids, vec!["environment-2", "environment-1", "label-5"]);
    }

    #[test]
    fn test_get_by_graph_id() {
        let mut index = NodeIndex::default();
        index.extend(vec![environment(3, "c"), label(3)]);
        assert_eq!(index.get("environment-3").unwrap().name, "c");
        assert_eq!(index.get("label-3").unwrap().kind(), NodeKind::Label);
        assert!(index.get("environmentgroup-3").is_none());
        assert!(index.get("nothing").is_none());
    }
}
