use crate::graph::{Node, NodeDetail};
use crate::inventory::{NaturalId, RawEnvironment};

use super::display_name;

/// Materialize environment nodes
pub fn environments(raw: &[RawEnvironment]) -> Vec<Node> {
    raw.iter()
        .map(|env| {
            Node::new(
                NaturalId::from(env.id),
                display_name(env.name.as_deref(), env.id),
                NodeDetail::Environment {
                    tag_ids: env.tag_ids.clone(),
                    environment_group_id: env.group_id,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environments_preserve_order_and_fields() {
        let raw = vec![
            RawEnvironment { id: 2, name: Some("edge-02".into()), tag_ids: vec![1], group_id: Some(1) },
            RawEnvironment { id: 1, name: None, tag_ids: vec![], group_id: None },
        ];
        let nodes = environments(&raw);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].graph_id, "environment-2");
        assert_eq!(nodes[0].name, "edge-02");
        assert_eq!(nodes[1].graph_id, "environment-1");
        assert_eq!(nodes[1].name, "1");
        assert_eq!(
            nodes[0].detail,
            NodeDetail::Environment { tag_ids: vec![1], environment_group_id: Some(1) }
        );
    }
}
