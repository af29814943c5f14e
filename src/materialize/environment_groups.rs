use crate::graph::{Node, NodeDetail};
use crate::inventory::{NaturalId, RawEnvironmentGroup};

use super::display_name;

/// Materialize environment group nodes
pub fn environment_groups(raw: &[RawEnvironmentGroup]) -> Vec<Node> {
    raw.iter()
        .map(|group| {
            Node::new(
                NaturalId::from(group.id),
                display_name(group.name.as_deref(), group.id),
                NodeDetail::EnvironmentGroup {
                    tag_ids: group.tag_ids.clone(),
                },
            )
        })
        .collect()
}
