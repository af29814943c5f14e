use crate::graph::{Node, NodeDetail};
use crate::inventory::{NaturalId, RawLabel};

use super::display_name;

/// Materialize label nodes; membership sets arrive already converted to id lists.
pub fn labels(raw: &[RawLabel]) -> Vec<Node> {
    raw.iter()
        .map(|label| {
            Node::new(
                NaturalId::from(label.id),
                display_name(label.name.as_deref(), label.id),
                NodeDetail::Label {
                    environment_ids: label.environment_ids.clone(),
                    environment_group_ids: label.environment_group_ids.clone(),
                },
            )
        })
        .collect()
}
