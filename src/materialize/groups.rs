use crate::graph::{Node, NodeDetail};
use crate::inventory::{NaturalId, RawGroup};

use super::display_name;

/// Materialize group nodes. `label_ids` stays `None` when the source has `null`.
pub fn groups(raw: &[RawGroup]) -> Vec<Node> {
    raw.iter()
        .map(|group| {
            Node::new(
                NaturalId::from(group.id),
                display_name(group.name.as_deref(), group.id),
                NodeDetail::Group {
                    environment_ids: group.environment_ids.clone(),
                    label_ids: group.label_ids.clone(),
                    dynamic: group.dynamic.unwrap_or(false),
                },
            )
        })
        .collect()
}
