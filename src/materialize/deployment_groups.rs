use crate::graph::{Node, NodeDetail};
use crate::inventory::{NaturalId, RawDeploymentGroup};

use super::display_name;

/// Materialize deployment group nodes
pub fn deployment_groups(raw: &[RawDeploymentGroup]) -> Vec<Node> {
    raw.iter()
        .map(|stack| {
            Node::new(
                NaturalId::from(stack.id),
                display_name(stack.name.as_deref(), stack.id),
                NodeDetail::DeploymentGroup {
                    group_ids: stack.group_ids.clone(),
                    schedule_ref: stack.schedule_id,
                },
            )
        })
        .collect()
}
