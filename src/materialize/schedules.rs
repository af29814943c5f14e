use crate::graph::{Node, NodeDetail};
use crate::inventory::{NaturalId, RawSchedule};

use super::{display_name, timestamp};

/// Materialize update schedule nodes
pub fn schedules(raw: &[RawSchedule]) -> Vec<Node> {
    raw.iter()
        .map(|schedule| {
            Node::new(
                NaturalId::from(schedule.id),
                display_name(schedule.name.as_deref(), schedule.id),
                NodeDetail::Schedule {
                    group_ids: schedule.group_ids.clone(),
                    version: schedule.version.clone(),
                    created: timestamp(schedule.created),
                },
            )
        })
        .collect()
}
