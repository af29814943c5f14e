//! Workload materialization.
//!
//! Workloads are not a top-level section: they live inside the runtime
//! snapshot of each environment, and their links to schedules and deployment
//! groups are only recoverable from container labels.

use regex::Regex;
use std::sync::OnceLock;

use crate::config::WorkloadLabels;
use crate::graph::{Node, NodeDetail};
use crate::inventory::{NaturalId, RawEnvironment, RawEnvironmentSnapshot, RawWorkload};

use super::timestamp;

fn leading_id() -> &'static Regex {
    static LEADING_ID: OnceLock<Regex> = OnceLock::new();
    LEADING_ID.get_or_init(|| Regex::new(r"^\d+").expect("Invalid regex pattern"))
}

/// Deployment-group id from a working directory such as
/// `/data/compose/edge_stacks/12/v3`: the digits right after the first marker.
pub fn parse_deployment_group_ref(path: &str, marker: &str) -> Option<i64> {
    let (_, rest) = path.split_once(marker)?;
    let digits = leading_id().find(rest)?;
    digits.as_str().parse().ok()
}

/// Materialize workload nodes.
///
/// Environments are visited in order; each contributes the workloads of the
/// first snapshot declaring its id. Snapshots for unknown environments are
/// ignored.
pub fn workloads(
    environments: &[RawEnvironment],
    snapshots: &[RawEnvironmentSnapshot],
    labels: &WorkloadLabels,
) -> Vec<Node> {
    environments
        .iter()
        .filter_map(|env| {
            snapshots
                .iter()
                .find(|snapshot| snapshot.environment_id == env.id)
        })
        .flat_map(|snapshot| {
            snapshot
                .workloads
                .iter()
                .map(move |workload| workload_node(snapshot.environment_id, workload, labels))
        })
        .collect()
}

fn workload_node(environment_id: i64, workload: &RawWorkload, labels: &WorkloadLabels) -> Node {
    let schedule_ref = workload.label(&labels.schedule_label);
    let deployment_group_ref = workload
        .label(&labels.deployment_group_label)
        .and_then(|path| parse_deployment_group_ref(&path, &labels.deployment_group_marker));

    Node::new(
        NaturalId::from(workload.id.as_str()),
        workload_name(workload),
        NodeDetail::Workload {
            environment_id,
            schedule_ref,
            deployment_group_ref,
            image: workload.image.clone(),
            created: timestamp(workload.created),
        },
    )
}

/// Container names carry a leading `/`; unnamed workloads use a short id.
fn workload_name(workload: &RawWorkload) -> String {
    workload
        .names
        .as_ref()
        .and_then(|names| names.first())
        .map(|name| name.trim_start_matches('/'))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| workload.id.chars().take(12).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn workload(value: serde_json::Value) -> RawWorkload {
        serde_json::from_value(value).unwrap()
    }

    fn environment(id: i64) -> RawEnvironment {
        RawEnvironment { id, name: None, tag_ids: vec![], group_id: None }
    }

    #[test]
    fn test_parse_deployment_group_ref() {
        let marker = "/edge_stacks/";
        assert_eq!(parse_deployment_group_ref("/data/compose/edge_stacks/12", marker), Some(12));
        assert_eq!(parse_deployment_group_ref("/data/edge_stacks/12/v3", marker), Some(12));
        assert_eq!(parse_deployment_group_ref("/data/compose/42", marker), None);
        assert_eq!(parse_deployment_group_ref("/data/edge_stacks/abc", marker), None);
        assert_eq!(parse_deployment_group_ref("/data/edge_stacks/", marker), None);
    }

    #[test]
    fn test_workloads_follow_environment_order() {
        let environments = vec![environment(2), environment(1)];
        let snapshots = vec![
            RawEnvironmentSnapshot {
                environment_id: 1,
                workloads: vec![workload(json!({ "Id": "a1", "Names": ["/alpha"] }))],
            },
            RawEnvironmentSnapshot {
                environment_id: 2,
                workloads: vec![workload(json!({ "Id": "b1", "Names": ["/beta"] }))],
            },
            RawEnvironmentSnapshot {
                environment_id: 99,
                workloads: vec![workload(json!({ "Id": "orphan" }))],
            },
        ];
        let nodes = workloads(&environments, &snapshots, &WorkloadLabels::default());
        let ids: Vec<&str> = nodes.iter().map(|n| n.graph_id.as_str()).collect();
        assert_eq!(ids, vec!["workload-b1", "workload-a1"]);
        assert_eq!(nodes[0].name, "beta");
    }

    #[test]
    fn test_workload_back_references_from_labels() {
        let environments = vec![environment(1)];
        let snapshots = vec![RawEnvironmentSnapshot {
            environment_id: 1,
            workloads: vec![
                workload(json!({
                    "Id": "0123456789abcdef",
                    "Names": [],
                    "Labels": {
                        "io.portainer.update.scheduleId": "7",
                        "com.docker.compose.project.working_dir": "/data/compose/edge_stacks/3"
                    }
                })),
                workload(json!({ "Id": "bare", "Names": ["/bare"] })),
            ],
        }];
        let nodes = workloads(&environments, &snapshots, &WorkloadLabels::default());
        assert_eq!(nodes[0].name, "0123456789ab");
        assert_eq!(
            nodes[0].detail,
            NodeDetail::Workload {
                environment_id: 1,
                schedule_ref: Some("7".to_string()),
                deployment_group_ref: Some(3),
                image: None,
                created: None,
            }
        );
        match &nodes[1].detail {
            NodeDetail::Workload { schedule_ref, deployment_group_ref, .. } => {
                assert_eq!(schedule_ref, &None);
                assert_eq!(deployment_group_ref, &None);
            }
            other => panic!("unexpected detail: {:?}", other),
        }
    }

    #[test]
    fn test_custom_label_keys() {
        let labels = WorkloadLabels {
            schedule_label: "sched".to_string(),
            deployment_group_label: "dir".to_string(),
            deployment_group_marker: "/stacks/".to_string(),
        };
        let environments = vec![environment(1)];
        let snapshots = vec![RawEnvironmentSnapshot {
            environment_id: 1,
            workloads: vec![workload(json!({
                "Id": "w",
                "Labels": { "sched": "4", "dir": "/srv/stacks/9" }
            }))],
        }];
        let nodes = workloads(&environments, &snapshots, &labels);
        match &nodes[0].detail {
            NodeDetail::Workload { schedule_ref, deployment_group_ref, .. } => {
                assert_eq!(schedule_ref.as_deref(), Some("4"));
                assert_eq!(deployment_group_ref, &Some(9));
            }
            other => panic!("unexpected detail: {:?}", other),
        }
    }
}
