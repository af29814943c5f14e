//! Uniform node representation shared by every entity kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::inventory::NaturalId;

/// The seven entity kinds of the inventory graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Environment,
    Workload,
    Schedule,
    DeploymentGroup,
    Group,
    EnvironmentGroup,
    Label,
}

impl NodeKind {
    /// All kinds in assembly order.
    pub const ALL: [NodeKind; 7] = [
        NodeKind::Environment,
        NodeKind::Workload,
        NodeKind::Schedule,
        NodeKind::DeploymentGroup,
        NodeKind::Group,
        NodeKind::EnvironmentGroup,
        NodeKind::Label,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Environment => "environment",
            NodeKind::Workload => "workload",
            NodeKind::Schedule => "schedule",
            NodeKind::DeploymentGroup => "deploymentgroup",
            NodeKind::Group => "group",
            NodeKind::EnvironmentGroup => "environmentgroup",
            NodeKind::Label => "label",
        }
    }

    /// Position of the kind in [`NodeKind::ALL`]
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite node key, `"<kind>-<naturalId>"`.
pub fn graph_id(kind: NodeKind, natural_id: &NaturalId) -> String {
    format!("{}-{}", kind.as_str(), natural_id)
}

/// Kind-specific fields, serialized under a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeDetail {
    #[serde(rename_all = "camelCase")]
    Environment {
        tag_ids: Vec<i64>,
        environment_group_id: Option<i64>,
    },
    #[serde(rename_all = "camelCase")]
    Workload {
        environment_id: i64,
        /// Raw schedule label value; matched against schedule ids as text.
        schedule_ref: Option<String>,
        deployment_group_ref: Option<i64>,
        image: Option<String>,
        created: Option<DateTime<Utc>>,
    },
    #[serde(rename_all = "camelCase")]
    Schedule {
        group_ids: Vec<i64>,
        version: Option<String>,
        created: Option<DateTime<Utc>>,
    },
    #[serde(rename_all = "camelCase")]
    DeploymentGroup {
        group_ids: Vec<i64>,
        schedule_ref: Option<i64>,
    },
    #[serde(rename_all = "camelCase")]
    Group {
        environment_ids: Vec<i64>,
        label_ids: Option<Vec<i64>>,
        dynamic: bool,
    },
    #[serde(rename_all = "camelCase")]
    EnvironmentGroup { tag_ids: Vec<i64> },
    #[serde(rename_all = "camelCase")]
    Label {
        environment_ids: Vec<i64>,
        environment_group_ids: Vec<i64>,
    },
}

impl NodeDetail {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeDetail::Environment { .. } => NodeKind::Environment,
            NodeDetail::Workload { .. } => NodeKind::Workload,
            NodeDetail::Schedule { .. } => NodeKind::Schedule,
            NodeDetail::DeploymentGroup { .. } => NodeKind::DeploymentGroup,
            NodeDetail::Group { .. } => NodeKind::Group,
            NodeDetail::EnvironmentGroup { .. } => NodeKind::EnvironmentGroup,
            NodeDetail::Label { .. } => NodeKind::Label,
        }
    }
}

/// A materialized graph node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub graph_id: String,
    #[serde(rename = "id")]
    pub natural_id: NaturalId,
    pub name: String,
    pub visible: bool,
    #[serde(flatten)]
    pub detail: NodeDetail,
}

impl Node {
    pub fn new(natural_id: NaturalId, name: impl Into<String>, detail: NodeDetail) -> Self {
        Node {
            graph_id: graph_id(detail.kind(), &natural_id),
            natural_id,
            name: name.into(),
            visible: true,
            detail,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.detail.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_graph_id_format() {
        assert_eq!(graph_id(NodeKind::Environment, &NaturalId::from(1)), "environment-1");
        assert_eq!(graph_id(NodeKind::Workload, &NaturalId::from("f00d")), "workload-f00d");
        assert_eq!(
            graph_id(NodeKind::DeploymentGroup, &NaturalId::from(3)),
            "deploymentgroup-3"
        );
    }

    #[test]
    fn test_kind_ordinals_match_all() {
        for (position, kind) in NodeKind::ALL.iter().enumerate() {
            assert_eq!(kind.ordinal(), position);
        }
    }

    #[test]
    fn test_node_serializes_flat() {
        let node = Node::new(
            NaturalId::from(2),
            "prod",
            NodeDetail::Group {
                environment_ids: vec![1],
                label_ids: None,
                dynamic: false,
            },
        );
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({
                "graphId": "group-2",
                "id": 2,
                "name": "prod",
                "visible": true,
                "type": "group",
                "environmentIds": [1],
                "labelIds": null,
                "dynamic": false
            })
        );
    }

    #[test]
    fn test_deployment_group_type_tag() {
        let node = Node::new(
            NaturalId::from(9),
            "stack",
            NodeDetail::DeploymentGroup {
                group_ids: vec![],
                schedule_ref: Some(1),
            },
        );
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "deploymentgroup");
        assert_eq!(value["scheduleRef"], 1);
    }
}
