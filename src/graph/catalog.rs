//! Relation catalog: the declarative table of every relation type.
//!
//! Each entry says which node kind the engine iterates, which kind it resolves
//! references against, how the references are read off the iterated node and
//! whether the emitted link points back at the iterated node.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::node::{Node, NodeDetail, NodeKind};

/// Closed set of relation types, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationType {
    WorkloadToEnvironment,
    ScheduleToWorkload,
    ScheduleToGroup,
    ScheduleToDeploymentGroup,
    DeploymentGroupToGroup,
    DeploymentGroupToWorkload,
    GroupToEnvironment,
    GroupToLabel,
    LabelToEnvironment,
    LabelToEnvironmentGroup,
    EnvironmentGroupToEnvironment,
}

impl RelationType {
    pub const ALL: [RelationType; 11] = [
        RelationType::WorkloadToEnvironment,
        RelationType::ScheduleToWorkload,
        RelationType::ScheduleToGroup,
        RelationType::ScheduleToDeploymentGroup,
        RelationType::DeploymentGroupToGroup,
        RelationType::DeploymentGroupToWorkload,
        RelationType::GroupToEnvironment,
        RelationType::GroupToLabel,
        RelationType::LabelToEnvironment,
        RelationType::LabelToEnvironmentGroup,
        RelationType::EnvironmentGroupToEnvironment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::WorkloadToEnvironment => "workload-to-environment",
            RelationType::ScheduleToWorkload => "schedule-to-workload",
            RelationType::ScheduleToGroup => "schedule-to-group",
            RelationType::ScheduleToDeploymentGroup => "schedule-to-deployment-group",
            RelationType::DeploymentGroupToGroup => "deployment-group-to-group",
            RelationType::DeploymentGroupToWorkload => "deployment-group-to-workload",
            RelationType::GroupToEnvironment => "group-to-environment",
            RelationType::GroupToLabel => "group-to-label",
            RelationType::LabelToEnvironment => "label-to-environment",
            RelationType::LabelToEnvironmentGroup => "label-to-environment-group",
            RelationType::EnvironmentGroupToEnvironment => "environment-group-to-environment",
        }
    }

    /// Catalog entry for this relation
    pub fn spec(&self) -> &'static RelationSpec {
        &CATALOG[*self as usize]
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationType::ALL
            .iter()
            .copied()
            .find(|relation| relation.as_str() == s)
            .ok_or_else(|| format!("unknown relation type: {}", s))
    }
}

/// How references are laid out on the iterated node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// A single back-reference; at most one link per iterated node.
    Scalar,
    /// An array of ids; one link per resolvable element.
    Members,
}

/// Physical simulation hints for the renderer. Not used by derivation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkWeights {
    pub distance: f32,
    pub strength: f32,
    pub particles: u32,
}

/// One catalog entry
pub struct RelationSpec {
    pub relation: RelationType,
    /// Kind whose nodes carry the references
    pub iterate: NodeKind,
    /// Kind the references resolve against
    pub matched: NodeKind,
    pub expansion: Expansion,
    /// Emit `matched -> iterated` instead of `iterated -> matched`
    pub inverted: bool,
    /// Canonical reference keys read off the iterated node
    pub references: fn(&NodeDetail) -> Vec<String>,
    pub weights: LinkWeights,
}

impl fmt::Debug for RelationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationSpec")
            .field("relation", &self.relation)
            .field("iterate", &self.iterate)
            .field("matched", &self.matched)
            .field("expansion", &self.expansion)
            .field("inverted", &self.inverted)
            .field("weights", &self.weights)
            .finish()
    }
}

impl RelationSpec {
    /// Kind at the emitted link's source
    pub fn source_kind(&self) -> NodeKind {
        if self.inverted {
            self.matched
        } else {
            self.iterate
        }
    }

    /// Kind at the emitted link's target
    pub fn target_kind(&self) -> NodeKind {
        if self.inverted {
            self.iterate
        } else {
            self.matched
        }
    }

    /// Reference keys of `node`, truncated to one for scalar relations.
    pub fn references_of(&self, node: &Node) -> Vec<String> {
        if node.kind() != self.iterate {
            return Vec::new();
        }
        let mut keys = (self.references)(&node.detail);
        if self.expansion == Expansion::Scalar {
            keys.truncate(1);
        }
        keys
    }

    /// Matching predicate: does `iterated` reference `candidate` under this relation?
    pub fn matches(&self, iterated: &Node, candidate: &Node) -> bool {
        candidate.kind() == self.matched
            && self
                .references_of(iterated)
                .iter()
                .any(|key| *key == candidate.natural_id.key())
    }

    /// Order a resolved pair as `(source, target)`.
    pub fn orient<'a>(&self, iterated: &'a Node, matched: &'a Node) -> (&'a Node, &'a Node) {
        if self.inverted {
            (matched, iterated)
        } else {
            (iterated, matched)
        }
    }
}

fn keys(ids: &[i64]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

fn workload_environment(detail: &NodeDetail) -> Vec<String> {
    match detail {
        NodeDetail::Workload { environment_id, .. } => vec![environment_id.to_string()],
        _ => Vec::new(),
    }
}

// Label values are text already; the schedule side is stringified through
// `NaturalId::key`, so "7" meets 7 without any implicit coercion.
fn workload_schedule(detail: &NodeDetail) -> Vec<String> {
    match detail {
        NodeDetail::Workload { schedule_ref, .. } => schedule_ref.iter().cloned().collect(),
        _ => Vec::new(),
    }
}

fn workload_deployment_group(detail: &NodeDetail) -> Vec<String> {
    match detail {
        NodeDetail::Workload { deployment_group_ref, .. } => {
            deployment_group_ref.iter().map(|id| id.to_string()).collect()
        }
        _ => Vec::new(),
    }
}

fn schedule_groups(detail: &NodeDetail) -> Vec<String> {
    match detail {
        NodeDetail::Schedule { group_ids, .. } => keys(group_ids),
        _ => Vec::new(),
    }
}

fn deployment_group_schedule(detail: &NodeDetail) -> Vec<String> {
    match detail {
        NodeDetail::DeploymentGroup { schedule_ref, .. } => {
            schedule_ref.iter().map(|id| id.to_string()).collect()
        }
        _ => Vec::new(),
    }
}

fn deployment_group_groups(detail: &NodeDetail) -> Vec<String> {
    match detail {
        NodeDetail::DeploymentGroup { group_ids, .. } => keys(group_ids),
        _ => Vec::new(),
    }
}

fn group_environments(detail: &NodeDetail) -> Vec<String> {
    match detail {
        NodeDetail::Group { environment_ids, .. } => keys(environment_ids),
        _ => Vec::new(),
    }
}

fn group_labels(detail: &NodeDetail) -> Vec<String> {
    match detail {
        NodeDetail::Group { label_ids: Some(label_ids), .. } => keys(label_ids),
        _ => Vec::new(),
    }
}

fn environment_labels(detail: &NodeDetail) -> Vec<String> {
    match detail {
        NodeDetail::Environment { tag_ids, .. } => keys(tag_ids),
        _ => Vec::new(),
    }
}

fn label_environment_groups(detail: &NodeDetail) -> Vec<String> {
    match detail {
        NodeDetail::Label { environment_group_ids, .. } => keys(environment_group_ids),
        _ => Vec::new(),
    }
}

fn environment_environment_group(detail: &NodeDetail) -> Vec<String> {
    match detail {
        NodeDetail::Environment { environment_group_id, .. } => {
            environment_group_id.iter().map(|id| id.to_string()).collect()
        }
        _ => Vec::new(),
    }
}

/// Every relation type, indexed by `RelationType as usize`.
pub static CATALOG: [RelationSpec; 11] = [
    RelationSpec {
        relation: RelationType::WorkloadToEnvironment,
        iterate: NodeKind::Workload,
        matched: NodeKind::Environment,
        expansion: Expansion::Scalar,
        inverted: false,
        references: workload_environment,
        weights: LinkWeights { distance: 20.0, strength: 1.0, particles: 0 },
    },
    RelationSpec {
        relation: RelationType::ScheduleToWorkload,
        iterate: NodeKind::Workload,
        matched: NodeKind::Schedule,
        expansion: Expansion::Scalar,
        inverted: true,
        references: workload_schedule,
        weights: LinkWeights { distance: 60.0, strength: 0.3, particles: 2 },
    },
    RelationSpec {
        relation: RelationType::ScheduleToGroup,
        iterate: NodeKind::Schedule,
        matched: NodeKind::Group,
        expansion: Expansion::Members,
        inverted: false,
        references: schedule_groups,
        weights: LinkWeights { distance: 50.0, strength: 0.5, particles: 1 },
    },
    RelationSpec {
        relation: RelationType::ScheduleToDeploymentGroup,
        iterate: NodeKind::DeploymentGroup,
        matched: NodeKind::Schedule,
        expansion: Expansion::Scalar,
        inverted: true,
        references: deployment_group_schedule,
        weights: LinkWeights { distance: 50.0, strength: 0.5, particles: 1 },
    },
    RelationSpec {
        relation: RelationType::DeploymentGroupToGroup,
        iterate: NodeKind::DeploymentGroup,
        matched: NodeKind::Group,
        expansion: Expansion::Members,
        inverted: false,
        references: deployment_group_groups,
        weights: LinkWeights { distance: 40.0, strength: 0.5, particles: 1 },
    },
    RelationSpec {
        relation: RelationType::DeploymentGroupToWorkload,
        iterate: NodeKind::Workload,
        matched: NodeKind::DeploymentGroup,
        expansion: Expansion::Scalar,
        inverted: true,
        references: workload_deployment_group,
        weights: LinkWeights { distance: 40.0, strength: 0.4, particles: 1 },
    },
    RelationSpec {
        relation: RelationType::GroupToEnvironment,
        iterate: NodeKind::Group,
        matched: NodeKind::Environment,
        expansion: Expansion::Members,
        inverted: false,
        references: group_environments,
        weights: LinkWeights { distance: 30.0, strength: 0.7, particles: 0 },
    },
    RelationSpec {
        relation: RelationType::GroupToLabel,
        iterate: NodeKind::Group,
        matched: NodeKind::Label,
        expansion: Expansion::Members,
        inverted: false,
        references: group_labels,
        weights: LinkWeights { distance: 30.0, strength: 0.7, particles: 0 },
    },
    RelationSpec {
        relation: RelationType::LabelToEnvironment,
        iterate: NodeKind::Environment,
        matched: NodeKind::Label,
        expansion: Expansion::Members,
        inverted: true,
        references: environment_labels,
        weights: LinkWeights { distance: 30.0, strength: 0.6, particles: 0 },
    },
    RelationSpec {
        relation: RelationType::LabelToEnvironmentGroup,
        iterate: NodeKind::Label,
        matched: NodeKind::EnvironmentGroup,
        expansion: Expansion::Members,
        inverted: false,
        references: label_environment_groups,
        weights: LinkWeights { distance: 30.0, strength: 0.6, particles: 0 },
    },
    RelationSpec {
        relation: RelationType::EnvironmentGroupToEnvironment,
        iterate: NodeKind::Environment,
        matched: NodeKind::EnvironmentGroup,
        expansion: Expansion::Scalar,
        inverted: true,
        references: environment_environment_group,
        weights: LinkWeights { distance: 30.0, strength: 0.8, particles: 0 },
    },
];
