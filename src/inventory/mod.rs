//! Raw inventory snapshot decoding.
//!
//! Turns the platform's JSON export into typed raw records. Only structural
//! problems with the document itself are fatal; individual records that cannot
//! be decoded are logged and skipped.

mod ids;

pub use ids::{value_as_id, value_as_text, NaturalId};

use crate::error::{FleetGraphError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::Path;

/// Top-level section holding environments
pub const ENVIRONMENTS: &str = "endpoints";
/// Top-level section holding environment groups
pub const ENVIRONMENT_GROUPS: &str = "endpoint_groups";
/// Top-level section holding per-environment runtime snapshots
pub const SNAPSHOTS: &str = "snapshots";
/// Top-level section holding update schedules
pub const SCHEDULES: &str = "edge_update_schedule";
/// Top-level section holding deployment groups
pub const DEPLOYMENT_GROUPS: &str = "edge_stack";
/// Top-level section holding groups
pub const GROUPS: &str = "edgegroups";
/// Top-level section holding labels
pub const LABELS: &str = "tags";

/// Every section a snapshot must carry, in document order.
pub const REQUIRED_SECTIONS: [&str; 7] = [
    ENVIRONMENTS,
    ENVIRONMENT_GROUPS,
    SNAPSHOTS,
    SCHEDULES,
    DEPLOYMENT_GROUPS,
    GROUPS,
    LABELS,
];

#[derive(Debug, Clone, Deserialize)]
pub struct RawEnvironment {
    #[serde(rename = "Id", deserialize_with = "ids::integer")]
    pub id: i64,
    #[serde(rename = "Name", default, deserialize_with = "ids::optional_text")]
    pub name: Option<String>,
    #[serde(rename = "TagIds", default, deserialize_with = "ids::integer_list")]
    pub tag_ids: Vec<i64>,
    #[serde(rename = "GroupId", default, deserialize_with = "ids::optional_integer")]
    pub group_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEnvironmentGroup {
    #[serde(rename = "Id", deserialize_with = "ids::integer")]
    pub id: i64,
    #[serde(rename = "Name", default, deserialize_with = "ids::optional_text")]
    pub name: Option<String>,
    #[serde(rename = "TagIds", default, deserialize_with = "ids::integer_list")]
    pub tag_ids: Vec<i64>,
}

/// Runtime snapshot of one environment with the workloads discovered in it.
#[derive(Debug, Clone)]
pub struct RawEnvironmentSnapshot {
    pub environment_id: i64,
    pub workloads: Vec<RawWorkload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWorkload {
    #[serde(rename = "Id", deserialize_with = "ids::text")]
    pub id: String,
    #[serde(rename = "Names", default)]
    pub names: Option<Vec<String>>,
    #[serde(rename = "Labels", default)]
    pub labels: Option<BTreeMap<String, JsonValue>>,
    #[serde(rename = "Image", default, deserialize_with = "ids::optional_text")]
    pub image: Option<String>,
    #[serde(rename = "Created", default, deserialize_with = "ids::optional_integer")]
    pub created: Option<i64>,
}

impl RawWorkload {
    /// Trimmed, non-empty textual value of a label.
    pub fn label(&self, key: &str) -> Option<String> {
        let value = self.labels.as_ref()?.get(key)?;
        let text = value_as_text(value)?;
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSchedule {
    #[serde(deserialize_with = "ids::integer")]
    pub id: i64,
    #[serde(default, deserialize_with = "ids::optional_text")]
    pub name: Option<String>,
    #[serde(rename = "edgeGroupIds", default, deserialize_with = "ids::integer_list")]
    pub group_ids: Vec<i64>,
    #[serde(default, deserialize_with = "ids::optional_integer")]
    pub created: Option<i64>,
    #[serde(default, deserialize_with = "ids::optional_text")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDeploymentGroup {
    #[serde(rename = "Id", deserialize_with = "ids::integer")]
    pub id: i64,
    #[serde(rename = "Name", default, deserialize_with = "ids::optional_text")]
    pub name: Option<String>,
    #[serde(rename = "EdgeGroups", default, deserialize_with = "ids::integer_list")]
    pub group_ids: Vec<i64>,
    #[serde(rename = "EdgeUpdateID", default, deserialize_with = "ids::optional_integer")]
    pub schedule_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGroup {
    #[serde(rename = "Id", deserialize_with = "ids::integer")]
    pub id: i64,
    #[serde(rename = "Name", default, deserialize_with = "ids::optional_text")]
    pub name: Option<String>,
    #[serde(rename = "Dynamic", default)]
    pub dynamic: Option<bool>,
    #[serde(rename = "Endpoints", default, deserialize_with = "ids::integer_list")]
    pub environment_ids: Vec<i64>,
    #[serde(rename = "TagIds", default, deserialize_with = "ids::nullable_integer_list")]
    pub label_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLabel {
    #[serde(rename = "ID", deserialize_with = "ids::integer")]
    pub id: i64,
    #[serde(rename = "Name", default, deserialize_with = "ids::optional_text")]
    pub name: Option<String>,
    #[serde(rename = "Endpoints", default, deserialize_with = "ids::membership_set")]
    pub environment_ids: Vec<i64>,
    #[serde(rename = "EndpointGroups", default, deserialize_with = "ids::membership_set")]
    pub environment_group_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct SnapshotRecord {
    #[serde(rename = "EndpointId", deserialize_with = "ids::integer")]
    environment_id: i64,
    #[serde(rename = "Docker", default)]
    docker: Option<DockerRecord>,
}

#[derive(Debug, Deserialize)]
struct DockerRecord {
    #[serde(rename = "DockerSnapshotRaw", default)]
    raw: Option<DockerRawRecord>,
}

#[derive(Debug, Deserialize)]
struct DockerRawRecord {
    #[serde(rename = "Containers", default)]
    containers: Option<Vec<JsonValue>>,
}

fn environment_snapshot(record: SnapshotRecord) -> RawEnvironmentSnapshot {
    let containers = record
        .docker
        .and_then(|docker| docker.raw)
        .and_then(|raw| raw.containers)
        .unwrap_or_default();
    let section = format!("{}[EndpointId={}].Containers", SNAPSHOTS, record.environment_id);
    RawEnvironmentSnapshot {
        environment_id: record.environment_id,
        workloads: decode_records(&section, containers),
    }
}

/// A decoded inventory snapshot.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub environments: Vec<RawEnvironment>,
    pub environment_groups: Vec<RawEnvironmentGroup>,
    pub snapshots: Vec<RawEnvironmentSnapshot>,
    pub schedules: Vec<RawSchedule>,
    pub deployment_groups: Vec<RawDeploymentGroup>,
    pub groups: Vec<RawGroup>,
    pub labels: Vec<RawLabel>,
}

impl Inventory {
    /// Parse snapshot text.
    ///
    /// Fails on unparsable JSON, a non-object document, or any missing section.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let document: JsonValue = serde_json::from_str(text)?;
        Self::from_value(document)
    }

    /// Read and parse a snapshot file
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(FleetGraphError::Io)?;
        Self::from_json_str(&text)
    }

    /// Decode an already parsed JSON document
    pub fn from_value(document: JsonValue) -> Result<Self> {
        let JsonValue::Object(mut sections) = document else {
            return Err(FleetGraphError::InvalidInput(
                "snapshot document must be a JSON object".to_string(),
            ));
        };

        // Check every section up front so the first missing one is reported
        // before any record is decoded.
        for name in REQUIRED_SECTIONS {
            if !matches!(sections.get(name), Some(JsonValue::Array(_))) {
                return Err(FleetGraphError::MissingSection(name.to_string()));
            }
        }

        let mut take = |name: &str| -> Vec<JsonValue> {
            match sections.remove(name) {
                Some(JsonValue::Array(items)) => items,
                _ => Vec::new(),
            }
        };

        let environments = decode_records(ENVIRONMENTS, take(ENVIRONMENTS));
        let environment_groups = decode_records(ENVIRONMENT_GROUPS, take(ENVIRONMENT_GROUPS));
        let snapshots = decode_records::<SnapshotRecord>(SNAPSHOTS, take(SNAPSHOTS))
            .into_iter()
            .map(environment_snapshot)
            .collect();
        let schedules = decode_records(SCHEDULES, take(SCHEDULES));
        let deployment_groups = decode_records(DEPLOYMENT_GROUPS, take(DEPLOYMENT_GROUPS));
        let groups = decode_records(GROUPS, take(GROUPS));
        let labels = decode_records(LABELS, take(LABELS));

        Ok(Inventory {
            environments,
            environment_groups,
            snapshots,
            schedules,
            deployment_groups,
            groups,
            labels,
        })
    }
}

fn decode_records<T: DeserializeOwned>(section: &str, items: Vec<JsonValue>) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping {} record #{}: {}", section, position, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn empty_document() -> JsonValue {
        json!({
            "endpoints": [],
            "endpoint_groups": [],
            "snapshots": [],
            "edge_update_schedule": [],
            "edge_stack": [],
            "edgegroups": [],
            "tags": []
        })
    }

    #[test]
    fn test_empty_document_decodes() {
        let inventory = Inventory::from_value(empty_document()).unwrap();
        assert!(inventory.environments.is_empty());
        assert!(inventory.labels.is_empty());
    }

    #[test]
    fn test_unparsable_text_is_fatal() {
        let err = Inventory::from_json_str("{\"endpoints\": [").unwrap_err();
        assert!(matches!(err, FleetGraphError::Json(_)));
    }

    #[test]
    fn test_non_object_is_fatal() {
        let err = Inventory::from_json_str("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, FleetGraphError::InvalidInput(_)));
    }

    #[test]
    fn test_missing_section_is_fatal() {
        let mut document = empty_document();
        document.as_object_mut().unwrap().remove("edgegroups");
        let err = Inventory::from_value(document).unwrap_err();
        match err {
            FleetGraphError::MissingSection(name) => assert_eq!(name, "edgegroups"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_section_of_wrong_shape_is_fatal() {
        let mut document = empty_document();
        document["tags"] = json!({ "1": true });
        let err = Inventory::from_value(document).unwrap_err();
        assert!(matches!(err, FleetGraphError::MissingSection(name) if name == "tags"));
    }

    #[test]
    fn test_bad_record_is_skipped() {
        let mut document = empty_document();
        document["endpoints"] = json!([
            { "Id": 1, "Name": "edge-01", "TagIds": [2], "GroupId": 1 },
            { "Name": "no-id" },
            { "Id": "3", "Name": "edge-03" }
        ]);
        let inventory = Inventory::from_value(document).unwrap();
        let ids: Vec<i64> = inventory.environments.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(inventory.environments[1].tag_ids, Vec::<i64>::new());
        assert_eq!(inventory.environments[1].group_id, None);
    }

    #[test]
    fn test_snapshot_workloads_decoded() {
        let mut document = empty_document();
        document["snapshots"] = json!([
            {
                "EndpointId": 4,
                "Docker": { "DockerSnapshotRaw": { "Containers": [
                    { "Id": "abc", "Names": ["/web"], "Labels": { "io.portainer.update.scheduleId": "7" } },
                    { "Names": ["/broken"] }
                ] } }
            },
            { "EndpointId": 5, "Docker": null }
        ]);
        let inventory = Inventory::from_value(document).unwrap();
        assert_eq!(inventory.snapshots.len(), 2);
        let first = &inventory.snapshots[0];
        assert_eq!(first.environment_id, 4);
        assert_eq!(first.workloads.len(), 1);
        assert_eq!(
            first.workloads[0].label("io.portainer.update.scheduleId").as_deref(),
            Some("7")
        );
        assert_eq!(inventory.snapshots[1].environment_id, 5);
        assert!(inventory.snapshots[1].workloads.is_empty());
    }

    #[test]
    fn test_workload_label_numeric_and_blank() {
        let workload: RawWorkload = serde_json::from_value(json!({
            "Id": "w1",
            "Labels": { "a": 7, "b": "  ", "c": null }
        }))
        .unwrap();
        assert_eq!(workload.label("a").as_deref(), Some("7"));
        assert_eq!(workload.label("b"), None);
        assert_eq!(workload.label("c"), None);
        assert_eq!(workload.label("missing"), None);
    }

    #[test]
    fn test_label_membership_sets() {
        let mut document = empty_document();
        document["tags"] = json!([
            { "ID": 2, "Name": "prod", "Endpoints": { "1": true, "3": true }, "EndpointGroups": {} }
        ]);
        let inventory = Inventory::from_value(document).unwrap();
        assert_eq!(inventory.labels[0].environment_ids, vec![1, 3]);
        assert!(inventory.labels[0].environment_group_ids.is_empty());
    }
}
