//! Enabled/disabled flags for every relation type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::catalog::RelationType;

/// Which relation types the derivation engine should emit.
///
/// Always holds a flag for every [`RelationType`]. When deserialized from a
/// table, missing keys stay enabled and unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, bool>", into = "BTreeMap<String, bool>")]
pub struct RelationConfig {
    enabled: BTreeMap<RelationType, bool>,
}

impl Default for RelationConfig {
    fn default() -> Self {
        Self::all_enabled()
    }
}

impl RelationConfig {
    pub fn all_enabled() -> Self {
        RelationConfig {
            enabled: RelationType::ALL.iter().map(|r| (*r, true)).collect(),
        }
    }

    pub fn all_disabled() -> Self {
        RelationConfig {
            enabled: RelationType::ALL.iter().map(|r| (*r, false)).collect(),
        }
    }

    pub fn is_enabled(&self, relation: RelationType) -> bool {
        self.enabled.get(&relation).copied().unwrap_or(true)
    }

    pub fn set(&mut self, relation: RelationType, enabled: bool) {
        self.enabled.insert(relation, enabled);
    }

    /// Builder-style [`RelationConfig::set`]
    pub fn with(mut self, relation: RelationType, enabled: bool) -> Self {
        self.set(relation, enabled);
        self
    }

    /// Flags in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (RelationType, bool)> + '_ {
        self.enabled.iter().map(|(relation, enabled)| (*relation, *enabled))
    }

    /// Enabled relation types in catalog order
    pub fn enabled(&self) -> impl Iterator<Item = RelationType> + '_ {
        self.iter().filter(|(_, on)| *on).map(|(relation, _)| relation)
    }
}

impl TryFrom<BTreeMap<String, bool>> for RelationConfig {
    type Error = String;

    fn try_from(table: BTreeMap<String, bool>) -> Result<Self, Self::Error> {
        let mut config = RelationConfig::all_enabled();
        for (name, enabled) in table {
            config.set(name.parse()?, enabled);
        }
        Ok(config)
    }
}

impl From<RelationConfig> for BTreeMap<String, bool> {
    fn from(config: RelationConfig) -> Self {
        config
            .enabled
            .into_iter()
            .map(|(relation, enabled)| (relation.as_str().to_string(), enabled))
            .collect()
    }
}
