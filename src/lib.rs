pub mod config;
pub mod error;
pub mod graph;
pub mod inventory;
pub mod materialize;

pub use config::{Config, RenderOptions, WorkloadLabels};
pub use error::{FleetGraphError, Result};
pub use graph::{
    build_graph, build_graph_from_str, derive_links, GraphBuild, GraphPayload, Link, Node,
    NodeIndex, NodeKind, RelationConfig, RelationType,
};
pub use inventory::Inventory;
