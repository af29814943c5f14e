//! Relation derivation engine.

use std::collections::BTreeMap;

use super::catalog::{RelationSpec, RelationType, CATALOG};
use super::index::NodeIndex;
use super::relation_config::RelationConfig;
use super::Link;

/// Result of one derivation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derivation {
    /// Links grouped by relation type in catalog order
    pub links: Vec<Link>,
    /// References that named a node missing from the index, per relation type
    pub unresolved: BTreeMap<RelationType, usize>,
}

/// Derive every enabled relation. See [`derive`].
pub fn derive_links(index: &NodeIndex, config: &RelationConfig) -> Vec<Link> {
    derive(index, config).links
}

/// Run each enabled catalog entry over the index.
///
/// Unresolvable references are skipped one by one and counted; they never
/// abort the relation or the other elements of the same node.
pub fn derive(index: &NodeIndex, config: &RelationConfig) -> Derivation {
    let mut derivation = Derivation::default();

    for spec in CATALOG.iter().filter(|spec| config.is_enabled(spec.relation)) {
        let before = derivation.links.len();
        let unresolved = resolve_relation(spec, index, &mut derivation.links);
        if unresolved > 0 {
            derivation.unresolved.insert(spec.relation, unresolved);
        }
        log::debug!(
            "{}: {} links, {} unresolved references",
            spec.relation,
            derivation.links.len() - before,
            unresolved
        );
    }

    derivation
}

fn resolve_relation(spec: &RelationSpec, index: &NodeIndex, links: &mut Vec<Link>) -> usize {
    let mut unresolved = 0;

    for iterated in index.of_kind(spec.iterate) {
        for key in spec.references_of(iterated) {
            match index.resolve(spec.matched, &key) {
                Some(matched) => {
                    let (source, target) = spec.orient(iterated, matched);
                    links.push(Link::new(source, target, spec));
                }
                None => {
                    log::debug!(
                        "{}: {} references missing {} {}",
                        spec.relation,
                        iterated.graph_id,
                        spec.matched,
                        key
                    );
                    unresolved += 1;
                }
            }
        }
    }

    unresolved
}
