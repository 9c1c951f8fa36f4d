use super::{Op, Scope};

use crate::schema::EntityId;

/// Snapshot of an accumulated query, emitted by the builder and consumed by
/// the composer.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    /// The entity the chain is rooted at.
    pub entity: EntityId,

    /// Accumulated operations, in execution order.
    pub ops: Vec<Op>,

    /// External values available to the translator.
    pub scope: Scope,
}

impl QueryState {
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            ops: Vec::new(),
            scope: Scope::new(),
        }
    }
}
