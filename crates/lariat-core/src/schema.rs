mod column;
pub use column::{ColumnDescriptor, ColumnOptions};

mod registry;
pub use registry::{
    columns_of, register_column, register_relation, register_table, relation_of, relations_of,
    table, table_of,
};

mod relation;
pub use relation::{JoinKind, RelationDescriptor, RelationKind, RelationOptions};

mod table;
pub use table::{TableDescriptor, TableOptions};

use std::any::TypeId;

/// Marker trait for types declared as entities.
///
/// `NAME` is the entity's class name; the table name defaults to its
/// lower-cased form.
pub trait Entity: 'static {
    const NAME: &'static str;
}

/// Identifies a registered entity.
///
/// Identity is the entity's `TypeId`; the name rides along for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct EntityId {
    type_id: TypeId,
    name: &'static str,
}

impl EntityId {
    pub fn of<E: Entity>() -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            name: E::NAME,
        }
    }

    /// The entity's declared class name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EntityId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for EntityId {}

impl std::hash::Hash for EntityId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}
