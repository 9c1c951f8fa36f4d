use super::{
    ColumnDescriptor, ColumnOptions, Entity, EntityId, RelationDescriptor, RelationKind,
    RelationOptions, TableDescriptor, TableOptions,
};
use crate::{Error, Result};

use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

/// The process-wide descriptor store.
///
/// Descriptors are installed while entity declarations are processed during
/// application start-up and are read-only afterward. Re-registering an
/// entity or field overwrites the previous descriptor.
#[derive(Debug, Default)]
struct Registry {
    tables: HashMap<EntityId, TableDescriptor>,
    columns: HashMap<EntityId, IndexMap<String, ColumnDescriptor>>,
    relations: HashMap<EntityId, IndexMap<String, RelationDescriptor>>,
}

fn global() -> &'static RwLock<Registry> {
    static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(Registry::default()))
}

/// Registers an entity as a queryable table root.
pub fn register_table<E: Entity>(options: TableOptions) {
    let entity = EntityId::of::<E>();
    let table_name = options.name.unwrap_or_else(|| E::NAME.to_lowercase());

    global()
        .write()
        .unwrap()
        .tables
        .insert(entity, TableDescriptor { entity, table_name });
}

/// Registers an entity field as a column.
///
/// Column order follows registration order and seeds the projection of every
/// query rooted at the entity.
pub fn register_column<E: Entity>(field_name: &str, options: ColumnOptions) {
    let descriptor = ColumnDescriptor {
        field_name: field_name.to_string(),
        column_name: options.name.unwrap_or_else(|| field_name.to_string()),
        sql_type: options.sql_type,
        nullable: options.nullable,
        default: options.default,
        unique: options.unique,
        primary: options.primary,
        length: options.length,
    };

    global()
        .write()
        .unwrap()
        .columns
        .entry(EntityId::of::<E>())
        .or_default()
        .insert(field_name.to_string(), descriptor);
}

/// Registers an entity field as a relation.
///
/// Key defaults depend on the relation kind: a `HasMany` joins the owner's
/// `id` to the target's `<owner>_id`, while a `BelongsTo` joins the owner's
/// `<target>_id` to the target's `id`.
pub fn register_relation<E: Entity>(field_name: &str, options: RelationOptions) {
    let (foreign_key, principal_key) = match options.kind {
        RelationKind::HasMany => (
            options.foreign_key.unwrap_or_else(|| "id".to_string()),
            options
                .principal_key
                .unwrap_or_else(|| format!("{}_id", E::NAME.to_lowercase())),
        ),
        RelationKind::BelongsTo => (
            options
                .foreign_key
                .unwrap_or_else(|| format!("{}_id", (options.target)().name().to_lowercase())),
            options.principal_key.unwrap_or_else(|| "id".to_string()),
        ),
    };

    let descriptor = RelationDescriptor {
        field_name: field_name.to_string(),
        kind: options.kind,
        target: options.target,
        join_kind: options.join_kind,
        foreign_key,
        principal_key,
        nullable: options.nullable,
        eager: options.eager,
    };

    global()
        .write()
        .unwrap()
        .relations
        .entry(EntityId::of::<E>())
        .or_default()
        .insert(field_name.to_string(), descriptor);
}

/// Looks up the table descriptor for an entity.
pub fn table<E: Entity>() -> Result<TableDescriptor> {
    table_of(EntityId::of::<E>())
}

/// Looks up the table descriptor for an entity id. Errors if the entity was
/// never registered as a table.
pub fn table_of(entity: EntityId) -> Result<TableDescriptor> {
    global()
        .read()
        .unwrap()
        .tables
        .get(&entity)
        .cloned()
        .ok_or_else(|| {
            Error::invalid_schema(format!(
                "no table registered for entity `{}`",
                entity.name()
            ))
        })
}

/// Returns the entity's columns, keyed by field name in registration order.
/// An entity with no registered columns yields an empty map.
pub fn columns_of(entity: EntityId) -> IndexMap<String, ColumnDescriptor> {
    global()
        .read()
        .unwrap()
        .columns
        .get(&entity)
        .cloned()
        .unwrap_or_default()
}

/// Returns the entity's relations, keyed by field name.
pub fn relations_of(entity: EntityId) -> IndexMap<String, RelationDescriptor> {
    global()
        .read()
        .unwrap()
        .relations
        .get(&entity)
        .cloned()
        .unwrap_or_default()
}

/// Looks up a single relation. Errors if the entity does not declare it.
pub fn relation_of(entity: EntityId, field_name: &str) -> Result<RelationDescriptor> {
    global()
        .read()
        .unwrap()
        .relations
        .get(&entity)
        .and_then(|relations| relations.get(field_name))
        .cloned()
        .ok_or_else(|| {
            Error::invalid_schema(format!(
                "entity `{}` has no relation `{field_name}`",
                entity.name()
            ))
        })
}
