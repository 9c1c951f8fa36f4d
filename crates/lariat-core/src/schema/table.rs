use super::EntityId;

/// Metadata mapping an entity to a database table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDescriptor {
    /// The entity this table belongs to.
    pub entity: EntityId,

    /// Name of the table. Defaults to the lower-cased entity name.
    pub table_name: String,
}

impl TableDescriptor {
    /// The entity's declared class name.
    pub fn entity_name(&self) -> &'static str {
        self.entity.name()
    }
}

/// Options accepted when registering an entity as a table.
#[derive(Debug, Clone, Default)]
pub struct TableOptions {
    pub(super) name: Option<String>,
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the default table name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
