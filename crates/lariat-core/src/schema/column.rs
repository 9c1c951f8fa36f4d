use crate::stmt::Value;

/// Metadata mapping an entity field to a table column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    /// The entity field name.
    pub field_name: String,

    /// Name of the column. Defaults to the field name.
    pub column_name: String,

    /// Database-side type, when declared.
    pub sql_type: Option<String>,

    pub nullable: bool,

    /// Database-side default value, when declared.
    pub default: Option<Value>,

    pub unique: bool,

    pub primary: bool,

    pub length: Option<u32>,
}

/// Options accepted when registering an entity field as a column.
#[derive(Debug, Clone, Default)]
pub struct ColumnOptions {
    pub(super) name: Option<String>,
    pub(super) sql_type: Option<String>,
    pub(super) nullable: bool,
    pub(super) default: Option<Value>,
    pub(super) unique: bool,
    pub(super) primary: bool,
    pub(super) length: Option<u32>,
}

impl ColumnOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the default column name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn sql_type(mut self, sql_type: impl Into<String>) -> Self {
        self.sql_type = Some(sql_type.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }
}
