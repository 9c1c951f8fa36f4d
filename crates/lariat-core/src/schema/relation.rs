use super::EntityId;

/// The association's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// One-to-many: the target table carries the key referencing this
    /// entity.
    HasMany,

    /// Many-to-one: this entity carries the key referencing the target.
    BelongsTo,
}

/// Join flavor used when the relation is included in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Left,
    Inner,
    Right,
}

impl JoinKind {
    pub fn sql_keyword(self) -> &'static str {
        match self {
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

/// Metadata for an association between two entities.
///
/// The target is held as a thunk, permitting mutually-referential entity
/// declarations: invoking it yields the target's identity without requiring
/// the target to be registered yet.
#[derive(Debug, Clone)]
pub struct RelationDescriptor {
    /// The entity field the relation is declared on.
    pub field_name: String,

    pub kind: RelationKind,

    /// Produces the target entity when first queried.
    pub target: fn() -> EntityId,

    /// Defaults to a LEFT join.
    pub join_kind: JoinKind,

    /// Join column on the owning (FROM) side. Defaults to `"id"` for
    /// `HasMany` and `<lowercased target entity name>_id` for `BelongsTo`.
    pub foreign_key: String,

    /// Join column on the target side. Defaults to
    /// `<lowercased owner entity name>_id` for `HasMany` and `"id"` for
    /// `BelongsTo`.
    pub principal_key: String,

    pub nullable: bool,

    pub eager: bool,
}

impl RelationDescriptor {
    /// Resolves the target thunk.
    pub fn target(&self) -> EntityId {
        (self.target)()
    }
}

/// Options accepted when registering an entity field as a relation.
#[derive(Debug, Clone)]
pub struct RelationOptions {
    pub(super) kind: RelationKind,
    pub(super) target: fn() -> EntityId,
    pub(super) join_kind: JoinKind,
    pub(super) foreign_key: Option<String>,
    pub(super) principal_key: Option<String>,
    pub(super) nullable: bool,
    pub(super) eager: bool,
}

impl RelationOptions {
    /// Declares a one-to-many association, e.g.
    /// `RelationOptions::has_many(EntityId::of::<Course>)`.
    pub fn has_many(target: fn() -> EntityId) -> Self {
        Self::new(RelationKind::HasMany, target)
    }

    /// Declares a many-to-one association.
    pub fn belongs_to(target: fn() -> EntityId) -> Self {
        Self::new(RelationKind::BelongsTo, target)
    }

    fn new(kind: RelationKind, target: fn() -> EntityId) -> Self {
        Self {
            kind,
            target,
            join_kind: JoinKind::Left,
            foreign_key: None,
            principal_key: None,
            nullable: false,
            eager: false,
        }
    }

    pub fn join_kind(mut self, join_kind: JoinKind) -> Self {
        self.join_kind = join_kind;
        self
    }

    pub fn foreign_key(mut self, column: impl Into<String>) -> Self {
        self.foreign_key = Some(column.into());
        self
    }

    pub fn principal_key(mut self, column: impl Into<String>) -> Self {
        self.principal_key = Some(column.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn eager(mut self) -> Self {
        self.eager = true;
        self
    }
}
