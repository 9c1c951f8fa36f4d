use crate::translate::{OutputColumn, Translator};
use crate::Ident;

use lariat_core::ast::parse_arrow;
use lariat_core::schema;
use lariat_core::stmt::{Direction, Op, QueryState, Scope, Value};
use lariat_core::{Error, Result};

/// A query ready for execution.
///
/// `params` is reserved for future statement parameterization and is always
/// empty today; literal values are inlined into `sql`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Value>,
    /// Output column aliases, in SELECT order.
    pub columns: Vec<String>,
}

/// Compiles an accumulated query state into a single SELECT statement.
pub fn compile(state: &QueryState) -> Result<CompiledQuery> {
    let mut composer = Composer::default();
    let layer = composer.compose(state)?;
    let columns = layer.aliases();
    let sql = layer.render()?;

    Ok(CompiledQuery {
        sql,
        params: Vec::new(),
        columns,
    })
}

/// Compiles a query state into a row count, wrapping the full SELECT so
/// DISTINCT, JOIN fan-out, and pagination all affect the counted rows.
pub fn compile_count(state: &QueryState) -> Result<CompiledQuery> {
    let mut composer = Composer::default();
    let layer = composer.compose(state)?;
    let inner = layer.render()?;
    let alias = composer.fresh_alias();

    Ok(CompiledQuery {
        sql: format!("SELECT COUNT(*) AS \"count\" FROM ({inner}) AS {}", Ident(&alias)),
        params: Vec::new(),
        columns: vec!["count".to_string()],
    })
}

/// Arranges an operation list into layered SELECT groups.
///
/// The alias counter is private to one compilation, so equal inputs yield
/// textually equal SQL.
#[derive(Default)]
struct Composer {
    alias_seq: usize,
}

impl Composer {
    fn fresh_alias(&mut self) -> String {
        let alias = format!("___t{}", self.alias_seq);
        self.alias_seq += 1;
        alias
    }

    fn compose(&mut self, state: &QueryState) -> Result<Layer> {
        let table = schema::table_of(state.entity)?;
        let alias = self.fresh_alias();

        // Seed the projection from the entity's column descriptors.
        let projection = schema::columns_of(state.entity)
            .values()
            .map(|column| OutputColumn {
                alias: column.field_name.clone(),
                target: format!("{}.{}", Ident(&alias), Ident(&column.column_name)),
            })
            .collect();

        let from = format!("{} AS {}", Ident(&table.table_name), Ident(&alias));
        let mut layer = Layer::root(alias, from, projection);

        for op in &state.ops {
            match op {
                Op::Filter(source) => {
                    let arrow = parse_arrow(source)?;
                    let sql = self.translator(&layer, &state.scope).predicate(&arrow)?;
                    layer.filters.push(sql);
                }
                Op::Map(source) => {
                    // Any map after pagination must see its predecessor's
                    // aliases from an inner scope; wrap the group.
                    if layer.paginated {
                        layer = self.wrap(layer)?;
                    }

                    let arrow = parse_arrow(source)?;
                    let projection = self.translator(&layer, &state.scope).projection(&arrow)?;
                    if projection.is_empty() {
                        return Err(Error::composition("projection produced no columns"));
                    }
                    layer.projection = projection;
                    layer.entity_root = false;
                }
                Op::Skip(count) => {
                    layer.offset = Some(*count);
                    layer.paginated = true;
                }
                Op::Take(count) => {
                    layer.limit = Some(*count);
                    layer.paginated = true;
                }
                Op::Order {
                    selector,
                    direction,
                } => {
                    let arrow = parse_arrow(selector)?;
                    let sql = self.translator(&layer, &state.scope).selector(&arrow)?;
                    let keyword = match direction {
                        Direction::Asc => "ASC",
                        Direction::Desc => "DESC",
                    };
                    layer.orders.push(format!("{sql} {keyword}"));
                }
                Op::Distinct => layer.distinct = true,
                Op::Include(field) => {
                    if !layer.entity_root {
                        return Err(Error::composition(format!(
                            "cannot include `{field}` after a projection has collapsed the entity root"
                        )));
                    }
                    self.include(&mut layer, state, field)?;
                }
            }
        }

        Ok(layer)
    }

    fn translator<'a>(&self, layer: &'a Layer, scope: &'a Scope) -> Translator<'a> {
        Translator::new(&layer.projection, scope)
    }

    /// Joins a relation's table and widens the projection with dot-prefixed
    /// aliases over the joined columns.
    fn include(&mut self, layer: &mut Layer, state: &QueryState, field: &str) -> Result<()> {
        let relation = schema::relation_of(state.entity, field)?;
        let target = relation.target();
        let target_table = schema::table_of(target)?;
        let join_alias = self.fresh_alias();

        layer.joins.push(format!(
            "{} {} AS {} ON {}.{} = {}.{}",
            relation.join_kind.sql_keyword(),
            Ident(&target_table.table_name),
            Ident(&join_alias),
            Ident(&layer.alias),
            Ident(&relation.foreign_key),
            Ident(&join_alias),
            Ident(&relation.principal_key),
        ));

        for column in schema::columns_of(target).values() {
            layer.projection.push(OutputColumn {
                alias: format!("{field}.{}", column.field_name),
                target: format!("{}.{}", Ident(&join_alias), Ident(&column.column_name)),
            });
        }

        Ok(())
    }

    /// Closes the current group and opens a new one selecting from it. The
    /// new group's seed projection re-exposes the inner aliases.
    fn wrap(&mut self, inner: Layer) -> Result<Layer> {
        let inner_sql = inner.render()?;
        let alias = self.fresh_alias();

        let projection = inner
            .projection
            .iter()
            .map(|column| OutputColumn {
                alias: column.alias.clone(),
                target: format!("{}.{}", Ident(&alias), Ident(&column.alias)),
            })
            .collect();

        Ok(Layer {
            alias: alias.clone(),
            from: format!("({inner_sql}) AS {}", Ident(&alias)),
            projection,
            joins: Vec::new(),
            filters: Vec::new(),
            orders: Vec::new(),
            distinct: false,
            offset: None,
            limit: None,
            entity_root: false,
            paginated: false,
        })
    }
}

/// One SELECT group under construction.
struct Layer {
    /// Alias of the FROM source (table or wrapped sub-query).
    alias: String,
    from: String,
    projection: Vec<OutputColumn>,
    joins: Vec<String>,
    filters: Vec<String>,
    orders: Vec<String>,
    distinct: bool,
    offset: Option<u64>,
    limit: Option<u64>,
    /// True until a `map` collapses the entity; `include` requires it.
    entity_root: bool,
    /// True once skip/take landed in this group; forces the next `map` into
    /// a new group.
    paginated: bool,
}

impl Layer {
    fn root(alias: String, from: String, projection: Vec<OutputColumn>) -> Self {
        Self {
            alias,
            from,
            projection,
            joins: Vec::new(),
            filters: Vec::new(),
            orders: Vec::new(),
            distinct: false,
            offset: None,
            limit: None,
            entity_root: true,
            paginated: false,
        }
    }

    fn aliases(&self) -> Vec<String> {
        self.projection
            .iter()
            .map(|column| column.alias.clone())
            .collect()
    }

    /// Renders the group in the fixed assembly order:
    /// `SELECT [DISTINCT] proj FROM source [JOINs] [WHERE] [ORDER BY]
    /// [OFFSET] [LIMIT]`.
    fn render(&self) -> Result<String> {
        if self.projection.is_empty() {
            return Err(Error::composition("query has an empty projection"));
        }

        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }

        let mut first = true;
        for column in &self.projection {
            if !first {
                sql.push_str(", ");
            }
            first = false;
            sql.push_str(&column.target);
            sql.push_str(" AS ");
            sql.push_str(&Ident(&column.alias).to_string());
        }

        sql.push_str(" FROM ");
        sql.push_str(&self.from);

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }

        if !self.filters.is_empty() {
            sql.push_str(" WHERE ");
            let mut first = true;
            for filter in &self.filters {
                if !first {
                    sql.push_str(" AND ");
                }
                first = false;
                sql.push('(');
                sql.push_str(filter);
                sql.push(')');
            }
        }

        if !self.orders.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.orders.join(", "));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        Ok(sql)
    }
}
