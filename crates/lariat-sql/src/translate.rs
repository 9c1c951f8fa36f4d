mod call;

use lariat_core::ast::{Arrow, BinaryOp, Expr, LogicalOp, Literal, TemplatePart, UnaryOp};
use lariat_core::stmt::{Scope, Value};
use lariat_core::{Error, Result};

/// One `{alias, target_sql}` pair of the current SELECT.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputColumn {
    pub alias: String,
    pub target: String,
}

/// Translates parsed callback bodies into SQL expression text.
///
/// Identifier paths rooted at a bound parameter resolve against the current
/// projection first and the scope bag second; free identifiers resolve
/// against the scope bag only. Scope hits inline the primitive value into
/// the emitted SQL.
pub struct Translator<'a> {
    projection: &'a [OutputColumn],
    scope: &'a Scope,

    /// Parameter bindings, innermost last. Each maps a parameter name to the
    /// dot-path prefix it stands for; the root parameter's prefix is empty.
    bindings: Vec<(String, String)>,
}

/// An intermediate translation result. Keeping inlineable values symbolic
/// until rendering lets equality rewrite to `IS NULL` and lets `+` detect
/// numeric literals.
enum Operand {
    Value(Value),
    Sql(String),
}

impl Operand {
    fn is_null(&self) -> bool {
        matches!(self, Operand::Value(Value::Null))
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Operand::Value(value) if value.is_numeric())
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            Operand::Value(value) => value.as_str(),
            Operand::Sql(_) => None,
        }
    }

    fn render(&self) -> Result<String> {
        match self {
            Operand::Value(value) => value_sql(value),
            Operand::Sql(sql) => Ok(sql.clone()),
        }
    }
}

impl<'a> Translator<'a> {
    pub fn new(projection: &'a [OutputColumn], scope: &'a Scope) -> Self {
        Self {
            projection,
            scope,
            bindings: Vec::new(),
        }
    }

    /// Translates a filter predicate to a SQL boolean expression.
    pub fn predicate(&mut self, arrow: &Arrow) -> Result<String> {
        self.scalar(arrow)
    }

    /// Translates an order selector to a SQL expression.
    pub fn selector(&mut self, arrow: &Arrow) -> Result<String> {
        self.scalar(arrow)
    }

    fn scalar(&mut self, arrow: &Arrow) -> Result<String> {
        self.bindings.push((arrow.param.clone(), String::new()));
        let result = self.translate(&arrow.body).and_then(|op| op.render());
        self.bindings.pop();
        result
    }

    /// Translates a projection callback into its `{alias, target_sql}`
    /// pairs. The body must be an object literal; nested objects flatten
    /// their keys with dot separators.
    pub fn projection(&mut self, arrow: &Arrow) -> Result<Vec<OutputColumn>> {
        let Expr::Object(entries) = &arrow.body else {
            return Err(Error::translation(
                "projection body must be an object literal",
            ));
        };

        self.bindings.push((arrow.param.clone(), String::new()));
        let mut columns = Vec::new();
        let result = self.extract_object("", entries, &mut columns);
        self.bindings.pop();
        result?;

        Ok(columns)
    }

    fn extract_object(
        &mut self,
        prefix: &str,
        entries: &[(String, Expr)],
        out: &mut Vec<OutputColumn>,
    ) -> Result<()> {
        for (key, expr) in entries {
            let alias = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            match expr {
                Expr::Object(inner) => self.extract_object(&alias, inner, out)?,
                // A nested child projection: `c: u.courses.map(c => ({..}))`.
                // The inner parameter binds to the receiver's path, and the
                // child's keys flatten under this entry's alias.
                Expr::Call {
                    object,
                    method,
                    args,
                } if method == "map" => {
                    let [Expr::Arrow(inner)] = &args[..] else {
                        return Err(Error::translation(
                            "map(..) requires a single arrow-function argument",
                        ));
                    };
                    let path = self.param_path(object).ok_or_else(|| {
                        Error::translation("map(..) receiver must be a field path")
                    })?;
                    let Expr::Object(inner_entries) = &inner.body else {
                        return Err(Error::translation(
                            "map(..) body must be an object literal",
                        ));
                    };

                    self.bindings.push((inner.param.clone(), path));
                    let result = self.extract_object(&alias, inner_entries, out);
                    self.bindings.pop();
                    result?;
                }
                expr => {
                    let target = self.translate(expr)?.render()?;
                    out.push(OutputColumn { alias, target });
                }
            }
        }

        Ok(())
    }

    fn translate(&mut self, expr: &Expr) -> Result<Operand> {
        match expr {
            Expr::Literal(literal) => Ok(Operand::Value(literal_value(literal))),
            Expr::Ident(_) | Expr::Member { .. } => self.resolve(expr),
            Expr::Unary { op, operand } => {
                let operand = self.translate(operand)?.render()?;
                Ok(Operand::Sql(match op {
                    UnaryOp::Neg => format!("(-{operand})"),
                    UnaryOp::Not => format!("NOT ({operand})"),
                }))
            }
            Expr::Binary { op, lhs, rhs } => self.binary(*op, lhs, rhs),
            Expr::Logical { op, lhs, rhs } => {
                let lhs = self.translate(lhs)?.render()?;
                let rhs = self.translate(rhs)?.render()?;
                let op = match op {
                    LogicalOp::And => "AND",
                    LogicalOp::Or => "OR",
                };
                Ok(Operand::Sql(format!("({lhs} {op} {rhs})")))
            }
            Expr::Template { parts } => self.template(parts),
            Expr::Call {
                object,
                method,
                args,
            } => self.call(object, method, args),
            Expr::Object(_) => Err(Error::translation(
                "object literals are only supported at a projection root",
            )),
            Expr::Array(_) => Err(Error::translation(
                "array literals are only supported as an includes(..) receiver",
            )),
            Expr::Arrow(_) => Err(Error::translation(
                "nested functions are only supported in projection map(..) calls",
            )),
        }
    }

    /// Resolves an identifier path per the projection-closure rule.
    fn resolve(&mut self, expr: &Expr) -> Result<Operand> {
        let (root, segments) = flatten(expr).ok_or_else(|| {
            Error::translation("unsupported member access; only field paths can be referenced")
        })?;

        if let Some(prefix) = self.binding(&root) {
            let path = join_path(prefix, &segments);
            if path.is_empty() {
                return Err(Error::translation(
                    "the row parameter cannot be referenced by itself",
                ));
            }
            if let Some(column) = self.projection.iter().find(|column| column.alias == path) {
                return Ok(Operand::Sql(column.target.clone()));
            }
            if let Some(value) = self.scope.get(&path) {
                return Ok(Operand::Value(value.clone()));
            }
            return Err(Error::translation(format!("unresolved path `{path}`")));
        }

        let path = join_path(&root, &segments);
        match self.scope.get(&path) {
            Some(value) => Ok(Operand::Value(value.clone())),
            None => Err(Error::translation(format!(
                "unresolved identifier `{path}`"
            ))),
        }
    }

    fn binding(&self, param: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(name, _)| name == param)
            .map(|(_, prefix)| prefix.as_str())
    }

    /// The dot-path of a parameter-rooted member expression, used to bind a
    /// nested map's parameter.
    fn param_path(&self, expr: &Expr) -> Option<String> {
        let (root, segments) = flatten(expr)?;
        let prefix = self.binding(&root)?;
        Some(join_path(prefix, &segments))
    }

    fn binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Result<Operand> {
        let lhs = self.translate(lhs)?;
        let rhs = self.translate(rhs)?;

        let sql = match op {
            // Null comparisons rewrite to IS [NOT] NULL; databases treat
            // `= NULL` as unknown.
            BinaryOp::Eq | BinaryOp::Ne => {
                let not = if op == BinaryOp::Ne { " NOT" } else { "" };
                if rhs.is_null() {
                    format!("{} IS{not} NULL", lhs.render()?)
                } else if lhs.is_null() {
                    format!("{} IS{not} NULL", rhs.render()?)
                } else if op == BinaryOp::Eq {
                    format!("{} = {}", lhs.render()?, rhs.render()?)
                } else {
                    format!("{} <> {}", lhs.render()?, rhs.render()?)
                }
            }
            BinaryOp::Lt => format!("{} < {}", lhs.render()?, rhs.render()?),
            BinaryOp::Le => format!("{} <= {}", lhs.render()?, rhs.render()?),
            BinaryOp::Gt => format!("{} > {}", lhs.render()?, rhs.render()?),
            BinaryOp::Ge => format!("{} >= {}", lhs.render()?, rhs.render()?),
            BinaryOp::Sub => format!("({} - {})", lhs.render()?, rhs.render()?),
            BinaryOp::Mul => format!("({} * {})", lhs.render()?, rhs.render()?),
            BinaryOp::Div => format!("({} / {})", lhs.render()?, rhs.render()?),
            BinaryOp::Rem => format!("({} % {})", lhs.render()?, rhs.render()?),
            // `+` is numeric addition only when both operands are numeric
            // literals; anything touching a column concatenates as text.
            BinaryOp::Add => {
                if lhs.is_numeric() && rhs.is_numeric() {
                    format!("({}) + ({})", lhs.render()?, rhs.render()?)
                } else {
                    format!("({})::text || ({})::text", lhs.render()?, rhs.render()?)
                }
            }
        };

        Ok(Operand::Sql(sql))
    }

    fn template(&mut self, parts: &[TemplatePart]) -> Result<Operand> {
        if parts.is_empty() {
            return Ok(Operand::Sql("''".to_string()));
        }

        let mut pieces = Vec::with_capacity(parts.len());
        for part in parts {
            pieces.push(match part {
                TemplatePart::Str(segment) => quote_str(segment),
                TemplatePart::Expr(expr) => {
                    format!("({})::text", self.translate(expr)?.render()?)
                }
            });
        }

        Ok(Operand::Sql(pieces.join(" || ")))
    }
}

fn flatten(expr: &Expr) -> Option<(String, Vec<String>)> {
    match expr {
        Expr::Ident(name) => Some((name.clone(), Vec::new())),
        Expr::Member { object, property } => {
            let (root, mut segments) = flatten(object)?;
            segments.push(property.clone());
            Some((root, segments))
        }
        _ => None,
    }
}

fn join_path(prefix: &str, segments: &[String]) -> String {
    let mut path = prefix.to_string();
    for segment in segments {
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(segment);
    }
    path
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Null => Value::Null,
        Literal::Bool(value) => Value::Bool(*value),
        Literal::Int(value) => Value::I64(*value),
        Literal::Float(value) => Value::F64(*value),
        Literal::Str(value) => Value::String(value.clone()),
    }
}

/// Renders a primitive value as a SQL literal.
fn value_sql(value: &Value) -> Result<String> {
    Ok(match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::I64(value) => value.to_string(),
        Value::F64(value) => value.to_string(),
        Value::String(value) => quote_str(value),
        Value::Record(_) => {
            return Err(Error::translation(
                "a nested scope object cannot be inlined; reference one of its fields",
            ))
        }
    })
}

/// Single-quotes a string literal, doubling embedded quotes.
fn quote_str(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\'' {
            quoted.push('\'');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use lariat_core::ast::parse_arrow;

    fn columns() -> Vec<OutputColumn> {
        vec![
            OutputColumn {
                alias: "id".into(),
                target: "\"___t0\".\"id\"".into(),
            },
            OutputColumn {
                alias: "username".into(),
                target: "\"___t0\".\"username\"".into(),
            },
            OutputColumn {
                alias: "deletedAt".into(),
                target: "\"___t0\".\"deletedAt\"".into(),
            },
            OutputColumn {
                alias: "courses.id".into(),
                target: "\"___t1\".\"id\"".into(),
            },
        ]
    }

    fn predicate(source: &str) -> Result<String> {
        predicate_scoped(source, Scope::new())
    }

    fn predicate_scoped(source: &str, scope: Scope) -> Result<String> {
        let projection = columns();
        let arrow = parse_arrow(source)?;
        Translator::new(&projection, &scope).predicate(&arrow)
    }

    #[test]
    fn comparison() {
        assert_eq!(
            predicate("u => u.id > 10").unwrap(),
            r#""___t0"."id" > 10"#
        );
    }

    #[test]
    fn equality_uses_single_equals() {
        assert_eq!(
            predicate("u => u.id == 10").unwrap(),
            r#""___t0"."id" = 10"#
        );
        assert_eq!(
            predicate("u => u.id === 10").unwrap(),
            r#""___t0"."id" = 10"#
        );
    }

    #[test]
    fn inequality() {
        assert_eq!(
            predicate("u => u.id != 10").unwrap(),
            r#""___t0"."id" <> 10"#
        );
    }

    #[test]
    fn null_rewrites_to_is_null() {
        assert_eq!(
            predicate("u => u.deletedAt == null").unwrap(),
            r#""___t0"."deletedAt" IS NULL"#
        );
        assert_eq!(
            predicate("u => u.deletedAt != null").unwrap(),
            r#""___t0"."deletedAt" IS NOT NULL"#
        );
        assert_eq!(
            predicate("u => null == u.deletedAt").unwrap(),
            r#""___t0"."deletedAt" IS NULL"#
        );
    }

    #[test]
    fn null_from_scope_rewrites_to_is_null() {
        let scope = Scope::from([("tombstone", Value::Null)]);
        assert_eq!(
            predicate_scoped("u => u.deletedAt == tombstone", scope).unwrap(),
            r#""___t0"."deletedAt" IS NULL"#
        );
    }

    #[test]
    fn logical_parenthesized() {
        assert_eq!(
            predicate("u => u.id > 1 && u.id < 9").unwrap(),
            r#"("___t0"."id" > 1 AND "___t0"."id" < 9)"#
        );
        assert_eq!(
            predicate("u => u.id == 1 || u.id == 2").unwrap(),
            r#"("___t0"."id" = 1 OR "___t0"."id" = 2)"#
        );
    }

    #[test]
    fn arithmetic_parenthesized() {
        assert_eq!(
            predicate("u => u.id * 8").unwrap(),
            r#"("___t0"."id" * 8)"#
        );
        assert_eq!(
            predicate("u => u.id % 2").unwrap(),
            r#"("___t0"."id" % 2)"#
        );
    }

    #[test]
    fn add_of_numeric_literals() {
        assert_eq!(predicate("u => 1 + 2").unwrap(), "(1) + (2)");
    }

    #[test]
    fn add_involving_a_column_concatenates() {
        assert_eq!(
            predicate("u => u.username + '!'").unwrap(),
            r#"("___t0"."username")::text || ('!')::text"#
        );
    }

    #[test]
    fn string_literals_escape_quotes() {
        assert_eq!(
            predicate("u => u.username == 'O\\'Brien'").unwrap(),
            r#""___t0"."username" = 'O''Brien'"#
        );
    }

    #[test]
    fn scope_value_inlined() {
        let scope = Scope::from([("foo", Value::I64(1))]);
        assert_eq!(
            predicate_scoped("u => u.id * foo", scope).unwrap(),
            r#"("___t0"."id" * 1)"#
        );
    }

    #[test]
    fn scope_nested_path() {
        let mut limits = lariat_core::stmt::ValueRecord::new();
        limits.insert("min", 5i64);
        let scope = Scope::from([("limits", Value::Record(limits))]);
        assert_eq!(
            predicate_scoped("u => u.id > limits.min", scope).unwrap(),
            r#""___t0"."id" > 5"#
        );
    }

    #[test]
    fn unresolved_path_is_translation_error() {
        let err = predicate("u => u.nope > 1").unwrap_err();
        assert!(err.is_translation());
    }

    #[test]
    fn unresolved_identifier_is_translation_error() {
        let err = predicate("u => u.id > nope").unwrap_err();
        assert!(err.is_translation());
    }

    #[test]
    fn template_literal() {
        assert_eq!(
            predicate("u => `Hi ${u.username}!`").unwrap(),
            r#"'Hi ' || ("___t0"."username")::text || '!'"#
        );
    }

    #[test]
    fn projection_flat() {
        let projection = columns();
        let scope = Scope::new();
        let arrow = parse_arrow("u => ({ id: u.id, idx: u.id * 8 })").unwrap();
        let out = Translator::new(&projection, &scope)
            .projection(&arrow)
            .unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].alias, "id");
        assert_eq!(out[0].target, r#""___t0"."id""#);
        assert_eq!(out[1].alias, "idx");
        assert_eq!(out[1].target, r#"("___t0"."id" * 8)"#);
    }

    #[test]
    fn projection_nested_object_flattens() {
        let projection = columns();
        let scope = Scope::new();
        let arrow = parse_arrow("u => ({ a: { b: u.id } })").unwrap();
        let out = Translator::new(&projection, &scope)
            .projection(&arrow)
            .unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].alias, "a.b");
    }

    #[test]
    fn projection_nested_map_binds_inner_param() {
        let projection = columns();
        let scope = Scope::new();
        let arrow = parse_arrow("u => ({ id: u.id, c: u.courses.map(c => ({ cid: c.id })) })")
            .unwrap();
        let out = Translator::new(&projection, &scope)
            .projection(&arrow)
            .unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[1].alias, "c.cid");
        assert_eq!(out[1].target, r#""___t1"."id""#);
    }

    #[test]
    fn projection_body_must_be_object() {
        let projection = columns();
        let scope = Scope::new();
        let arrow = parse_arrow("u => u.id").unwrap();
        let err = Translator::new(&projection, &scope)
            .projection(&arrow)
            .unwrap_err();
        assert!(err.is_translation());
    }
}
