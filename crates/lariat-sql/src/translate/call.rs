use super::{quote_str, Operand, Translator};

use lariat_core::ast::Expr;
use lariat_core::stmt::Value;
use lariat_core::{Error, Result};

impl Translator<'_> {
    /// Translates a recognized method call. The callee's object becomes the
    /// emitted `<O>`; unrecognized methods are a translation error.
    pub(super) fn call(&mut self, object: &Expr, method: &str, args: &[Expr]) -> Result<Operand> {
        if method == "map" {
            return Err(Error::translation(
                "map(..) is only supported inside a projection",
            ));
        }

        // Membership test against a literal array: `[1, 2].includes(u.id)`.
        if let Expr::Array(items) = object {
            if method != "includes" || args.len() != 1 {
                return Err(Error::translation(format!(
                    "unsupported method `{method}` on an array literal"
                )));
            }

            let needle = self.translate(&args[0])?.render()?;
            let mut rendered = Vec::with_capacity(items.len());
            for item in items {
                rendered.push(self.translate(item)?.render()?);
            }
            return Ok(Operand::Sql(format!(
                "{needle} = ANY(ARRAY[{}])",
                rendered.join(", ")
            )));
        }

        let receiver = self.translate(object)?.render()?;

        let sql = match (method, args.len()) {
            ("toLowerCase", 0) => format!("LOWER({receiver})"),
            ("toUpperCase", 0) => format!("UPPER({receiver})"),
            ("trim", 0) => format!("TRIM({receiver})"),
            // JS substring is zero-based; SQL is one-based.
            ("substring", 1) => {
                let start = self.one_based(&args[0])?;
                format!("SUBSTRING({receiver} FROM {start})")
            }
            ("substring", 2) => {
                let start = self.one_based(&args[0])?;
                let length = self.translate(&args[1])?.render()?;
                format!("SUBSTRING({receiver} FROM {start} FOR {length})")
            }
            ("startsWith", 1) => {
                let pattern = self.pattern_arg(method, &args[0])?;
                format!("{receiver} LIKE {}", quote_str(&format!("{pattern}%")))
            }
            ("endsWith", 1) => {
                let pattern = self.pattern_arg(method, &args[0])?;
                format!("{receiver} LIKE {}", quote_str(&format!("%{pattern}")))
            }
            ("includes", 1) => {
                let pattern = self.pattern_arg(method, &args[0])?;
                format!("{receiver} LIKE {}", quote_str(&format!("%{pattern}%")))
            }
            ("replace", 2) => {
                let from = self.pattern_arg(method, &args[0])?;
                let to = self.pattern_arg(method, &args[1])?;
                format!(
                    "REPLACE({receiver}, {}, {})",
                    quote_str(&from),
                    quote_str(&to)
                )
            }
            ("toFixed", 1) => {
                let digits = self.translate(&args[0])?.render()?;
                format!("ROUND({receiver}, {digits})")
            }
            ("toString", 0) => format!("CAST({receiver} AS TEXT)"),
            ("getFullYear", 0) => format!("EXTRACT(YEAR FROM {receiver})"),
            // JS months are zero-based.
            ("getMonth", 0) => format!("(EXTRACT(MONTH FROM {receiver}) - 1)"),
            ("getDate", 0) => format!("EXTRACT(DAY FROM {receiver})"),
            ("getHours", 0) => format!("EXTRACT(HOUR FROM {receiver})"),
            ("getMinutes", 0) => format!("EXTRACT(MINUTE FROM {receiver})"),
            ("getSeconds", 0) => format!("EXTRACT(SECOND FROM {receiver})"),
            _ => {
                return Err(Error::translation(format!(
                    "unsupported method `{method}` with {} argument(s)",
                    args.len()
                )))
            }
        };

        Ok(Operand::Sql(sql))
    }

    /// Renders a zero-based position argument as one-based, folding numeric
    /// literals.
    fn one_based(&mut self, arg: &Expr) -> Result<String> {
        let operand = self.translate(arg)?;
        Ok(match operand {
            Operand::Value(Value::I64(position)) => (position + 1).to_string(),
            operand => format!("({} + 1)", operand.render()?),
        })
    }

    /// A LIKE/REPLACE argument must resolve to a string literal, either
    /// directly or through the scope bag.
    fn pattern_arg(&mut self, method: &str, arg: &Expr) -> Result<String> {
        let operand = self.translate(arg)?;
        match operand.as_str() {
            Some(value) => Ok(value.to_string()),
            None => Err(Error::translation(format!(
                "`{method}` requires a string literal argument"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{OutputColumn, Translator};
    use lariat_core::ast::parse_arrow;
    use lariat_core::stmt::{Scope, Value};

    fn translate(source: &str) -> lariat_core::Result<String> {
        translate_scoped(source, Scope::new())
    }

    fn translate_scoped(source: &str, scope: Scope) -> lariat_core::Result<String> {
        let projection = vec![
            OutputColumn {
                alias: "id".into(),
                target: "\"___t0\".\"id\"".into(),
            },
            OutputColumn {
                alias: "username".into(),
                target: "\"___t0\".\"username\"".into(),
            },
            OutputColumn {
                alias: "createdAt".into(),
                target: "\"___t0\".\"created_at\"".into(),
            },
            OutputColumn {
                alias: "score".into(),
                target: "\"___t0\".\"score\"".into(),
            },
        ];
        let arrow = parse_arrow(source)?;
        Translator::new(&projection, &scope).predicate(&arrow)
    }

    #[test]
    fn case_and_trim() {
        assert_eq!(
            translate("u => u.username.toLowerCase()").unwrap(),
            r#"LOWER("___t0"."username")"#
        );
        assert_eq!(
            translate("u => u.username.toUpperCase()").unwrap(),
            r#"UPPER("___t0"."username")"#
        );
        assert_eq!(
            translate("u => u.username.trim()").unwrap(),
            r#"TRIM("___t0"."username")"#
        );
    }

    #[test]
    fn substring_is_one_based() {
        assert_eq!(
            translate("u => u.username.substring(2)").unwrap(),
            r#"SUBSTRING("___t0"."username" FROM 3)"#
        );
        assert_eq!(
            translate("u => u.username.substring(0, 4)").unwrap(),
            r#"SUBSTRING("___t0"."username" FROM 1 FOR 4)"#
        );
    }

    #[test]
    fn starts_with() {
        assert_eq!(
            translate("u => u.username.startsWith('A')").unwrap(),
            r#""___t0"."username" LIKE 'A%'"#
        );
    }

    #[test]
    fn ends_with() {
        assert_eq!(
            translate("u => u.username.endsWith('z')").unwrap(),
            r#""___t0"."username" LIKE '%z'"#
        );
    }

    #[test]
    fn includes_on_string() {
        assert_eq!(
            translate("u => u.username.includes('mi')").unwrap(),
            r#""___t0"."username" LIKE '%mi%'"#
        );
    }

    #[test]
    fn includes_on_array_literal() {
        assert_eq!(
            translate("u => [1, 2, 3].includes(u.id)").unwrap(),
            r#""___t0"."id" = ANY(ARRAY[1, 2, 3])"#
        );
    }

    #[test]
    fn includes_pattern_from_scope() {
        let scope = Scope::from([("needle", Value::from("bo"))]);
        assert_eq!(
            translate_scoped("u => u.username.includes(needle)", scope).unwrap(),
            r#""___t0"."username" LIKE '%bo%'"#
        );
    }

    #[test]
    fn pattern_quotes_escaped() {
        assert_eq!(
            translate("u => u.username.startsWith('O\\'B')").unwrap(),
            r#""___t0"."username" LIKE 'O''B%'"#
        );
    }

    #[test]
    fn column_valued_pattern_rejected() {
        let err = translate("u => u.username.startsWith(u.username)").unwrap_err();
        assert!(err.is_translation());
    }

    #[test]
    fn replace() {
        assert_eq!(
            translate("u => u.username.replace('a', 'b')").unwrap(),
            r#"REPLACE("___t0"."username", 'a', 'b')"#
        );
    }

    #[test]
    fn to_fixed() {
        assert_eq!(
            translate("u => u.score.toFixed(2)").unwrap(),
            r#"ROUND("___t0"."score", 2)"#
        );
    }

    #[test]
    fn to_string() {
        assert_eq!(
            translate("u => u.id.toString()").unwrap(),
            r#"CAST("___t0"."id" AS TEXT)"#
        );
    }

    #[test]
    fn date_parts() {
        assert_eq!(
            translate("u => u.createdAt.getFullYear()").unwrap(),
            r#"EXTRACT(YEAR FROM "___t0"."created_at")"#
        );
        assert_eq!(
            translate("u => u.createdAt.getMonth()").unwrap(),
            r#"(EXTRACT(MONTH FROM "___t0"."created_at") - 1)"#
        );
        assert_eq!(
            translate("u => u.createdAt.getDate()").unwrap(),
            r#"EXTRACT(DAY FROM "___t0"."created_at")"#
        );
        assert_eq!(
            translate("u => u.createdAt.getSeconds()").unwrap(),
            r#"EXTRACT(SECOND FROM "___t0"."created_at")"#
        );
    }

    #[test]
    fn unrecognized_method_is_translation_error() {
        let err = translate("u => u.username.reverse()").unwrap_err();
        assert!(err.is_translation());
    }

    #[test]
    fn map_outside_projection_is_translation_error() {
        let err = translate("u => u.courses.map(c => c.id)").unwrap_err();
        assert!(err.is_translation());
    }
}
