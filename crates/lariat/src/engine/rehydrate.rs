use lariat_core::stmt::ValueRecord;

/// Rebuilds a nested record from a flat row.
///
/// Column aliases containing `.` are interpreted as paths; each segment
/// becomes a nested record and the final segment holds the scalar. Rows
/// with no dot-aliases pass through unchanged.
pub(crate) fn record(row: ValueRecord) -> ValueRecord {
    let mut out = ValueRecord::new();

    for (alias, value) in row {
        if !alias.contains('.') {
            out.insert(alias, value);
            continue;
        }

        let mut segments: Vec<&str> = alias.split('.').collect();
        let leaf = segments.pop().expect("alias has at least one segment");

        let mut target = &mut out;
        for segment in segments {
            target = target.entry_record(segment);
        }
        target.insert(leaf, value);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lariat_core::stmt::Value;

    fn row(fields: &[(&str, Value)]) -> ValueRecord {
        fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn flat_rows_pass_through() {
        let rehydrated = record(row(&[
            ("id", Value::I64(1)),
            ("username", Value::from("bo")),
        ]));

        assert_eq!(rehydrated.get("id"), Some(&Value::I64(1)));
        assert_eq!(rehydrated.get("username"), Some(&Value::from("bo")));
    }

    #[test]
    fn dot_alias_nests() {
        let rehydrated = record(row(&[
            ("id", Value::I64(1)),
            ("c.cid", Value::I64(7)),
        ]));

        assert_eq!(rehydrated.get("id"), Some(&Value::I64(1)));
        let nested = rehydrated.get("c").unwrap().expect_record();
        assert_eq!(nested.get("cid"), Some(&Value::I64(7)));
        // The flat alias must not survive rehydration
        assert!(rehydrated.get("c.cid").is_none());
    }

    #[test]
    fn deep_paths_and_siblings_share_records() {
        let rehydrated = record(row(&[
            ("a.b.c", Value::I64(1)),
            ("a.b.d", Value::I64(2)),
            ("a.e", Value::I64(3)),
        ]));

        let a = rehydrated.get("a").unwrap().expect_record();
        let b = a.get("b").unwrap().expect_record();
        assert_eq!(b.get("c"), Some(&Value::I64(1)));
        assert_eq!(b.get("d"), Some(&Value::I64(2)));
        assert_eq!(a.get("e"), Some(&Value::I64(3)));
    }

    #[test]
    fn field_order_is_preserved() {
        let rehydrated = record(row(&[
            ("z", Value::I64(1)),
            ("a.x", Value::I64(2)),
            ("m", Value::I64(3)),
        ]));

        let keys: Vec<_> = rehydrated.keys().cloned().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
