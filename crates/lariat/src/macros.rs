/// Builds a [`Scope`](lariat_core::stmt::Scope) bag from `name: value`
/// pairs.
///
/// ```
/// let scope = lariat::scope! { foo: 1, label: "x" };
/// ```
#[macro_export]
macro_rules! scope {
    (
        $( $name:ident : $value:expr ),* $(,)?
    ) => {{
        let mut scope = $crate::stmt::Scope::new();
        $( scope.insert(stringify!($name), $crate::stmt::Value::from($value)); )*
        scope
    }};
}
