/// Sort direction for an `order` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// One accumulated chain step.
///
/// Callback payloads are the arrow-function source text captured at the call
/// site; parsing is deferred to composition so that translation errors
/// surface from the terminal call.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Appends a WHERE conjunct over the current projection.
    Filter(String),

    /// Replaces the current set of output fields.
    Map(String),

    /// OFFSET
    Skip(u64),

    /// LIMIT
    Take(u64),

    /// Appends an ORDER BY entry.
    Order {
        selector: String,
        direction: Direction,
    },

    /// Sets DISTINCT on the SELECT.
    Distinct,

    /// Joins the named relation and widens the projection with dot-prefixed
    /// columns.
    Include(String),
}
