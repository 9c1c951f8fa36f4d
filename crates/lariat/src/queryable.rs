use crate::Engine;

use lariat_core::schema::{Entity, EntityId};
use lariat_core::stmt::{Direction, Op, QueryState, Scope, ValueRecord};
use lariat_core::Result;

use std::marker::PhantomData;
use std::sync::Arc;

/// An immutable, lazily-accumulated query chain over an entity collection.
///
/// Every non-terminal method returns a fresh builder; the receiver is never
/// mutated. Callbacks are supplied as arrow-function source text and are not
/// parsed until a terminal call compiles the chain.
pub struct Queryable<E> {
    engine: Arc<Engine>,
    state: QueryState,
    _p: PhantomData<fn() -> E>,
}

impl<E: Entity> Queryable<E> {
    pub(crate) fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            state: QueryState::new(EntityId::of::<E>()),
            _p: PhantomData,
        }
    }

    fn push(&self, op: Op) -> Self {
        let mut state = self.state.clone();
        state.ops.push(op);
        Self {
            engine: self.engine.clone(),
            state,
            _p: PhantomData,
        }
    }

    /// Appends a WHERE conjunct, e.g. `.filter("u => u.id > 10")`.
    pub fn filter(&self, predicate: &str) -> Self {
        self.push(Op::Filter(predicate.to_string()))
    }

    /// Replaces the output fields, e.g. `.map("u => ({ id: u.id })")`.
    pub fn map(&self, projection: &str) -> Self {
        self.push(Op::Map(projection.to_string()))
    }

    pub fn skip(&self, count: u64) -> Self {
        self.push(Op::Skip(count))
    }

    pub fn take(&self, count: u64) -> Self {
        self.push(Op::Take(count))
    }

    pub fn distinct(&self) -> Self {
        self.push(Op::Distinct)
    }

    /// Joins the named relation and widens the projection with dot-prefixed
    /// columns.
    pub fn include(&self, relation: &str) -> Self {
        self.push(Op::Include(relation.to_string()))
    }

    /// Appends an ascending ORDER BY entry. Accepts either selector source
    /// (`"u => u.username"`) or a bare field name (`"username"`).
    pub fn order_by(&self, selector: &str) -> Self {
        self.push(Op::Order {
            selector: selector_source(selector),
            direction: Direction::Asc,
        })
    }

    /// Appends a descending ORDER BY entry.
    pub fn order_by_descending(&self, selector: &str) -> Self {
        self.push(Op::Order {
            selector: selector_source(selector),
            direction: Direction::Desc,
        })
    }

    /// Shallow-merges values into the query's scope bag; later calls win on
    /// key conflict.
    pub fn scope(&self, bag: impl Into<Scope>) -> Self {
        let mut state = self.state.clone();
        state.scope.merge(bag.into());
        Self {
            engine: self.engine.clone(),
            state,
            _p: PhantomData,
        }
    }

    /// The current snapshot of the accumulated query.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Compiles, executes, and rehydrates the chain.
    pub async fn to_array(&self) -> Result<Vec<ValueRecord>> {
        self.engine.to_array(&self.state).await
    }

    /// Returns the first row, if any.
    pub async fn first(&self) -> Result<Option<ValueRecord>> {
        self.engine.first(&self.state).await
    }

    /// Counts the chain's rows.
    pub async fn count(&self) -> Result<u64> {
        self.engine.count(&self.state).await
    }
}

/// A bare field name becomes a synthetic selector over the row parameter.
fn selector_source(selector: &str) -> String {
    if selector.contains("=>") {
        selector.to_string()
    } else {
        format!("x => x.{selector}")
    }
}

impl<E> Clone for Queryable<E> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            state: self.state.clone(),
            _p: PhantomData,
        }
    }
}

impl<E> std::fmt::Debug for Queryable<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.state.fmt(f)
    }
}
