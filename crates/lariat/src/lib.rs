#[macro_use]
mod macros;

pub mod db;
pub use db::Db;

mod engine;
pub use engine::Engine;

mod queryable;
pub use queryable::Queryable;

pub use lariat_core::schema::{self, Entity, EntityId};
pub use lariat_core::{async_trait, driver, stmt, Error, Result};
