mod connect;
pub use connect::Connect;

mod pool;
pub use pool::{ManagedConnection, Pool};

use crate::{Engine, Queryable};

use lariat_core::schema::Entity;
use lariat_core::Driver;

use std::sync::Arc;

/// The data source: a connection pool plus the engine that executes
/// compiled queries against it.
#[derive(Clone)]
pub struct Db {
    engine: Arc<Engine>,
}

impl Db {
    /// Connects to the database named by the URL, e.g.
    /// `postgresql://localhost/app`.
    pub async fn connect(url: &str) -> crate::Result<Self> {
        Self::with_driver(Connect::new(url)?).await
    }

    /// Builds a data source over a custom driver.
    pub async fn with_driver(driver: impl Driver + 'static) -> crate::Result<Self> {
        let pool = Pool::new(driver).await?;
        Ok(Self {
            engine: Arc::new(Engine::new(pool)),
        })
    }

    /// Starts a query chain rooted at the entity's collection.
    pub fn collection<E: Entity>(&self) -> Queryable<E> {
        Queryable::new(self.engine.clone())
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }
}
