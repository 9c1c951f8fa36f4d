use lariat_core::{Connection, Driver, Error};

use std::ops::Deref;
use std::sync::Arc;

/// Connection pool over a [`Driver`].
///
/// Acquisition is exclusive per connection; release happens when the
/// [`ManagedConnection`] drops, on every exit path.
pub struct Pool {
    inner: deadpool::managed::Pool<Manager>,
}

impl Pool {
    /// Builds the pool and validates it by establishing one connection.
    pub async fn new(driver: impl Driver + 'static) -> crate::Result<Self> {
        let inner = deadpool::managed::Pool::builder(Manager {
            driver: Arc::new(driver),
        })
        .build()
        .map_err(Error::connection_pool)?;

        if let Err(err) = inner.get().await {
            return Err(Error::connection_pool(err));
        }

        Ok(Self { inner })
    }

    pub async fn get(&self) -> crate::Result<ManagedConnection> {
        match self.inner.get().await {
            Ok(connection) => Ok(ManagedConnection { inner: connection }),
            Err(err) => Err(Error::connection_pool(err)),
        }
    }
}

struct Manager {
    driver: Arc<dyn Driver>,
}

impl deadpool::managed::Manager for Manager {
    type Type = Box<dyn Connection>;
    type Error = crate::Error;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        self.driver.connect().await
    }

    async fn recycle(
        &self,
        _obj: &mut Self::Type,
        _metrics: &deadpool::managed::Metrics,
    ) -> deadpool::managed::RecycleResult<Self::Error> {
        Ok(())
    }
}

pub struct ManagedConnection {
    inner: deadpool::managed::Object<Manager>,
}

impl Deref for ManagedConnection {
    type Target = Box<dyn Connection>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
