use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dataloader::Loader;
use async_graphql::Error;
use uuid::Uuid;

use infra::{CatalogStore, UserRecord};

/// Batches participant-profile lookups across a response so resolving a
/// tournament's participant list costs one store round-trip.
pub struct UserLoader {
    store: Arc<dyn CatalogStore>,
}

impl UserLoader {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for UserLoader {
    type Value = UserRecord;
    type Error = Error;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let rows = self
            .store
            .get_users(keys)
            .await
            .map_err(|e| Error::new(e.to_string()))?;

        Ok(rows.into_iter().map(|row| (row.id, row)).collect())
    }
}
