//! Storage backends
//!
//! [`StorageBackend`] dispatches every store operation to either the
//! in-memory store (the default, also used by tests) or PostgreSQL.
//!
//! # Modules
//!
//! - `memory`: insertion-ordered tables behind async locks
//! - `postgres`: sqlx queries against the tables in `migrations/`
//! - `pool`: PostgreSQL connection pool
//! - `migrations`: embedded migration runner
//!
//! # Example
//!
//! ```
//! use clientdb_shared::db::StorageBackend;
//!
//! # async fn example() -> Result<(), clientdb_shared::error::StoreError> {
//! let store = StorageBackend::in_memory();
//! assert!(store.is_empty().await?);
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;

use crate::error::StoreError;
use crate::models::{Client, Contact, Service};
use memory::MemoryStore;
use postgres::PgStore;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Store that is either PostgreSQL or in-memory
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Postgres(PgStore),
    InMemory(Arc<MemoryStore>),
}

impl StorageBackend {
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(MemoryStore::new()))
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::Postgres(PgStore::new(pool))
    }

    /// Short backend name for logs and `/health`
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::InMemory(_) => "memory",
        }
    }

    /// The PostgreSQL pool, if any
    pub fn pool(&self) -> Option<&PgPool> {
        match self {
            Self::Postgres(db) => Some(db.pool()),
            Self::InMemory(_) => None,
        }
    }

    /// Checks that the backend can serve requests
    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::Postgres(db) => Ok(pool::health_check(db.pool()).await?),
            Self::InMemory(_) => Ok(()),
        }
    }

    /// Row counts as (clients, contacts, services)
    pub async fn counts(&self) -> Result<(usize, usize, usize), StoreError> {
        match self {
            Self::Postgres(db) => db.counts().await,
            Self::InMemory(db) => Ok(db.counts().await),
        }
    }

    /// True when all three collections are empty
    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.counts().await? == (0, 0, 0))
    }

    // Clients

    pub async fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        match self {
            Self::Postgres(db) => db.list_clients().await,
            Self::InMemory(db) => Ok(db.list_clients().await),
        }
    }

    pub async fn get_client(&self, id: Uuid) -> Result<Option<Client>, StoreError> {
        match self {
            Self::Postgres(db) => db.get_client(id).await,
            Self::InMemory(db) => Ok(db.get_client(id).await),
        }
    }

    pub async fn get_clients(&self, ids: &[Uuid]) -> Result<Vec<Client>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        match self {
            Self::Postgres(db) => db.get_clients(ids).await,
            Self::InMemory(db) => Ok(db.get_clients(ids).await),
        }
    }

    pub async fn insert_client(&self, client: &Client) -> Result<(), StoreError> {
        match self {
            Self::Postgres(db) => db.insert_client(client).await,
            Self::InMemory(db) => {
                db.insert_client(client).await;
                Ok(())
            }
        }
    }

    /// Replaces a stored client; false if the id is unknown
    pub async fn update_client(&self, client: &Client) -> Result<bool, StoreError> {
        match self {
            Self::Postgres(db) => db.update_client(client).await,
            Self::InMemory(db) => Ok(db.update_client(client).await),
        }
    }

    pub async fn client_name_exists(&self, name: &str) -> Result<bool, StoreError> {
        match self {
            Self::Postgres(db) => db.client_name_exists(name).await,
            Self::InMemory(db) => Ok(db.client_name_exists(name).await),
        }
    }

    // Contacts

    pub async fn list_contacts(&self) -> Result<Vec<Contact>, StoreError> {
        match self {
            Self::Postgres(db) => db.list_contacts().await,
            Self::InMemory(db) => Ok(db.list_contacts().await),
        }
    }

    pub async fn get_contact(&self, id: Uuid) -> Result<Option<Contact>, StoreError> {
        match self {
            Self::Postgres(db) => db.get_contact(id).await,
            Self::InMemory(db) => Ok(db.get_contact(id).await),
        }
    }

    pub async fn contacts_for_client(&self, client_id: Uuid) -> Result<Vec<Contact>, StoreError> {
        match self {
            Self::Postgres(db) => db.contacts_for_client(client_id).await,
            Self::InMemory(db) => Ok(db.contacts_for_client(client_id).await),
        }
    }

    pub async fn insert_contact(&self, contact: &Contact) -> Result<(), StoreError> {
        match self {
            Self::Postgres(db) => db.insert_contact(contact).await,
            Self::InMemory(db) => {
                db.insert_contact(contact).await;
                Ok(())
            }
        }
    }

    pub async fn update_contact(&self, contact: &Contact) -> Result<bool, StoreError> {
        match self {
            Self::Postgres(db) => db.update_contact(contact).await,
            Self::InMemory(db) => Ok(db.update_contact(contact).await),
        }
    }

    // Services

    pub async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        match self {
            Self::Postgres(db) => db.list_services().await,
            Self::InMemory(db) => Ok(db.list_services().await),
        }
    }

    pub async fn get_service(&self, id: Uuid) -> Result<Option<Service>, StoreError> {
        match self {
            Self::Postgres(db) => db.get_service(id).await,
            Self::InMemory(db) => Ok(db.get_service(id).await),
        }
    }

    pub async fn services_for_client(&self, client_id: Uuid) -> Result<Vec<Service>, StoreError> {
        match self {
            Self::Postgres(db) => db.services_for_client(client_id).await,
            Self::InMemory(db) => Ok(db.services_for_client(client_id).await),
        }
    }

    pub async fn insert_service(&self, service: &Service) -> Result<(), StoreError> {
        match self {
            Self::Postgres(db) => db.insert_service(service).await,
            Self::InMemory(db) => {
                db.insert_service(service).await;
                Ok(())
            }
        }
    }

    pub async fn update_service(&self, service: &Service) -> Result<bool, StoreError> {
        match self {
            Self::Postgres(db) => db.update_service(service).await,
            Self::InMemory(db) => Ok(db.update_service(service).await),
        }
    }

    pub async fn service_name_exists(&self, name: &str) -> Result<bool, StoreError> {
        match self {
            Self::Postgres(db) => db.service_name_exists(name).await,
            Self::InMemory(db) => Ok(db.service_name_exists(name).await),
        }
    }
}
