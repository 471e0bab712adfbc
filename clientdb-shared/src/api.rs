//! Data access API
//!
//! [`ClientDb`] is the contract the HTTP layer consumes: list, get, create
//! and update for each collection, with client references expanded inline
//! on every read so callers never need a second fetch.
//!
//! Rules enforced here rather than in the stores:
//!
//! - ids are assigned on create (UUID v4); an id that does not parse is
//!   reported as not found, the same as an unknown one
//! - required fields are validated on create, and may not be blanked on update
//! - every `attached_to_client` entry must name an existing client
//! - `client_name` and `service_name` must be unused on create
//! - `created_on`/`modified_on` are server-managed
//!
//! # Example
//!
//! ```
//! use clientdb_shared::api::ClientDb;
//! use clientdb_shared::db::StorageBackend;
//! use clientdb_shared::models::CreateContact;
//!
//! # async fn example() -> Result<(), clientdb_shared::error::DataError> {
//! let db = ClientDb::new(StorageBackend::in_memory());
//! let contact = db
//!     .create_contact(CreateContact {
//!         first_name: "Berti".to_string(),
//!         last_name: "Gayne".to_string(),
//!         email: "bgayne6@etsy.com".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! assert_eq!(contact.contact.full_name, "Berti Gayne");
//! # Ok(())
//! # }
//! ```

use crate::db::StorageBackend;
use crate::error::{DataError, DataResult, FieldError};
use crate::models::{
    push_unique, summarize, Client, ClientDetail, ClientRef, Collection, Contact, ContactDetail,
    CreateClient, CreateContact, CreateService, Service, ServiceDetail, UpdateClient,
    UpdateContact, UpdateService,
};
use crate::query::{ListQuery, Page};
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

/// Data access API over a storage backend
#[derive(Debug, Clone)]
pub struct ClientDb {
    store: StorageBackend,
}

fn parse_id(collection: Collection, id: &str) -> DataResult<Uuid> {
    Uuid::parse_str(id.trim()).map_err(|_| {
        debug!(%collection, id, "Rejecting malformed id");
        DataError::not_found(collection, id)
    })
}

fn validate<T: Validate>(input: &T) -> DataResult<()> {
    input.validate().map_err(|errors| {
        let err = DataError::from(errors);
        debug!(fields = ?err.invalid_fields(), "Validation failed");
        err
    })
}

impl ClientDb {
    pub fn new(store: StorageBackend) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &StorageBackend {
        &self.store
    }

    /// Fails with a validation error naming every reference that does not
    /// resolve to a stored client
    async fn check_refs(&self, field: &str, refs: &[ClientRef]) -> DataResult<()> {
        let ids: Vec<Uuid> = refs.iter().map(|r| r.client_id).collect();
        let found = self.store.get_clients(&ids).await?;

        let missing: Vec<FieldError> = ids
            .iter()
            .filter(|id| !found.iter().any(|c| c.id == **id))
            .map(|id| FieldError::new(field, format!("unknown client {}", id)))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            warn!(count = missing.len(), "Rejecting dangling client references");
            Err(DataError::Validation(missing))
        }
    }

    async fn client_summaries(&self, refs: &[ClientRef]) -> DataResult<Vec<Client>> {
        let ids: Vec<Uuid> = refs.iter().map(|r| r.client_id).collect();
        Ok(self.store.get_clients(&ids).await?)
    }

    // Clients

    async fn expand_client(&self, client: Client) -> DataResult<ClientDetail> {
        let client_contacts = self.store.contacts_for_client(client.id).await?;
        let managed_services = self.store.services_for_client(client.id).await?;
        Ok(ClientDetail {
            client,
            client_contacts,
            managed_services,
        })
    }

    /// Lists clients with their contacts and services embedded
    pub async fn list_clients(&self, query: &ListQuery) -> DataResult<Page<ClientDetail>> {
        let clients = self.store.list_clients().await?;
        let contacts = self.store.list_contacts().await?;
        let services = self.store.list_services().await?;

        let details = clients
            .into_iter()
            .map(|client| ClientDetail {
                client_contacts: contacts
                    .iter()
                    .filter(|c| c.is_attached_to(client.id))
                    .cloned()
                    .collect(),
                managed_services: services
                    .iter()
                    .filter(|s| s.is_attached_to(client.id))
                    .cloned()
                    .collect(),
                client,
            })
            .collect();

        Ok(query.apply(details))
    }

    pub async fn get_client(&self, id: &str) -> DataResult<ClientDetail> {
        let uuid = parse_id(Collection::Clients, id)?;
        let client = self
            .store
            .get_client(uuid)
            .await?
            .ok_or_else(|| DataError::not_found(Collection::Clients, id))?;
        self.expand_client(client).await
    }

    pub async fn create_client(&self, mut input: CreateClient) -> DataResult<ClientDetail> {
        input.normalize();
        validate(&input)?;

        if self.store.client_name_exists(&input.client_name).await? {
            warn!(client_name = %input.client_name, "Client already exists");
            return Err(DataError::Conflict(format!(
                "client {} already exists",
                input.client_name
            )));
        }

        let client = input.into_record(Uuid::new_v4(), Utc::now());
        self.store.insert_client(&client).await?;
        info!(client_id = %client.id, "Client created");

        self.expand_client(client).await
    }

    pub async fn update_client(&self, id: &str, mut input: UpdateClient) -> DataResult<ClientDetail> {
        let uuid = parse_id(Collection::Clients, id)?;
        input.normalize();
        validate(&input)?;

        let mut client = self
            .store
            .get_client(uuid)
            .await?
            .ok_or_else(|| DataError::not_found(Collection::Clients, id))?;
        input.apply(&mut client, Utc::now());

        if !self.store.update_client(&client).await? {
            return Err(DataError::not_found(Collection::Clients, id));
        }
        info!(client_id = %client.id, "Client updated");

        self.expand_client(client).await
    }

    // Contacts

    async fn expand_contact(&self, contact: Contact) -> DataResult<ContactDetail> {
        let clients = self.client_summaries(&contact.attached_to_client).await?;
        Ok(ContactDetail {
            client: summarize(&contact.attached_to_client, clients.iter()),
            contact,
        })
    }

    /// Lists contacts with their clients resolved
    pub async fn list_contacts(&self, query: &ListQuery) -> DataResult<Page<ContactDetail>> {
        let contacts = self.store.list_contacts().await?;
        let clients = self.store.list_clients().await?;

        let details = contacts
            .into_iter()
            .map(|contact| ContactDetail {
                client: summarize(&contact.attached_to_client, clients.iter()),
                contact,
            })
            .collect();

        Ok(query.apply(details))
    }

    pub async fn get_contact(&self, id: &str) -> DataResult<ContactDetail> {
        let uuid = parse_id(Collection::Contacts, id)?;
        let contact = self
            .store
            .get_contact(uuid)
            .await?
            .ok_or_else(|| DataError::not_found(Collection::Contacts, id))?;
        self.expand_contact(contact).await
    }

    pub async fn create_contact(&self, mut input: CreateContact) -> DataResult<ContactDetail> {
        input.normalize();
        validate(&input)?;
        self.check_refs("attached_to_client", &input.attached_to_client)
            .await?;

        let contact = input.into_record(Uuid::new_v4(), Utc::now());
        self.store.insert_contact(&contact).await?;
        info!(contact_id = %contact.id, "Contact created");

        self.expand_contact(contact).await
    }

    pub async fn update_contact(
        &self,
        id: &str,
        mut input: UpdateContact,
    ) -> DataResult<ContactDetail> {
        let uuid = parse_id(Collection::Contacts, id)?;
        input.normalize();
        validate(&input)?;

        let mut contact = self
            .store
            .get_contact(uuid)
            .await?
            .ok_or_else(|| DataError::not_found(Collection::Contacts, id))?;

        if let Some(refs) = &input.attached_to_client {
            self.check_refs("attached_to_client", refs).await?;
        }
        input.apply(&mut contact, Utc::now());

        if !self.store.update_contact(&contact).await? {
            return Err(DataError::not_found(Collection::Contacts, id));
        }
        info!(contact_id = %contact.id, "Contact updated");

        self.expand_contact(contact).await
    }

    // Services

    async fn expand_service(&self, service: Service) -> DataResult<ServiceDetail> {
        let clients = self.client_summaries(&service.attached_to_client).await?;
        Ok(ServiceDetail {
            client: summarize(&service.attached_to_client, clients.iter()),
            service,
        })
    }

    /// Lists services with their clients resolved
    pub async fn list_services(&self, query: &ListQuery) -> DataResult<Page<ServiceDetail>> {
        let services = self.store.list_services().await?;
        let clients = self.store.list_clients().await?;

        let details = services
            .into_iter()
            .map(|service| ServiceDetail {
                client: summarize(&service.attached_to_client, clients.iter()),
                service,
            })
            .collect();

        Ok(query.apply(details))
    }

    pub async fn get_service(&self, id: &str) -> DataResult<ServiceDetail> {
        let uuid = parse_id(Collection::Services, id)?;
        let service = self
            .store
            .get_service(uuid)
            .await?
            .ok_or_else(|| DataError::not_found(Collection::Services, id))?;
        self.expand_service(service).await
    }

    pub async fn create_service(&self, mut input: CreateService) -> DataResult<ServiceDetail> {
        input.normalize();
        validate(&input)?;

        if self.store.service_name_exists(&input.service_name).await? {
            warn!(service_name = %input.service_name, "Service already exists");
            return Err(DataError::Conflict(format!(
                "service {} already exists",
                input.service_name
            )));
        }
        self.check_refs("attached_to_client", &input.attached_to_client)
            .await?;

        let service = input.into_record(Uuid::new_v4(), Utc::now());
        self.store.insert_service(&service).await?;
        info!(service_id = %service.id, "Service created");

        self.expand_service(service).await
    }

    pub async fn update_service(
        &self,
        id: &str,
        mut input: UpdateService,
    ) -> DataResult<ServiceDetail> {
        let uuid = parse_id(Collection::Services, id)?;
        input.normalize();
        validate(&input)?;

        let mut service = self
            .store
            .get_service(uuid)
            .await?
            .ok_or_else(|| DataError::not_found(Collection::Services, id))?;

        if let Some(refs) = &input.attached_to_client {
            self.check_refs("attached_to_client", refs).await?;
        }
        input.apply(&mut service, Utc::now());

        if !self.store.update_service(&service).await? {
            return Err(DataError::not_found(Collection::Services, id));
        }
        info!(service_id = %service.id, "Service updated");

        self.expand_service(service).await
    }

    /// Adds one client to a service's `attached_to_client`
    ///
    /// Attaching a client that is already attached leaves the service
    /// untouched, `modified_on` included.
    pub async fn attach_client(&self, service_id: &str, client_id: &str) -> DataResult<ServiceDetail> {
        let uuid = parse_id(Collection::Services, service_id)?;
        let mut service = self
            .store
            .get_service(uuid)
            .await?
            .ok_or_else(|| DataError::not_found(Collection::Services, service_id))?;

        let client_id = Uuid::parse_str(client_id.trim()).map_err(|_| {
            DataError::Validation(vec![FieldError::new(
                "client_id",
                format!("unknown client {}", client_id),
            )])
        })?;
        let reference = ClientRef { client_id };
        self.check_refs("client_id", &[reference]).await?;

        if push_unique(&mut service.attached_to_client, reference) {
            service.modified_on = Utc::now();
            if !self.store.update_service(&service).await? {
                return Err(DataError::not_found(Collection::Services, service_id));
            }
            info!(service_id = %service.id, client_id = %client_id, "Client attached to service");
        } else {
            debug!(service_id = %service.id, client_id = %client_id, "Client already attached");
        }

        self.expand_service(service).await
    }
}
