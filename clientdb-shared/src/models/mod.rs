//! Record models for clientdb
//!
//! This module contains the three entity collections and the input types
//! accepted by the data access API.
//!
//! # Models
//!
//! - `client`: Customer organisations
//! - `contact`: People, attached to zero or more clients
//! - `service`: Managed services, attached to zero or more clients
//!
//! Associations are stored once, on the contact/service side, as a list of
//! [`ClientRef`]. The client side (`client_contacts`, `managed_services`) is
//! always derived when a client is read.
//!
//! # Example
//!
//! ```
//! use clientdb_shared::models::{ClientRef, Collection};
//! use uuid::Uuid;
//!
//! let reference = ClientRef { client_id: Uuid::new_v4() };
//! assert_eq!(Collection::Contacts.to_string(), "contacts");
//! # let _ = reference;
//! ```

pub mod client;
pub mod contact;
pub mod service;

pub use client::{Client, ClientDetail, CreateClient, UpdateClient};
pub use contact::{Contact, ContactDetail, CreateContact, UpdateContact};
pub use service::{CreateService, Service, ServiceDetail, UpdateService};

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// The three record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Clients,
    Contacts,
    Services,
}

impl Collection {
    /// Collection name as used in URLs and table names
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Clients => "clients",
            Collection::Contacts => "contacts",
            Collection::Services => "services",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored reference from a contact or service to a client
///
/// Serialized as `{ "client_id": "<uuid>" }`, the shape the admin edit
/// forms submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientRef {
    pub client_id: Uuid,
}

/// Client reference expanded for display
///
/// This is what `client` holds on a contact or service read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: Uuid,
    pub client_name: String,
}

impl From<&Client> for ClientSummary {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            client_name: client.client_name.clone(),
        }
    }
}

/// Decodes a clearable field on an update input
///
/// With `#[serde(default)]` an absent field stays `None` (unchanged), an
/// explicit `null` becomes `Some(None)` (clear) and a value `Some(Some(v))`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Appends `reference` unless it is already present, keeping first-seen order
pub(crate) fn push_unique(refs: &mut Vec<ClientRef>, reference: ClientRef) -> bool {
    if refs.contains(&reference) {
        return false;
    }
    refs.push(reference);
    true
}

/// Removes repeated references, keeping first-seen order
pub(crate) fn dedup_refs(refs: Vec<ClientRef>) -> Vec<ClientRef> {
    let mut out = Vec::with_capacity(refs.len());
    for reference in refs {
        push_unique(&mut out, reference);
    }
    out
}

/// Resolves references against a set of clients, skipping dangling ones
pub(crate) fn summarize<'a, I>(refs: &[ClientRef], clients: I) -> Vec<ClientSummary>
where
    I: IntoIterator<Item = &'a Client> + Clone,
{
    refs.iter()
        .filter_map(|r| {
            clients
                .clone()
                .into_iter()
                .find(|c| c.id == r.client_id)
                .map(ClientSummary::from)
        })
        .collect()
}
