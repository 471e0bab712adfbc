/// In-memory store
///
/// Each collection is a [`Table`] behind a tokio `RwLock`. Rows keep their
/// insertion order so unsorted lists come back in creation order, the same
/// as the PostgreSQL backend. Everything is lost on restart.

use crate::models::{Client, Contact, Service};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

trait Keyed {
    fn key(&self) -> Uuid;
}

impl Keyed for Client {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Contact {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Service {
    fn key(&self) -> Uuid {
        self.id
    }
}

/// Insertion-ordered rows with an id index
#[derive(Debug)]
struct Table<T> {
    rows: Vec<T>,
    index: HashMap<Uuid, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Keyed + Clone> Table<T> {
    fn all(&self) -> Vec<T> {
        self.rows.clone()
    }

    fn get(&self, id: Uuid) -> Option<T> {
        self.index.get(&id).map(|&i| self.rows[i].clone())
    }

    fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.iter().filter(|row| predicate(row)).cloned().collect()
    }

    /// Inserts a row; an existing row with the same id is replaced in place
    fn insert(&mut self, row: T) {
        let id = row.key();
        match self.index.get(&id) {
            Some(&i) => self.rows[i] = row,
            None => {
                self.index.insert(id, self.rows.len());
                self.rows.push(row);
            }
        }
    }

    fn replace(&mut self, row: T) -> bool {
        match self.index.get(&row.key()) {
            Some(&i) => {
                self.rows[i] = row;
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

/// In-memory database for development and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    clients: RwLock<Table<Client>>,
    contacts: RwLock<Table<Contact>>,
    services: RwLock<Table<Service>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Clients

    pub async fn list_clients(&self) -> Vec<Client> {
        self.clients.read().await.all()
    }

    pub async fn get_client(&self, id: Uuid) -> Option<Client> {
        self.clients.read().await.get(id)
    }

    pub async fn get_clients(&self, ids: &[Uuid]) -> Vec<Client> {
        self.clients.read().await.filter(|c| ids.contains(&c.id))
    }

    pub async fn insert_client(&self, client: &Client) {
        self.clients.write().await.insert(client.clone());
    }

    pub async fn update_client(&self, client: &Client) -> bool {
        self.clients.write().await.replace(client.clone())
    }

    pub async fn client_name_exists(&self, name: &str) -> bool {
        self.clients
            .read()
            .await
            .rows
            .iter()
            .any(|c| c.client_name == name)
    }

    // Contacts

    pub async fn list_contacts(&self) -> Vec<Contact> {
        self.contacts.read().await.all()
    }

    pub async fn get_contact(&self, id: Uuid) -> Option<Contact> {
        self.contacts.read().await.get(id)
    }

    pub async fn contacts_for_client(&self, client_id: Uuid) -> Vec<Contact> {
        self.contacts
            .read()
            .await
            .filter(|c| c.is_attached_to(client_id))
    }

    pub async fn insert_contact(&self, contact: &Contact) {
        self.contacts.write().await.insert(contact.clone());
    }

    pub async fn update_contact(&self, contact: &Contact) -> bool {
        self.contacts.write().await.replace(contact.clone())
    }

    // Services

    pub async fn list_services(&self) -> Vec<Service> {
        self.services.read().await.all()
    }

    pub async fn get_service(&self, id: Uuid) -> Option<Service> {
        self.services.read().await.get(id)
    }

    pub async fn services_for_client(&self, client_id: Uuid) -> Vec<Service> {
        self.services
            .read()
            .await
            .filter(|s| s.is_attached_to(client_id))
    }

    pub async fn insert_service(&self, service: &Service) {
        self.services.write().await.insert(service.clone());
    }

    pub async fn update_service(&self, service: &Service) -> bool {
        self.services.write().await.replace(service.clone())
    }

    pub async fn service_name_exists(&self, name: &str) -> bool {
        self.services
            .read()
            .await
            .rows
            .iter()
            .any(|s| s.service_name == name)
    }

    /// Row counts as (clients, contacts, services)
    pub async fn counts(&self) -> (usize, usize, usize) {
        (
            self.clients.read().await.len(),
            self.contacts.read().await.len(),
            self.services.read().await.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClientRef;
    use chrono::Utc;

    fn client(name: &str) -> Client {
        let now = Utc::now();
        Client {
            id: Uuid::new_v4(),
            client_name: name.to_string(),
            slack_channel: None,
            web_url: None,
            created_on: now,
            modified_on: now,
        }
    }

    fn contact(first: &str, refs: Vec<ClientRef>) -> Contact {
        let now = Utc::now();
        Contact {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: "Test".to_string(),
            full_name: Contact::full_name_of(first, "Test"),
            email: format!("{}@example.com", first.to_lowercase()),
            phone_number: None,
            role: None,
            attached_to_client: refs,
            created_on: now,
            modified_on: now,
        }
    }

    #[tokio::test]
    async fn test_insert_keeps_order() {
        let store = MemoryStore::new();
        for name in ["Schmitt-Kuhic", "Bernhard-Heller", "Schamberger LLC"] {
            store.insert_client(&client(name)).await;
        }

        let names: Vec<String> = store
            .list_clients()
            .await
            .into_iter()
            .map(|c| c.client_name)
            .collect();
        assert_eq!(names, vec!["Schmitt-Kuhic", "Bernhard-Heller", "Schamberger LLC"]);
        assert_eq!(store.counts().await, (3, 0, 0));
    }

    #[tokio::test]
    async fn test_update_unknown_id_returns_false() {
        let store = MemoryStore::new();
        assert!(!store.update_client(&client("Ghost")).await);

        let mut known = client("Known");
        store.insert_client(&known).await;
        known.web_url = Some("https://tamu.edu".to_string());
        assert!(store.update_client(&known).await);
        assert_eq!(
            store.get_client(known.id).await.unwrap().web_url.as_deref(),
            Some("https://tamu.edu")
        );
    }

    #[tokio::test]
    async fn test_contacts_for_client() {
        let store = MemoryStore::new();
        let acme = client("Acme");
        store.insert_client(&acme).await;

        let attached = contact("Janka", vec![ClientRef { client_id: acme.id }]);
        store.insert_contact(&attached).await;
        store.insert_contact(&contact("Jeromy", vec![])).await;

        let found = store.contacts_for_client(acme.id).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, attached.id);
    }

    #[tokio::test]
    async fn test_name_exists() {
        let store = MemoryStore::new();
        store.insert_client(&client("Glover, Morar and Bins")).await;
        assert!(store.client_name_exists("Glover, Morar and Bins").await);
        assert!(!store.client_name_exists("glover").await);
    }
}
