/// Seed data loading
///
/// The bundled fixture (`seed/clientdb.json`) holds ten clients, contacts and
/// services. It is written into an empty store at startup; a store that
/// already has records is left alone.
///
/// Seed documents go through the same create inputs and validation as API
/// calls, but skip the duplicate-name check: the fixture itself repeats two
/// service names.

use crate::db::StorageBackend;
use crate::error::{DataResult, StoreError};
use crate::models::{CreateClient, CreateContact, CreateService};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

const BUNDLED: &str = include_str!("../seed/clientdb.json");

/// Key used for `invoice_amount` by older fixtures
pub const LEGACY_INVOICE_AMOUNT: &str = "Invoice_amount";

/// Raw seed documents, one list per collection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub clients: Vec<Value>,
    #[serde(default)]
    pub contacts: Vec<Value>,
    #[serde(default)]
    pub services: Vec<Value>,
}

/// What a seed run wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub clients: usize,
    pub contacts: usize,
    pub services: usize,
    /// True when the store already had records and nothing was written
    pub skipped: bool,
}

impl SeedData {
    /// The fixture compiled into the crate
    pub fn bundled() -> Result<Self, StoreError> {
        Ok(serde_json::from_str(BUNDLED)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Moves a legacy `Invoice_amount` key to `invoice_amount`
///
/// Returns true when the document used the legacy key. An explicit
/// `invoice_amount` wins over the legacy one.
pub fn rename_legacy_keys(doc: &mut Value) -> bool {
    let Some(object) = doc.as_object_mut() else {
        return false;
    };
    let Some(legacy) = object.remove(LEGACY_INVOICE_AMOUNT) else {
        return false;
    };
    object.entry("invoice_amount").or_insert(legacy);
    true
}

fn parse<T: DeserializeOwned>(doc: Value) -> DataResult<T> {
    Ok(serde_json::from_value(doc).map_err(StoreError::from)?)
}

/// Writes the seed documents into `store` if it is empty
pub async fn load(store: &StorageBackend, data: SeedData) -> DataResult<SeedReport> {
    if !store.is_empty().await? {
        info!(backend = store.kind(), "Store already populated, skipping seed");
        return Ok(SeedReport {
            skipped: true,
            ..Default::default()
        });
    }

    let now = Utc::now();
    let mut report = SeedReport::default();

    for doc in data.clients {
        let mut input: CreateClient = parse(doc)?;
        input.normalize();
        input.validate()?;
        store.insert_client(&input.into_record(Uuid::new_v4(), now)).await?;
        report.clients += 1;
    }

    for doc in data.contacts {
        let mut input: CreateContact = parse(doc)?;
        input.normalize();
        input.validate()?;
        store.insert_contact(&input.into_record(Uuid::new_v4(), now)).await?;
        report.contacts += 1;
    }

    for (index, mut doc) in data.services.into_iter().enumerate() {
        if rename_legacy_keys(&mut doc) {
            let name = doc
                .get("service_name")
                .and_then(Value::as_str)
                .unwrap_or("<unnamed>")
                .to_string();
            warn!(
                index,
                service_name = %name,
                "Seed service uses legacy key {}, reading it as invoice_amount",
                LEGACY_INVOICE_AMOUNT
            );
        }
        let mut input: CreateService = parse(doc)?;
        input.normalize();
        input.validate()?;
        store.insert_service(&input.into_record(Uuid::new_v4(), now)).await?;
        report.services += 1;
    }

    info!(
        clients = report.clients,
        contacts = report.contacts,
        services = report.services,
        "Seed data loaded"
    );
    Ok(report)
}

/// Loads the bundled fixture
pub async fn load_bundled(store: &StorageBackend) -> DataResult<SeedReport> {
    load(store, SeedData::bundled()?).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bundled_fixture_parses() {
        let data = SeedData::bundled().unwrap();
        assert_eq!(data.clients.len(), 10);
        assert_eq!(data.contacts.len(), 10);
        assert_eq!(data.services.len(), 10);
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(SeedData::from_json("[]").is_err());
    }

    #[test]
    fn test_rename_legacy_keys() {
        let mut doc = json!({"service_name": "Viva", "Invoice_amount": 76});
        assert!(rename_legacy_keys(&mut doc));
        assert_eq!(doc["invoice_amount"], json!(76));
        assert!(doc.get(LEGACY_INVOICE_AMOUNT).is_none());

        let mut doc = json!({"invoice_amount": 1, "Invoice_amount": 2});
        assert!(rename_legacy_keys(&mut doc));
        assert_eq!(doc["invoice_amount"], json!(1));

        let mut doc = json!({"invoice_amount": 1});
        assert!(!rename_legacy_keys(&mut doc));
    }

    #[tokio::test]
    async fn test_load_bundled_into_empty_store() {
        let store = StorageBackend::in_memory();
        let report = load_bundled(&store).await.unwrap();
        assert_eq!(
            report,
            SeedReport {
                clients: 10,
                contacts: 10,
                services: 10,
                skipped: false
            }
        );

        let services = store.list_services().await.unwrap();
        assert_eq!(services[0].service_name, "Redhold");
        assert_eq!(services[0].invoice_amount, Some(256.0));
        assert!(services.iter().all(|s| s.invoice_amount.is_some()));

        let contacts = store.list_contacts().await.unwrap();
        assert_eq!(contacts[0].full_name, "Leah Franz-Schoninger");
    }

    #[tokio::test]
    async fn test_load_skips_populated_store() {
        let store = StorageBackend::in_memory();
        load_bundled(&store).await.unwrap();
        let report = load_bundled(&store).await.unwrap();
        assert!(report.skipped);
        assert_eq!(store.counts().await.unwrap(), (10, 10, 10));
    }

    #[tokio::test]
    async fn test_invalid_seed_document_fails() {
        let store = StorageBackend::in_memory();
        let data = SeedData::from_json(r#"{"contacts": [{"first_name": "A"}]}"#).unwrap();
        assert!(data.clients.is_empty());
        assert_eq!(data.contacts.len(), 1);

        let err = load(&store, data).await.unwrap_err();
        assert_eq!(err.invalid_fields(), vec!["email", "last_name"]);
    }
}
