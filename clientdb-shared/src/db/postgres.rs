/// PostgreSQL store
///
/// Same operations as [`super::memory::MemoryStore`], backed by the tables in
/// `migrations/`. Client references live in a JSONB column on `contacts` and
/// `services`; lookups by client use JSONB containment.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE contacts (
///     seq BIGSERIAL,
///     id UUID PRIMARY KEY,
///     first_name TEXT NOT NULL,
///     last_name TEXT NOT NULL,
///     full_name TEXT NOT NULL,
///     email TEXT NOT NULL,
///     phone_number TEXT,
///     role TEXT,
///     attached_to_client JSONB NOT NULL DEFAULT '[]',
///     created_on TIMESTAMPTZ NOT NULL,
///     modified_on TIMESTAMPTZ NOT NULL
/// );
/// ```

use crate::error::StoreError;
use crate::models::{Client, ClientRef, Contact, Service};
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

const CLIENT_COLUMNS: &str = "id, client_name, slack_channel, web_url, created_on, modified_on";

const CONTACT_COLUMNS: &str = "id, first_name, last_name, full_name, email, phone_number, role, \
     attached_to_client, created_on, modified_on";

const SERVICE_COLUMNS: &str = "id, service_name, service_type, service_owner, service_description, \
     service_status, invoice_frequency, invoice_amount, management_fee, attached_to_client, \
     created_on, modified_on";

#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    full_name: String,
    email: String,
    phone_number: Option<String>,
    role: Option<String>,
    attached_to_client: Json<Vec<ClientRef>>,
    created_on: DateTime<Utc>,
    modified_on: DateTime<Utc>,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Contact {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            full_name: row.full_name,
            email: row.email,
            phone_number: row.phone_number,
            role: row.role,
            attached_to_client: row.attached_to_client.0,
            created_on: row.created_on,
            modified_on: row.modified_on,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: Uuid,
    service_name: String,
    service_type: String,
    service_owner: String,
    service_description: Option<String>,
    service_status: String,
    invoice_frequency: Option<String>,
    invoice_amount: Option<f64>,
    management_fee: Option<f64>,
    attached_to_client: Json<Vec<ClientRef>>,
    created_on: DateTime<Utc>,
    modified_on: DateTime<Utc>,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        Service {
            id: row.id,
            service_name: row.service_name,
            service_type: row.service_type,
            service_owner: row.service_owner,
            service_description: row.service_description,
            service_status: row.service_status,
            invoice_frequency: row.invoice_frequency,
            invoice_amount: row.invoice_amount,
            management_fee: row.management_fee,
            attached_to_client: row.attached_to_client.0,
            created_on: row.created_on,
            modified_on: row.modified_on,
        }
    }
}

fn containing(client_id: Uuid) -> Json<Vec<ClientRef>> {
    Json(vec![ClientRef { client_id }])
}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // Clients

    pub async fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        let query = format!("SELECT {} FROM clients ORDER BY seq", CLIENT_COLUMNS);
        let clients = sqlx::query_as::<_, Client>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(clients)
    }

    pub async fn get_client(&self, id: Uuid) -> Result<Option<Client>, StoreError> {
        let query = format!("SELECT {} FROM clients WHERE id = $1", CLIENT_COLUMNS);
        let client = sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(client)
    }

    pub async fn get_clients(&self, ids: &[Uuid]) -> Result<Vec<Client>, StoreError> {
        let query = format!(
            "SELECT {} FROM clients WHERE id = ANY($1) ORDER BY seq",
            CLIENT_COLUMNS
        );
        let clients = sqlx::query_as::<_, Client>(&query)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(clients)
    }

    pub async fn insert_client(&self, client: &Client) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO clients (id, client_name, slack_channel, web_url, created_on, modified_on)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(client.id)
        .bind(&client.client_name)
        .bind(&client.slack_channel)
        .bind(&client.web_url)
        .bind(client.created_on)
        .bind(client.modified_on)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_client(&self, client: &Client) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET client_name = $2, slack_channel = $3, web_url = $4, modified_on = $5
            WHERE id = $1
            "#,
        )
        .bind(client.id)
        .bind(&client.client_name)
        .bind(&client.slack_channel)
        .bind(&client.web_url)
        .bind(client.modified_on)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn client_name_exists(&self, name: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM clients WHERE client_name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    // Contacts

    pub async fn list_contacts(&self) -> Result<Vec<Contact>, StoreError> {
        let query = format!("SELECT {} FROM contacts ORDER BY seq", CONTACT_COLUMNS);
        let rows = sqlx::query_as::<_, ContactRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Contact::from).collect())
    }

    pub async fn get_contact(&self, id: Uuid) -> Result<Option<Contact>, StoreError> {
        let query = format!("SELECT {} FROM contacts WHERE id = $1", CONTACT_COLUMNS);
        let row = sqlx::query_as::<_, ContactRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Contact::from))
    }

    pub async fn contacts_for_client(&self, client_id: Uuid) -> Result<Vec<Contact>, StoreError> {
        let query = format!(
            "SELECT {} FROM contacts WHERE attached_to_client @> $1 ORDER BY seq",
            CONTACT_COLUMNS
        );
        let rows = sqlx::query_as::<_, ContactRow>(&query)
            .bind(containing(client_id))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Contact::from).collect())
    }

    pub async fn insert_contact(&self, contact: &Contact) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO contacts (id, first_name, last_name, full_name, email, phone_number,
                                  role, attached_to_client, created_on, modified_on)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(contact.id)
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.full_name)
        .bind(&contact.email)
        .bind(&contact.phone_number)
        .bind(&contact.role)
        .bind(Json(&contact.attached_to_client))
        .bind(contact.created_on)
        .bind(contact.modified_on)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_contact(&self, contact: &Contact) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE contacts
            SET first_name = $2, last_name = $3, full_name = $4, email = $5,
                phone_number = $6, role = $7, attached_to_client = $8, modified_on = $9
            WHERE id = $1
            "#,
        )
        .bind(contact.id)
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.full_name)
        .bind(&contact.email)
        .bind(&contact.phone_number)
        .bind(&contact.role)
        .bind(Json(&contact.attached_to_client))
        .bind(contact.modified_on)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // Services

    pub async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        let query = format!("SELECT {} FROM services ORDER BY seq", SERVICE_COLUMNS);
        let rows = sqlx::query_as::<_, ServiceRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Service::from).collect())
    }

    pub async fn get_service(&self, id: Uuid) -> Result<Option<Service>, StoreError> {
        let query = format!("SELECT {} FROM services WHERE id = $1", SERVICE_COLUMNS);
        let row = sqlx::query_as::<_, ServiceRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Service::from))
    }

    pub async fn services_for_client(&self, client_id: Uuid) -> Result<Vec<Service>, StoreError> {
        let query = format!(
            "SELECT {} FROM services WHERE attached_to_client @> $1 ORDER BY seq",
            SERVICE_COLUMNS
        );
        let rows = sqlx::query_as::<_, ServiceRow>(&query)
            .bind(containing(client_id))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Service::from).collect())
    }

    pub async fn insert_service(&self, service: &Service) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO services (id, service_name, service_type, service_owner,
                                  service_description, service_status, invoice_frequency,
                                  invoice_amount, management_fee, attached_to_client,
                                  created_on, modified_on)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(service.id)
        .bind(&service.service_name)
        .bind(&service.service_type)
        .bind(&service.service_owner)
        .bind(&service.service_description)
        .bind(&service.service_status)
        .bind(&service.invoice_frequency)
        .bind(service.invoice_amount)
        .bind(service.management_fee)
        .bind(Json(&service.attached_to_client))
        .bind(service.created_on)
        .bind(service.modified_on)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_service(&self, service: &Service) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE services
            SET service_name = $2, service_type = $3, service_owner = $4,
                service_description = $5, service_status = $6, invoice_frequency = $7,
                invoice_amount = $8, management_fee = $9, attached_to_client = $10,
                modified_on = $11
            WHERE id = $1
            "#,
        )
        .bind(service.id)
        .bind(&service.service_name)
        .bind(&service.service_type)
        .bind(&service.service_owner)
        .bind(&service.service_description)
        .bind(&service.service_status)
        .bind(&service.invoice_frequency)
        .bind(service.invoice_amount)
        .bind(service.management_fee)
        .bind(Json(&service.attached_to_client))
        .bind(service.modified_on)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn service_name_exists(&self, name: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM services WHERE service_name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Row counts as (clients, contacts, services)
    pub async fn counts(&self) -> Result<(usize, usize, usize), StoreError> {
        let (clients, contacts, services): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT (SELECT COUNT(*) FROM clients),
                   (SELECT COUNT(*) FROM contacts),
                   (SELECT COUNT(*) FROM services)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok((clients as usize, contacts as usize, services as usize))
    }
}
