/// Client model
///
/// A client is a customer organisation. Contacts and services point at
/// clients; a client never stores those links itself.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE clients (
///     id UUID PRIMARY KEY,
///     client_name TEXT NOT NULL,
///     slack_channel TEXT,
///     web_url TEXT,
///     created_on TIMESTAMPTZ NOT NULL,
///     modified_on TIMESTAMPTZ NOT NULL
/// );
/// ```

use super::{nullable, Contact, Service};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Client record as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    pub id: Uuid,

    pub client_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_channel: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,

    pub created_on: DateTime<Utc>,

    pub modified_on: DateTime<Utc>,
}

/// Client with its contacts and services embedded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientDetail {
    #[serde(flatten)]
    pub client: Client,

    /// Contacts whose `attached_to_client` lists this client
    pub client_contacts: Vec<Contact>,

    /// Services whose `attached_to_client` lists this client
    pub managed_services: Vec<Service>,
}

/// Input for creating a client
///
/// Missing fields deserialize as empty so that validation, not JSON
/// decoding, reports them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateClient {
    #[serde(default)]
    #[validate(length(min = 1, message = "client_name is required"))]
    pub client_name: String,

    #[serde(default)]
    pub slack_channel: Option<String>,

    #[serde(default)]
    pub web_url: Option<String>,
}

impl CreateClient {
    pub(crate) fn normalize(&mut self) {
        self.client_name = self.client_name.trim().to_string();
    }

    pub(crate) fn into_record(self, id: Uuid, now: DateTime<Utc>) -> Client {
        Client {
            id,
            client_name: self.client_name,
            slack_channel: self.slack_channel,
            web_url: self.web_url,
            created_on: now,
            modified_on: now,
        }
    }
}

/// Partial update for a client
///
/// Absent fields are left unchanged; an explicit `null` clears an optional one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateClient {
    #[validate(length(min = 1, message = "client_name cannot be blank"))]
    pub client_name: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub slack_channel: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub web_url: Option<Option<String>>,
}

impl UpdateClient {
    pub(crate) fn normalize(&mut self) {
        if let Some(name) = self.client_name.as_mut() {
            *name = name.trim().to_string();
        }
    }

    pub(crate) fn apply(self, client: &mut Client, now: DateTime<Utc>) {
        if let Some(client_name) = self.client_name {
            client.client_name = client_name;
        }
        if let Some(slack_channel) = self.slack_channel {
            client.slack_channel = slack_channel;
        }
        if let Some(web_url) = self.web_url {
            client.web_url = web_url;
        }
        client.modified_on = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_name_fails_validation() {
        let input: CreateClient = serde_json::from_str(r#"{"web_url":"https://example.com"}"#).unwrap();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("client_name"));
    }

    #[test]
    fn test_update_leaves_other_fields() {
        let now = Utc::now();
        let mut client = CreateClient {
            client_name: "Rolfson Inc".to_string(),
            slack_channel: Some("Lotstring".to_string()),
            web_url: Some("http://php.net".to_string()),
        }
        .into_record(Uuid::new_v4(), now);

        let later = now + chrono::Duration::seconds(5);
        UpdateClient {
            slack_channel: Some(Some("Sonair".to_string())),
            ..Default::default()
        }
        .apply(&mut client, later);

        assert_eq!(client.client_name, "Rolfson Inc");
        assert_eq!(client.slack_channel.as_deref(), Some("Sonair"));
        assert_eq!(client.web_url.as_deref(), Some("http://php.net"));
        assert_eq!(client.created_on, now);
        assert_eq!(client.modified_on, later);
    }

    #[test]
    fn test_detail_flattens_record() {
        let client = CreateClient {
            client_name: "Legros-Hayes".to_string(),
            ..Default::default()
        }
        .into_record(Uuid::new_v4(), Utc::now());

        let json = serde_json::to_value(ClientDetail {
            client: client.clone(),
            client_contacts: vec![],
            managed_services: vec![],
        })
        .unwrap();

        assert_eq!(json["id"], client.id.to_string());
        assert_eq!(json["client_name"], "Legros-Hayes");
        assert!(json["client_contacts"].as_array().unwrap().is_empty());
        assert!(json.get("slack_channel").is_none());
    }
}
