/// Contact model
///
/// Contacts are people. A contact may be attached to any number of clients
/// through `attached_to_client`. `full_name` is derived from the first and
/// last name and is never taken from input.

use super::{dedup_refs, nullable, ClientRef, ClientSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Contact record as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,

    pub first_name: String,

    pub last_name: String,

    /// Always `first_name + " " + last_name`
    pub full_name: String,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default)]
    pub attached_to_client: Vec<ClientRef>,

    pub created_on: DateTime<Utc>,

    pub modified_on: DateTime<Utc>,
}

impl Contact {
    /// Builds the display name from its parts
    ///
    /// ```
    /// use clientdb_shared::models::Contact;
    ///
    /// assert_eq!(Contact::full_name_of("Roda", "Torvey"), "Roda Torvey");
    /// ```
    pub fn full_name_of(first_name: &str, last_name: &str) -> String {
        format!("{} {}", first_name, last_name)
    }

    /// Whether this contact is attached to `client_id`
    pub fn is_attached_to(&self, client_id: Uuid) -> bool {
        self.attached_to_client.iter().any(|r| r.client_id == client_id)
    }
}

/// Contact with its clients resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactDetail {
    #[serde(flatten)]
    pub contact: Contact,

    /// Attached clients as `{ id, client_name }`
    pub client: Vec<ClientSummary>,
}

/// Input for creating a contact
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateContact {
    #[serde(default)]
    #[validate(length(min = 1, message = "first_name is required"))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "last_name is required"))]
    pub last_name: String,

    #[serde(default)]
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,

    #[serde(default)]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub attached_to_client: Vec<ClientRef>,
}

impl CreateContact {
    pub(crate) fn normalize(&mut self) {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.attached_to_client = dedup_refs(std::mem::take(&mut self.attached_to_client));
    }

    pub(crate) fn into_record(self, id: Uuid, now: DateTime<Utc>) -> Contact {
        Contact {
            id,
            full_name: Contact::full_name_of(&self.first_name, &self.last_name),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            role: self.role,
            attached_to_client: self.attached_to_client,
            created_on: now,
            modified_on: now,
        }
    }
}

/// Partial update for a contact
///
/// `attached_to_client`, when present, replaces the whole list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateContact {
    #[validate(length(min = 1, message = "first_name cannot be blank"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, message = "last_name cannot be blank"))]
    pub last_name: Option<String>,

    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub phone_number: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub role: Option<Option<String>>,

    pub attached_to_client: Option<Vec<ClientRef>>,
}

impl UpdateContact {
    pub(crate) fn normalize(&mut self) {
        for field in [&mut self.first_name, &mut self.last_name, &mut self.email] {
            if let Some(value) = field.as_mut() {
                *value = value.trim().to_string();
            }
        }
        if let Some(refs) = self.attached_to_client.take() {
            self.attached_to_client = Some(dedup_refs(refs));
        }
    }

    pub(crate) fn apply(self, contact: &mut Contact, now: DateTime<Utc>) {
        if let Some(first_name) = self.first_name {
            contact.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            contact.last_name = last_name;
        }
        if let Some(email) = self.email {
            contact.email = email;
        }
        if let Some(phone_number) = self.phone_number {
            contact.phone_number = phone_number;
        }
        if let Some(role) = self.role {
            contact.role = role;
        }
        if let Some(refs) = self.attached_to_client {
            contact.attached_to_client = refs;
        }
        contact.full_name = Contact::full_name_of(&contact.first_name, &contact.last_name);
        contact.modified_on = now;
    }
}
