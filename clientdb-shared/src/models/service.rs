/// Service model
///
/// A managed service with its invoicing terms. Like contacts, services carry
/// the client association in `attached_to_client`.

use super::{dedup_refs, nullable, ClientRef, ClientSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Service record as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,

    pub service_name: String,

    pub service_type: String,

    pub service_owner: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_description: Option<String>,

    pub service_status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_frequency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_fee: Option<f64>,

    #[serde(default)]
    pub attached_to_client: Vec<ClientRef>,

    pub created_on: DateTime<Utc>,

    pub modified_on: DateTime<Utc>,
}

impl Service {
    /// Whether this service is attached to `client_id`
    pub fn is_attached_to(&self, client_id: Uuid) -> bool {
        self.attached_to_client.iter().any(|r| r.client_id == client_id)
    }
}

/// Service with its clients resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDetail {
    #[serde(flatten)]
    pub service: Service,

    pub client: Vec<ClientSummary>,
}

/// Input for creating a service
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateService {
    #[serde(default)]
    #[validate(length(min = 1, message = "service_name is required"))]
    pub service_name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "service_type is required"))]
    pub service_type: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "service_owner is required"))]
    pub service_owner: String,

    #[serde(default)]
    pub service_description: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "service_status is required"))]
    pub service_status: String,

    #[serde(default)]
    pub invoice_frequency: Option<String>,

    #[serde(default)]
    pub invoice_amount: Option<f64>,

    #[serde(default)]
    pub management_fee: Option<f64>,

    #[serde(default)]
    pub attached_to_client: Vec<ClientRef>,
}

impl CreateService {
    pub(crate) fn normalize(&mut self) {
        for field in [
            &mut self.service_name,
            &mut self.service_type,
            &mut self.service_owner,
            &mut self.service_status,
        ] {
            *field = field.trim().to_string();
        }
        self.attached_to_client = dedup_refs(std::mem::take(&mut self.attached_to_client));
    }

    pub(crate) fn into_record(self, id: Uuid, now: DateTime<Utc>) -> Service {
        Service {
            id,
            service_name: self.service_name,
            service_type: self.service_type,
            service_owner: self.service_owner,
            service_description: self.service_description,
            service_status: self.service_status,
            invoice_frequency: self.invoice_frequency,
            invoice_amount: self.invoice_amount,
            management_fee: self.management_fee,
            attached_to_client: self.attached_to_client,
            created_on: now,
            modified_on: now,
        }
    }
}

/// Partial update for a service
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateService {
    #[validate(length(min = 1, message = "service_name cannot be blank"))]
    pub service_name: Option<String>,

    #[validate(length(min = 1, message = "service_type cannot be blank"))]
    pub service_type: Option<String>,

    #[validate(length(min = 1, message = "service_owner cannot be blank"))]
    pub service_owner: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub service_description: Option<Option<String>>,

    #[validate(length(min = 1, message = "service_status cannot be blank"))]
    pub service_status: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub invoice_frequency: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub invoice_amount: Option<Option<f64>>,

    #[serde(default, deserialize_with = "nullable")]
    pub management_fee: Option<Option<f64>>,

    pub attached_to_client: Option<Vec<ClientRef>>,
}

impl UpdateService {
    pub(crate) fn normalize(&mut self) {
        for field in [
            &mut self.service_name,
            &mut self.service_type,
            &mut self.service_owner,
            &mut self.service_status,
        ] {
            if let Some(value) = field.as_mut() {
                *value = value.trim().to_string();
            }
        }
        if let Some(refs) = self.attached_to_client.take() {
            self.attached_to_client = Some(dedup_refs(refs));
        }
    }

    pub(crate) fn apply(self, service: &mut Service, now: DateTime<Utc>) {
        if let Some(v) = self.service_name {
            service.service_name = v;
        }
        if let Some(v) = self.service_type {
            service.service_type = v;
        }
        if let Some(v) = self.service_owner {
            service.service_owner = v;
        }
        if let Some(v) = self.service_description {
            service.service_description = v;
        }
        if let Some(v) = self.service_status {
            service.service_status = v;
        }
        if let Some(v) = self.invoice_frequency {
            service.invoice_frequency = v;
        }
        if let Some(v) = self.invoice_amount {
            service.invoice_amount = v;
        }
        if let Some(v) = self.management_fee {
            service.management_fee = v;
        }
        if let Some(refs) = self.attached_to_client {
            service.attached_to_client = refs;
        }
        service.modified_on = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redhold() -> CreateService {
        CreateService {
            service_name: "Redhold".to_string(),
            service_type: "br.com.uol.Lotstring".to_string(),
            service_owner: "Emmit Gearty".to_string(),
            service_status: "Tools".to_string(),
            invoice_frequency: Some("Yearly".to_string()),
            invoice_amount: Some(256.0),
            management_fee: Some(90.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_required_fields() {
        assert!(redhold().validate().is_ok());

        let input: CreateService =
            serde_json::from_str(r#"{"service_name":"Viva","service_owner":"Karie Titford"}"#).unwrap();
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("service_type"));
        assert!(fields.contains_key("service_status"));
        assert!(!fields.contains_key("service_name"));
    }

    #[test]
    fn test_partial_update() {
        let mut service = redhold().into_record(Uuid::new_v4(), Utc::now());
        UpdateService {
            invoice_amount: Some(Some(300.5)),
            ..Default::default()
        }
        .apply(&mut service, Utc::now());

        assert_eq!(service.invoice_amount, Some(300.5));
        assert_eq!(service.management_fee, Some(90.0));
        assert_eq!(service.service_name, "Redhold");
        assert!(service.attached_to_client.is_empty());
    }

    #[test]
    fn test_null_clears_optional_fields() {
        let mut service = redhold().into_record(Uuid::new_v4(), Utc::now());
        let update: UpdateService =
            serde_json::from_str(r#"{"invoice_amount":null,"service_description":null}"#).unwrap();
        update.apply(&mut service, Utc::now());

        assert_eq!(service.invoice_amount, None);
        assert_eq!(service.service_description, None);
        assert_eq!(service.management_fee, Some(90.0));
        assert_eq!(service.invoice_frequency.as_deref(), Some("Yearly"));
    }

    #[test]
    fn test_update_replaces_reference_list() {
        let first = ClientRef { client_id: Uuid::new_v4() };
        let second = ClientRef { client_id: Uuid::new_v4() };
        let mut service = CreateService {
            attached_to_client: vec![first],
            ..redhold()
        }
        .into_record(Uuid::new_v4(), Utc::now());

        UpdateService {
            attached_to_client: Some(vec![second]),
            ..Default::default()
        }
        .apply(&mut service, Utc::now());

        assert!(!service.is_attached_to(first.client_id));
        assert!(service.is_attached_to(second.client_id));
    }
}
