/// List filtering, sorting and paging
///
/// The admin front-end sends json-server style parameters on list calls:
///
/// ```text
/// GET /api/clients?q=inc&_sort=client_name&_order=DESC&_start=0&_end=10
/// ```
///
/// All of them are optional. `q` is a case-insensitive substring match over
/// a record's text fields; `_start`/`_end` take a half-open slice after
/// filtering and sorting. The total before slicing is reported separately so
/// it can go out as `X-Total-Count`.

use crate::models::{ClientDetail, ContactDetail, ServiceDetail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// List request parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Free-text search
    #[serde(default)]
    pub q: Option<String>,

    /// Field to sort by
    #[serde(default, rename = "_sort")]
    pub sort: Option<String>,

    /// `ASC` or `DESC`, case-insensitive
    #[serde(default, rename = "_order")]
    pub order: Option<String>,

    /// First index of the page (inclusive)
    #[serde(default, rename = "_start")]
    pub start: Option<usize>,

    /// Last index of the page (exclusive)
    #[serde(default, rename = "_end")]
    pub end: Option<usize>,
}

/// One page of list results
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Matches before paging
    pub total: usize,

    pub items: Vec<T>,
}

/// A field value used for ordering
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
    Time(DateTime<Utc>),
    Missing,
}

impl SortValue<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        use SortValue::*;
        match (self, other) {
            (Text(a), Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (Number(a), Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Time(a), Time(b)) => a.cmp(b),
            (Missing, Missing) => Ordering::Equal,
            // missing values sort after present ones
            (Missing, _) => Ordering::Greater,
            (_, Missing) => Ordering::Less,
            _ => Ordering::Equal,
        }
    }
}

impl<'a> From<&'a Option<String>> for SortValue<'a> {
    fn from(value: &'a Option<String>) -> Self {
        value.as_deref().map(SortValue::Text).unwrap_or(SortValue::Missing)
    }
}

impl From<Option<f64>> for SortValue<'_> {
    fn from(value: Option<f64>) -> Self {
        value.map(SortValue::Number).unwrap_or(SortValue::Missing)
    }
}

/// Records that can be searched and sorted by list queries
pub trait Queryable {
    /// Value of `field` for ordering; unknown fields are `Missing`
    fn sort_value(&self, field: &str) -> SortValue<'_>;

    /// Text fields searched by `q`
    fn search_text(&self) -> Vec<&str>;
}

impl ListQuery {
    fn needle(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    fn descending(&self) -> bool {
        self.order
            .as_deref()
            .map(|o| o.eq_ignore_ascii_case("desc"))
            .unwrap_or(false)
    }

    /// Filters, sorts and slices `items`
    ///
    /// Input order is kept for equal sort keys, and when no sort is given.
    pub fn apply<T: Queryable>(&self, items: Vec<T>) -> Page<T> {
        let mut items: Vec<T> = match self.needle() {
            Some(needle) => items
                .into_iter()
                .filter(|item| {
                    item.search_text()
                        .iter()
                        .any(|text| text.to_lowercase().contains(&needle))
                })
                .collect(),
            None => items,
        };

        if let Some(field) = self.sort.as_deref() {
            let descending = self.descending();
            items.sort_by(|a, b| {
                let ordering = a.sort_value(field).compare(&b.sort_value(field));
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let total = items.len();
        let start = self.start.unwrap_or(0).min(total);
        let end = self.end.unwrap_or(total).clamp(start, total);

        let items = items.into_iter().skip(start).take(end - start).collect();
        Page { total, items }
    }
}

impl Queryable for ClientDetail {
    fn sort_value(&self, field: &str) -> SortValue<'_> {
        let c = &self.client;
        match field {
            "client_name" => SortValue::Text(&c.client_name),
            "slack_channel" => (&c.slack_channel).into(),
            "web_url" => (&c.web_url).into(),
            "created_on" => SortValue::Time(c.created_on),
            "modified_on" => SortValue::Time(c.modified_on),
            _ => SortValue::Missing,
        }
    }

    fn search_text(&self) -> Vec<&str> {
        let c = &self.client;
        let mut text = vec![c.client_name.as_str()];
        text.extend(c.slack_channel.as_deref());
        text.extend(c.web_url.as_deref());
        text
    }
}

impl Queryable for ContactDetail {
    fn sort_value(&self, field: &str) -> SortValue<'_> {
        let c = &self.contact;
        match field {
            "first_name" => SortValue::Text(&c.first_name),
            "last_name" => SortValue::Text(&c.last_name),
            "full_name" => SortValue::Text(&c.full_name),
            "email" => SortValue::Text(&c.email),
            "phone_number" => (&c.phone_number).into(),
            "role" => (&c.role).into(),
            "created_on" => SortValue::Time(c.created_on),
            "modified_on" => SortValue::Time(c.modified_on),
            _ => SortValue::Missing,
        }
    }

    fn search_text(&self) -> Vec<&str> {
        let c = &self.contact;
        let mut text = vec![c.full_name.as_str(), c.email.as_str()];
        text.extend(c.phone_number.as_deref());
        text.extend(c.role.as_deref());
        text.extend(self.client.iter().map(|s| s.client_name.as_str()));
        text
    }
}

impl Queryable for ServiceDetail {
    fn sort_value(&self, field: &str) -> SortValue<'_> {
        let s = &self.service;
        match field {
            "service_name" => SortValue::Text(&s.service_name),
            "service_type" => SortValue::Text(&s.service_type),
            "service_owner" => SortValue::Text(&s.service_owner),
            "service_status" => SortValue::Text(&s.service_status),
            "service_description" => (&s.service_description).into(),
            "invoice_frequency" => (&s.invoice_frequency).into(),
            "invoice_amount" => s.invoice_amount.into(),
            "management_fee" => s.management_fee.into(),
            "created_on" => SortValue::Time(s.created_on),
            "modified_on" => SortValue::Time(s.modified_on),
            _ => SortValue::Missing,
        }
    }

    fn search_text(&self) -> Vec<&str> {
        let s = &self.service;
        let mut text = vec![
            s.service_name.as_str(),
            s.service_type.as_str(),
            s.service_owner.as_str(),
            s.service_status.as_str(),
        ];
        text.extend(s.service_description.as_deref());
        text.extend(self.client.iter().map(|c| c.client_name.as_str()));
        text
    }
}
