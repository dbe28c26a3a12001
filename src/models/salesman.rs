//! Salesmen (event user roles) and tracking links.
//!
//! Go-Out reports sales through two unrelated entity kinds: users holding a
//! role on the event, and anonymous tracking links. Both are surfaced as a
//! single [`SalesmanEntry`] list that shares one statistics shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User role as returned by `getEventUserRoles`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawUserRole {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub user_id: Option<Value>,
    pub user_phone_number: Option<String>,
    pub user_first_name: Option<String>,
    pub first_name: Option<String>,
    pub user_last_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Value>,
    pub role_english: Option<Value>,
    pub role_hebrew: Option<Value>,
    pub frees: Option<f64>,
    pub paid: Option<f64>,
    pub statistics: Option<RawUserRoleStatistics>,
    #[serde(rename = "Views")]
    pub views_upper: Option<f64>,
    pub views: Option<f64>,
    pub link: Option<Value>,
    pub joining_date: Option<Value>,
    pub added_by: Option<RawAddedBy>,
    pub teamleader_ref: Option<Value>,
    pub disabled: Option<bool>,
    pub permissions: Option<Map<String, Value>>,
}

/// Money counters of a user role
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawUserRoleStatistics {
    /// Revenue from paid tickets
    pub credit: Option<f64>,
}

/// Who granted the role
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAddedBy {
    pub first_name: Option<Value>,
    pub last_name: Option<Value>,
    pub phone_number: Option<Value>,
}

/// Response of `getEventUserRoles`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRolesResponse {
    pub status: Option<bool>,
    pub users: Option<Vec<RawUserRole>>,
}

/// Tracking link as returned by `trackingLinks/getTrackingLinks`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTrackingLink {
    pub link: Option<String>,
    pub link_name: Option<String>,
    pub active_link: Option<Value>,
    pub referer: Option<RawReferer>,
    #[serde(rename = "Views")]
    pub views_upper: Option<f64>,
    pub views: Option<f64>,
    pub frees: Option<f64>,
    pub total_revenue: Option<f64>,
    /// Free + paid + hidden registrations
    pub sold: Option<f64>,
}

/// Owner of a tracking link
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawReferer {
    pub ref_first_name: Option<Value>,
    pub ref_last_name: Option<Value>,
    pub ref_phone_number: Option<String>,
}

/// Response of `trackingLinks/getTrackingLinks`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackingLinksResponse {
    pub status: Option<bool>,
    #[serde(rename = "Links")]
    pub links: Option<Vec<RawTrackingLink>>,
}

impl TrackingLinksResponse {
    /// Empty, unsuccessful response used when the tracking-links call fails
    pub fn unavailable() -> Self {
        Self {
            status: Some(false),
            links: Some(Vec::new()),
        }
    }
}

/// Counters shared by salesmen and tracking links
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesmanStatistics {
    /// Free + paid
    pub total_registrations: u64,
    pub free_registrations: u64,
    pub paid_registrations: u64,
    pub revenue: f64,
    pub views: u64,
}

/// Role names in both UI languages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleNames {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub english: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hebrew: Option<Value>,
}

/// Contact details of a person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<Value>,
}

/// A registered user with a salesman role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesmanRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    pub role: RoleNames,
    pub statistics: SalesmanStatistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joining_date: Option<Value>,
    pub added_by: Option<PersonRef>,
    pub teamleader_ref: Option<Value>,
    pub disabled: bool,
    pub permissions: Map<String, Value>,
}

/// A tracking link treated as an anonymous salesman
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingLinkRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_link: Option<Value>,
    pub referer: Option<PersonRef>,
    pub statistics: SalesmanStatistics,
    pub sold: u64,
    /// Registrations not accounted for by free or paid tickets
    pub hidden_registrations: u64,
}

/// Either kind of sales channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SalesmanEntry {
    Salesman(SalesmanRecord),
    TrackingLink(TrackingLinkRecord),
}

impl SalesmanEntry {
    /// Discriminator as it appears in JSON
    pub fn kind(&self) -> &'static str {
        match self {
            SalesmanEntry::Salesman(_) => "salesman",
            SalesmanEntry::TrackingLink(_) => "tracking_link",
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            SalesmanEntry::Salesman(s) => s.id.as_deref(),
            SalesmanEntry::TrackingLink(l) => l.id.as_deref(),
        }
    }

    pub fn statistics(&self) -> &SalesmanStatistics {
        match self {
            SalesmanEntry::Salesman(s) => &s.statistics,
            SalesmanEntry::TrackingLink(l) => &l.statistics,
        }
    }

    /// Link name for tracking links, `"<first> <last>"` for salesmen
    pub fn display_name(&self) -> Option<String> {
        match self {
            SalesmanEntry::Salesman(s) => Some(format!(
                "{} {}",
                s.first_name.as_deref().unwrap_or_default(),
                s.last_name.as_deref().unwrap_or_default()
            )),
            SalesmanEntry::TrackingLink(l) => l.link_name.clone(),
        }
    }

    /// The salesman's own phone, or the tracking link owner's phone
    pub fn phone_number(&self) -> Option<Value> {
        match self {
            SalesmanEntry::Salesman(s) => s
                .phone_number
                .as_ref()
                .filter(|p| !p.is_empty())
                .map(|p| Value::from(p.as_str())),
            SalesmanEntry::TrackingLink(l) => l
                .referer
                .as_ref()
                .and_then(|r| r.phone_number.clone())
                .filter(|p| !p.is_null() && p.as_str() != Some("")),
        }
    }
}

/// Best-performing channel in a summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSalesman {
    pub id: Option<String>,
    pub name: Option<String>,
    pub phone_number: Option<Value>,
    #[serde(rename = "type")]
    pub kind: String,
    pub total_registrations: u64,
}

/// Totals across all channels of an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesmanSummary {
    pub total_salesmen: usize,
    pub total_views: u64,
    pub total_registrations: u64,
    pub total_free_registrations: u64,
    pub total_paid_registrations: u64,
    pub total_revenue: f64,
    pub top_salesman: Option<TopSalesman>,
}
