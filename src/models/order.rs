//! Registration ("order") records as returned by Go-Out, and the flattened
//! participant rows produced from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::is_truthy;

/// One registration as returned by `getEventParticipants`.
///
/// Upstream shapes are loose, so every field is optional. Fields that are only
/// passed through to the output keep their raw JSON value; fields that the
/// pipeline inspects are typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawOrder {
    #[serde(rename = "_id")]
    pub id: Option<String>,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    pub phone_number: Option<Value>,

    pub mail: Option<Value>,

    pub birthdate: Option<Value>,

    pub gender: Option<Value>,

    pub age: Option<Value>,

    /// One of `Pending`, `Accepted`, `Rejected`, `Hidden`
    pub status: Option<String>,

    pub hidden: Option<Value>,

    pub order_date: Option<Value>,

    pub ticket_name: Option<Value>,

    pub ticket_price: Option<Value>,

    pub instagram_link: Option<String>,

    pub facebook_link: Option<String>,

    /// Whether the order came in through a salesman
    pub has_ref: Option<Value>,

    /// Salesman reference (a phone number)
    #[serde(rename = "ref")]
    pub referrer: Option<Value>,

    pub ref_first_name: Option<Value>,

    pub ref_last_name: Option<Value>,

    /// Companions registered under this order
    pub meta: Option<Vec<Companion>>,

    /// Everything else, including the `dynamicFieldN` answers
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawOrder {
    /// Whether this order was referred by a salesman
    pub fn is_referred(&self) -> bool {
        self.has_ref.as_ref().is_some_and(is_truthy)
    }

    /// Whether the order is flagged hidden
    pub fn is_hidden(&self) -> bool {
        self.hidden.as_ref().is_some_and(is_truthy)
    }

    /// Salesman reference as text; numeric references are stringified
    pub fn referrer_phone(&self) -> Option<String> {
        match self.referrer.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Companions in their original order (empty when absent)
    pub fn companions(&self) -> &[Companion] {
        self.meta.as_deref().unwrap_or_default()
    }

    /// `"<first> <last>"` of the primary registrant
    pub fn primary_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
    }
}

/// A person registered under someone else's order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Companion {
    #[serde(rename = "_id")]
    pub id: Option<String>,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    pub gender: Option<Value>,
}

/// Salesman attached to an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Referrer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<Value>,
}

/// Order-level fields every participant of the order inherits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,

    pub birthdate: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    pub hidden: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_name: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_price: Option<Value>,

    pub instagram_link: Option<String>,

    pub facebook_link: Option<String>,

    pub referrer: Option<Referrer>,

    pub dynamic_fields: Option<Map<String, Value>>,
}

/// One flattened row per person (primary registrant or companion).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(flatten)]
    pub shared: SharedFields,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    pub is_companion: bool,

    /// Display name of the primary registrant; companions only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_participant_name: Option<String>,
}

impl Participant {
    /// Whether this participant counts as hidden
    pub fn is_hidden(&self) -> bool {
        self.shared.hidden || self.has_status("Hidden")
    }

    /// Whether the inherited order status equals `status`
    pub fn has_status(&self, status: &str) -> bool {
        self.shared.status.as_deref() == Some(status)
    }
}
