//! Expanding orders into one row per participant.

use serde_json::{Map, Value};

use crate::models::{Participant, RawOrder, Referrer, SharedFields};
use crate::utils::links::{format_social_link, trimmed_link};

const DYNAMIC_FIELD_PREFIX: &str = "dynamicField";

/// Collect the order's `dynamicFieldN` answers in their original order.
///
/// Returns `None` rather than an empty map when the order has none, so callers
/// can tell "no custom questions" apart from "questions left blank".
pub fn extract_dynamic_fields(order: &RawOrder) -> Option<Map<String, Value>> {
    let fields: Map<String, Value> = order
        .extra
        .iter()
        .filter(|(key, _)| key.starts_with(DYNAMIC_FIELD_PREFIX))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if fields.is_empty() {
        None
    } else {
        Some(fields)
    }
}

fn shared_fields(order: &RawOrder) -> SharedFields {
    let referrer = order.is_referred().then(|| Referrer {
        id: order.referrer.clone(),
        first_name: order.ref_first_name.clone(),
        last_name: order.ref_last_name.clone(),
    });

    SharedFields {
        phone_number: order.phone_number.clone(),
        email: order.mail.clone(),
        birthdate: order.birthdate.clone().filter(is_truthy),
        gender: order.gender.clone(),
        age: order.age.clone(),
        status: order.status.clone(),
        hidden: order.is_hidden(),
        order_date: order.order_date.clone(),
        ticket_name: order.ticket_name.clone(),
        ticket_price: order.ticket_price.clone(),
        instagram_link: format_social_link(order.instagram_link.as_deref()),
        facebook_link: trimmed_link(order.facebook_link.as_deref()),
        referrer,
        dynamic_fields: extract_dynamic_fields(order),
    }
}

/// Expand an order into `[primary, companion1, .., companionN]`.
///
/// Companions inherit every order-level field; only their own gender, when
/// present, overrides the order's.
pub fn flatten_order(order: &RawOrder) -> Vec<Participant> {
    let shared = shared_fields(order);
    let companions = order.companions();
    let mut participants = Vec::with_capacity(companions.len() + 1);

    participants.push(Participant {
        id: order.id.clone(),
        first_name: order.first_name.clone(),
        last_name: order.last_name.clone(),
        shared: shared.clone(),
        order_id: order.id.clone(),
        is_companion: false,
        primary_participant_name: None,
    });

    let primary_name = order.primary_name();
    for companion in companions {
        let mut inherited = shared.clone();
        if let Some(gender) = companion.gender.clone().filter(is_truthy) {
            inherited.gender = Some(gender);
        }

        participants.push(Participant {
            id: companion.id.clone(),
            first_name: companion.first_name.clone(),
            last_name: companion.last_name.clone(),
            shared: inherited,
            order_id: order.id.clone(),
            is_companion: true,
            primary_participant_name: Some(primary_name.clone()),
        });
    }

    participants
}

/// Flatten a sequence of orders, keeping order boundaries contiguous
pub fn flatten_orders(orders: &[RawOrder]) -> Vec<Participant> {
    orders.iter().flat_map(flatten_order).collect()
}

/// Whether a loose upstream value is set; blanks arrive as "", 0 or false
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
