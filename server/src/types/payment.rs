//! Payment history and the enrollments payments produce.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Class, ObjectId};

/// An immutable record of a completed payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub price: f64,
    /// Provider charge-intent id; unique across payments.
    pub transaction_id: String,
    pub date: DateTime<Utc>,
    pub selected_class: ObjectId,
    pub enrolled_class: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

/// Body of a finalize-payment call.
///
/// Clients also send the `price` they were shown; it is ignored, since the
/// charge is checked against the class price in the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub email: String,
    #[serde(alias = "paymentIntentId")]
    pub transaction_id: String,
    pub selected_class: ObjectId,
    pub enrolled_class: ObjectId,
    #[serde(default)]
    pub class_name: Option<String>,
}

/// A confirmed place in a class, snapshotted from the class at purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub class_id: ObjectId,
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_image: Option<String>,
    pub instructor_email: String,
    pub instructor_name: String,
    pub price: f64,
}

impl Enrollment {
    #[must_use]
    pub fn from_snapshot(id: ObjectId, class: &Class, email: &str) -> Self {
        Self {
            id,
            email: email.to_string(),
            class_id: class.id,
            class_name: class.class_name.clone(),
            class_image: class.class_image.clone(),
            instructor_email: class.instructor_email.clone(),
            instructor_name: class.instructor_name.clone(),
            price: class.price,
        }
    }
}
