//! Cart entries: classes a user picked but has not paid for yet.

use serde::{Deserialize, Serialize};

use super::ObjectId;

/// A stored cart entry.
///
/// # Invariants
///
/// - At most one selection exists per (`email`, `class_id`) pair.
/// - No selection exists for a class the user is enrolled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub class_id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSelection {
    pub email: String,
    pub class_id: ObjectId,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub class_image: Option<String>,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl NewSelection {
    #[must_use]
    pub fn into_selection(self, id: ObjectId) -> Selection {
        Selection {
            id,
            email: self.email,
            class_id: self.class_id,
            class_name: self.class_name,
            class_image: self.class_image,
            instructor_name: self.instructor_name,
            price: self.price,
        }
    }
}
