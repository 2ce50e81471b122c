//! Dance classes and their approval lifecycle.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ObjectId;

/// Where a class is in the approval workflow.
///
/// The only legal transitions are `Pending -> Approved` and
/// `Pending -> Denied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassStatus {
    #[default]
    Pending,
    Approved,
    Denied,
}

impl ClassStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }
}

impl fmt::Display for ClassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored class.
///
/// # Invariants
///
/// - `feedback` is present iff `status` is `Denied`.
/// - `seats` and `total_student` never underflow (unsigned, and every
///   decrement is conditional).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_image: Option<String>,
    pub instructor_name: String,
    pub instructor_email: String,
    pub price: f64,
    pub seats: u32,
    #[serde(default)]
    pub total_student: u32,
    #[serde(default)]
    pub status: ClassStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// A class as submitted by an instructor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDraft {
    pub class_name: String,
    #[serde(default)]
    pub class_image: Option<String>,
    pub instructor_name: String,
    pub instructor_email: String,
    pub price: f64,
    pub seats: u32,
    /// Defaults to `Pending` when omitted.
    #[serde(default)]
    pub status: Option<ClassStatus>,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl ClassDraft {
    #[must_use]
    pub fn into_class(self, id: ObjectId) -> Class {
        Class {
            id,
            class_name: self.class_name,
            class_image: self.class_image,
            instructor_name: self.instructor_name,
            instructor_email: self.instructor_email,
            price: self.price,
            seats: self.seats,
            total_student: 0,
            status: self.status.unwrap_or_default(),
            feedback: self.feedback,
        }
    }
}

/// Body of `PATCH /updateClass/{id}`: the two fields an instructor may
/// overwrite after creation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ClassUpdate {
    pub price: f64,
    pub seats: u32,
}

/// An admin decision on a pending class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    Approve,
    Deny { feedback: String },
}

impl StatusChange {
    #[must_use]
    pub const fn target(&self) -> ClassStatus {
        match self {
            Self::Approve => ClassStatus::Approved,
            Self::Deny { .. } => ClassStatus::Denied,
        }
    }
}
