//! User accounts and their roles.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ObjectId;

/// The role a user plays on the platform.
///
/// Users start as members and are promoted by an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Instructor,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Instructor => "instructor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored user.
///
/// # Invariants
///
/// - `email` is unique across all users.
/// - Users are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "photoURL")]
    pub photo_url: Option<String>,
    /// Documents written without a role are members.
    #[serde(default)]
    pub role: Role,
}

/// Sign-in payload used to create a user on first login.
///
/// Any role sent by the client is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "photoURL")]
    pub photo_url: Option<String>,
}

impl NewUser {
    #[must_use]
    pub fn into_user(self, id: ObjectId) -> User {
        User {
            id,
            email: self.email,
            name: self.name,
            photo_url: self.photo_url,
            role: Role::Member,
        }
    }
}
