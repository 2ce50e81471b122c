//! In-memory collections of documents keyed by [`ObjectId`].

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{Class, Enrollment, ObjectId, Payment, Selection, User};

/// A value that can live in a [`Collection`].
pub trait Document: Clone + PartialEq + Serialize + DeserializeOwned {
    fn id(&self) -> ObjectId;
}

/// Identifies one of the store's collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionName {
    Users,
    Classes,
    Selections,
    Payments,
    Enrollments,
}

impl CollectionName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Classes => "classes",
            Self::Selections => "selectedClass",
            Self::Payments => "payments",
            Self::Enrollments => "enrolled",
        }
    }
}

/// An ordered set of documents.
///
/// Iteration order is id order, which for generated ids is insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    docs: BTreeMap<ObjectId, T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            docs: BTreeMap::new(),
        }
    }
}

impl<T: Document> Collection<T> {
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&T> {
        self.docs.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut T> {
        self.docs.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.docs.values()
    }

    /// Clone every document matching `filter`.
    pub fn find(&self, filter: impl Fn(&T) -> bool) -> Vec<T> {
        self.docs.values().filter(|doc| filter(doc)).cloned().collect()
    }

    pub fn find_one(&self, filter: impl Fn(&T) -> bool) -> Option<&T> {
        self.docs.values().find(|doc| filter(doc))
    }

    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.docs.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Insert or replace a document, returning the previous version.
    pub fn put(&mut self, doc: T) -> Option<T> {
        self.docs.insert(doc.id(), doc)
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<T> {
        self.docs.remove(&id)
    }
}

// Persisted as a plain array of documents; the id index is rebuilt on load.
impl<T: Document> Serialize for Collection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.docs.values())
    }
}

impl<'de, T: Document> Deserialize<'de> for Collection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let docs = Vec::<T>::deserialize(deserializer)?;
        Ok(Self {
            docs: docs.into_iter().map(|doc| (doc.id(), doc)).collect(),
        })
    }
}

/// Every collection the server stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collections {
    pub users: Collection<User>,
    pub classes: Collection<Class>,
    pub selections: Collection<Selection>,
    pub payments: Collection<Payment>,
    pub enrollments: Collection<Enrollment>,
}

/// A document type bound to its collection in [`Collections`].
pub trait Stored: Document {
    const COLLECTION: CollectionName;

    fn collection(collections: &Collections) -> &Collection<Self>;

    fn collection_mut(collections: &mut Collections) -> &mut Collection<Self>;
}

macro_rules! stored {
    ($ty:ty, $field:ident, $name:expr) => {
        impl Document for $ty {
            fn id(&self) -> ObjectId {
                self.id
            }
        }

        impl Stored for $ty {
            const COLLECTION: CollectionName = $name;

            fn collection(collections: &Collections) -> &Collection<Self> {
                &collections.$field
            }

            fn collection_mut(collections: &mut Collections) -> &mut Collection<Self> {
                &mut collections.$field
            }
        }
    };
}

stored!(User, users, CollectionName::Users);
stored!(Class, classes, CollectionName::Classes);
stored!(Selection, selections, CollectionName::Selections);
stored!(Payment, payments, CollectionName::Payments);
stored!(Enrollment, enrollments, CollectionName::Enrollments);
