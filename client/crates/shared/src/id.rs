//! Common ID Types
//!
//! Type-safe wrappers for backend record identifiers.
//!
//! The backend is free to hand out numeric or string ids; an [`Id`] keeps
//! whichever form it received and serializes it back the same way, so ids
//! round-trip through request bodies untouched.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Raw identifier as sent by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Number(n) => write!(f, "{}", n),
            RawId::Text(s) => f.write_str(s),
        }
    }
}

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type UserId = Id<markers::User>;
///
/// let id: UserId = serde_json::from_str("42").unwrap();
/// assert_eq!(id.to_string(), "42");
/// assert_eq!(serde_json::to_string(&id).unwrap(), "42");
/// ```
pub struct Id<T> {
    value: RawId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Create from a numeric id
    pub fn from_number(value: i64) -> Self {
        Self {
            value: RawId::Number(value),
            _marker: PhantomData,
        }
    }

    /// Create from a textual id
    ///
    /// Purely numeric text is stored as a number so that ids typed on a
    /// command line compare equal to ids decoded from JSON numbers.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        let raw = match value.parse::<i64>() {
            Ok(n) => RawId::Number(n),
            Err(_) => RawId::Text(value.to_string()),
        };
        Self {
            value: raw,
            _marker: PhantomData,
        }
    }

    /// Get the underlying raw id
    pub fn as_raw(&self) -> &RawId {
        &self.value
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<i64> for Id<T> {
    fn from(value: i64) -> Self {
        Self::from_number(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawId::deserialize(deserializer).map(|value| Self {
            value,
            _marker: PhantomData,
        })
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for user ids
    pub struct User;

    /// Marker for project ids
    pub struct Project;

    /// Marker for task ids
    pub struct Task;
}

/// Type aliases for common IDs
pub type UserId = Id<markers::User>;
pub type ProjectId = Id<markers::Project>;
pub type TaskId = Id<markers::Task>;
