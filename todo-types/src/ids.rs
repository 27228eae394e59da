//! Identifier types for todo-sync.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a todo record.
///
/// Always a positive integer. Synced records keep the remote system's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TodoId(i64);

impl TodoId {
    /// Get the raw integer value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for TodoId {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidId(value.to_string()))
        }
    }
}

impl From<TodoId> for i64 {
    fn from(id: TodoId) -> Self {
        id.0
    }
}

impl FromStr for TodoId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .parse()
            .map_err(|_| ValidationError::InvalidId(s.to_string()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owner of a todo record. Always a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Get the raw integer value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidUserId(value.to_string()))
        }
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl FromStr for UserId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .parse()
            .map_err(|_| ValidationError::InvalidUserId(s.to_string()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_id_accepts_positive() {
        assert_eq!(TodoId::try_from(1).unwrap().value(), 1);
        assert_eq!("42".parse::<TodoId>().unwrap().value(), 42);
    }

    #[test]
    fn todo_id_rejects_non_positive() {
        assert_eq!(
            TodoId::try_from(0),
            Err(ValidationError::InvalidId("0".into()))
        );
        assert!(TodoId::try_from(-3).is_err());
        assert!("-1".parse::<TodoId>().is_err());
        assert!("abc".parse::<TodoId>().is_err());
        assert!("1.5".parse::<TodoId>().is_err());
        assert!("".parse::<TodoId>().is_err());
    }

    #[test]
    fn user_id_rejects_zero() {
        assert_eq!(
            "0".parse::<UserId>(),
            Err(ValidationError::InvalidUserId("0".into()))
        );
        assert_eq!("9".parse::<UserId>().unwrap().value(), 9);
    }

    #[test]
    fn ids_deserialize_with_validation() {
        let id: TodoId = serde_json::from_str("5").unwrap();
        assert_eq!(id.value(), 5);
        assert!(serde_json::from_str::<TodoId>("0").is_err());
        assert!(serde_json::from_str::<UserId>("-2").is_err());
    }

    #[test]
    fn ids_serialize_as_plain_integers() {
        let id = TodoId::try_from(12).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "12");
        assert_eq!(id.to_string(), "12");
    }
}
