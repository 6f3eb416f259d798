//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up a user id with a
//! transaction id at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Error returned when an id string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParseError(pub String);

impl fmt::Display for IdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "identifier must not be empty")
        } else {
            write!(f, "invalid identifier: '{}'", self.0)
        }
    }
}

impl std::error::Error for IdParseError {}

macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// The short form shown to users, e.g. `txn-1a2b3c4d`
            pub fn short(&self) -> String {
                format!("{}{}", $display_prefix, &self.0.simple().to_string()[..8])
            }

            /// Check whether `input` names this id, either in full (with or
            /// without prefix) or by its short form
            pub fn matches(&self, input: &str) -> bool {
                let input = input.trim();
                if input.is_empty() {
                    return false;
                }
                if let Ok(parsed) = input.parse::<Self>() {
                    return parsed == *self;
                }
                let bare = input.strip_prefix($display_prefix).unwrap_or(input);
                bare.len() >= 8 && self.0.simple().to_string().starts_with(&bare.to_lowercase())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(IdParseError(String::new()));
                }
                let bare = trimmed.strip_prefix($display_prefix).unwrap_or(trimmed);
                Uuid::parse_str(bare)
                    .map(Self)
                    .map_err(|_| IdParseError(trimmed.to_string()))
            }
        }
    };
}

define_id!(UserId, "usr-");
define_id!(TransactionId, "txn-");
define_id!(RecurringRuleId, "rec-");
