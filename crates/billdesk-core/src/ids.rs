//! Newtype IDs for catalog identity.
//!
//! Catalog ids arrive either as JSON numbers (database serials) or strings;
//! both are normalized to their text form so equality is by identity only.
//! Numbers must be integral; `1.0` and `1` name the same item.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                Self(n.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                #[derive(Deserialize)]
                #[serde(untagged)]
                enum Raw {
                    Text(String),
                    Number(serde_json::Number),
                }

                match Raw::deserialize(deserializer)? {
                    Raw::Text(s) => Ok(Self(s)),
                    Raw::Number(n) => integral_text(&n).map(Self).ok_or_else(|| {
                        serde::de::Error::custom(format!("id must be an integer or a string, got {}", n))
                    }),
                }
            }
        }
    };
}

/// Text form of an integral JSON number, whether written `7` or `7.0`.
fn integral_text(n: &serde_json::Number) -> Option<String> {
    if let Some(i) = n.as_i64() {
        return Some(i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return Some(u.to_string());
    }
    let f = n.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
        Some((f as i64).to_string())
    } else {
        None
    }
}

define_id!(ItemId);
