//! Strongly-typed keyspace and table names.
//!
//! Keyspace and table names are spliced into DDL and DML text (they cannot be
//! bound as parameters), so both are restricted to plain unquoted identifiers:
//! an ASCII letter followed by ASCII letters, digits, or underscores, at most
//! [`MAX_IDENTIFIER_LEN`] characters. Names are folded to lowercase, matching
//! how unquoted identifiers are stored in the database catalog.

use crate::error::{CoreError, CoreResult};

/// Longest keyspace or table name accepted.
pub const MAX_IDENTIFIER_LEN: usize = 48;

/// Check `name` against the identifier rules, returning the failed rule.
fn check_identifier(name: &str) -> Result<(), &'static str> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Err("must not be empty"),
        Some(c) if !c.is_ascii_alphabetic() => return Err("must start with an ASCII letter"),
        Some(_) => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("must contain only ASCII letters, digits, and underscores");
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return Err("must be at most 48 characters");
    }
    Ok(())
}

/// Define a validated, lowercase identifier newtype.
///
/// Generates `parse()`, `as_str()`, `Display`, `AsRef<str>`, `Deref<Target=str>`,
/// `TryFrom<&str>`, `PartialEq<&str>`, and serde impls that run the same
/// validation on deserialize.
macro_rules! define_identifier {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident => $kind:literal;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis struct $Name(String);

        impl $Name {
            /// Validate `name` and fold it to lowercase.
            pub fn parse(name: impl AsRef<str>) -> CoreResult<Self> {
                let raw = name.as_ref();
                check_identifier(raw).map_err(|reason| CoreError::InvalidIdentifier {
                    kind: $kind,
                    name: raw.to_string(),
                    reason,
                })?;
                Ok(Self(raw.to_ascii_lowercase()))
            }

            /// Return the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<&str> for $Name {
            type Error = CoreError;
            fn try_from(s: &str) -> Result<Self, Self::Error> {
                Self::parse(s)
            }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl serde::Serialize for $Name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $Name::parse(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

define_identifier! {
    /// Name of the keyspace that migrations are applied to.
    pub struct KeyspaceName => "keyspace";
}

define_identifier! {
    /// Name of the ledger table inside the keyspace.
    pub struct TableName => "table";
}

#[cfg(test)]
#[path = "identifier_test.rs"]
mod tests;
