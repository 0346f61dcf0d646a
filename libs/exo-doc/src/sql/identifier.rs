// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{borrow::Cow, fmt::Display, sync::LazyLock};

use regex::Regex;

use crate::database_error::DatabaseError;

/// Dot-separated segments of letters, digits and underscores, not starting with a digit.
static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap()
});

const MAX_IDENTIFIER_LENGTH: usize = 128;

/// A name that is safe to substitute into query text (table names, column names, aliases).
///
/// Even though identifiers come only from schema metadata, every identifier is checked against an
/// allow-list of characters before it can reach the [`SQLBuilder`](super::SQLBuilder). The builder
/// only accepts `Identifier`s, so unchecked text cannot be pushed as an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(Cow<'static, str>);

impl Identifier {
    pub fn new(name: impl Into<String>) -> Result<Self, DatabaseError> {
        let name = name.into();

        if Self::is_valid(&name) {
            Ok(Self(Cow::Owned(name)))
        } else {
            Err(DatabaseError::InvalidIdentifier(name))
        }
    }

    /// Create an identifier from a compile-time constant known to satisfy the allow-list
    pub(crate) fn from_static(name: &'static str) -> Self {
        debug_assert!(Self::is_valid(name), "invalid static identifier {name}");
        Self(Cow::Borrowed(name))
    }

    pub fn is_valid(name: &str) -> bool {
        name.len() <= MAX_IDENTIFIER_LENGTH && IDENTIFIER_PATTERN.is_match(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a literal suffix, re-validating the result
    pub fn with_suffix(&self, suffix: &str) -> Result<Self, DatabaseError> {
        Self::new(format!("{}{suffix}", self.0))
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_names_and_member_paths() {
        for name in ["Customer", "_private", "Owner.Name", "Lines.Product.Sku", "Item2"] {
            assert!(Identifier::new(name).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn rejects_characters_outside_allow_list() {
        for name in [
            "",
            "2fast",
            "Owner..Name",
            "Owner.",
            "Name]",
            "a b",
            "x;drop",
            "[Name]",
            "Naïve",
        ] {
            assert!(
                matches!(Identifier::new(name), Err(DatabaseError::InvalidIdentifier(_))),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_overlong_names() {
        assert!(Identifier::new("a".repeat(MAX_IDENTIFIER_LENGTH)).is_ok());
        assert!(Identifier::new("a".repeat(MAX_IDENTIFIER_LENGTH + 1)).is_err());
    }

    #[test]
    fn suffix_is_validated() {
        let name = Identifier::new("Customer").unwrap();
        assert_eq!(name.with_suffix("Structure").unwrap().as_str(), "CustomerStructure");
        assert!(name.with_suffix("]--").is_err());
    }
}
