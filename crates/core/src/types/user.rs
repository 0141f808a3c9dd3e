//! User identifier type.
//!
//! Users are identified by their campus registration number, an opaque
//! non-empty string issued by the institution. The backend never parses
//! its structure.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Maximum accepted length for a user identifier.
const MAX_LEN: usize = 64;

/// Errors that can occur when parsing a [`UserId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UserIdError {
    /// The input string is empty or whitespace-only.
    #[error("user id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("user id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A campus user identifier (registration number).
///
/// ## Constraints
///
/// - Non-empty after trimming surrounding whitespace
/// - At most 64 characters
///
/// ## Examples
///
/// ```
/// use canteen_core::UserId;
///
/// assert!(UserId::parse("21z334").is_ok());
/// assert!(UserId::parse("  21z334  ").is_ok()); // trimmed
/// assert!(UserId::parse("").is_err());
/// assert!(UserId::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Parse a user identifier, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`UserIdError::Empty`] if the trimmed input is empty, or
    /// [`UserIdError::TooLong`] if it exceeds the maximum length.
    pub fn parse(input: &str) -> Result<Self, UserIdError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(UserIdError::Empty);
        }
        if trimmed.len() > MAX_LEN {
            return Err(UserIdError::TooLong { max: MAX_LEN });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let id = UserId::parse("21z334").expect("valid");
        assert_eq!(id.as_str(), "21z334");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id = UserId::parse("  21z334\n").expect("valid");
        assert_eq!(id.as_str(), "21z334");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(UserId::parse(""), Err(UserIdError::Empty));
        assert_eq!(UserId::parse("   "), Err(UserIdError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "x".repeat(MAX_LEN + 1);
        assert_eq!(UserId::parse(&long), Err(UserIdError::TooLong { max: MAX_LEN }));
    }

    #[test]
    fn test_serde_transparent() {
        let id = UserId::parse("21z334").expect("valid");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"21z334\"");
    }
}
