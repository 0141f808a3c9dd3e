//! Short order identifiers.
//!
//! An [`OrderId`] is six lowercase hexadecimal characters - three random
//! bytes drawn from a 24-bit space (~16.7M values). Order ids double as
//! redemption tokens rendered as a scannable code, so they are drawn from
//! a cryptographically secure source to keep them unguessable.
//!
//! Generation is a pure random draw; global uniqueness is enforced by the
//! order writer, which checks the order store and regenerates on collision.

use core::fmt;
use core::str;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length of an order identifier in characters.
pub const ORDER_ID_LEN: usize = 6;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Errors that can occur when parsing an [`OrderId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderIdError {
    /// The input is not exactly six characters.
    #[error("order id must be exactly {ORDER_ID_LEN} characters")]
    BadLength,
    /// The input contains a character outside `[0-9a-f]`.
    #[error("order id must be lowercase hexadecimal")]
    BadCharacter,
}

/// A six-character lowercase hexadecimal order identifier.
///
/// ## Examples
///
/// ```
/// use canteen_core::OrderId;
///
/// let id = OrderId::parse("a3f09b").unwrap();
/// assert_eq!(id.as_str(), "a3f09b");
/// assert!(OrderId::parse("A3F09B").is_err()); // uppercase rejected
/// assert!(OrderId::parse("a3f0").is_err());   // too short
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId([u8; ORDER_ID_LEN]);

impl OrderId {
    /// Draw a fresh random order identifier.
    ///
    /// Uses the thread-local CSPRNG. This is a pure draw - uniqueness
    /// against already-issued ids is the caller's responsibility.
    #[must_use]
    pub fn generate() -> Self {
        let bytes: [u8; 3] = rand::rng().random();
        Self::from_bytes(bytes)
    }

    /// Render three raw bytes as a six-character hex identifier.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        let mut out = [0u8; ORDER_ID_LEN];
        let mut i = 0;
        while i < 3 {
            out[i * 2] = HEX[(bytes[i] >> 4) as usize];
            out[i * 2 + 1] = HEX[(bytes[i] & 0x0f) as usize];
            i += 1;
        }
        Self(out)
    }

    /// Parse an order identifier from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`OrderIdError::BadLength`] for inputs that are not six
    /// characters, and [`OrderIdError::BadCharacter`] for anything outside
    /// lowercase hexadecimal.
    pub fn parse(input: &str) -> Result<Self, OrderIdError> {
        let bytes = input.as_bytes();
        let Ok(fixed) = <[u8; ORDER_ID_LEN]>::try_from(bytes) else {
            return Err(OrderIdError::BadLength);
        };
        if !fixed
            .iter()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(b))
        {
            return Err(OrderIdError::BadCharacter);
        }
        Ok(Self(fixed))
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Invariant: the buffer only ever holds ASCII hex digits.
        str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <&str>::deserialize(deserializer)?;
        Self::parse(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for OrderId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for OrderId {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for OrderId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

/// Source of candidate order identifiers.
///
/// The production implementation is a random draw; tests substitute
/// scripted generators to force collisions.
pub trait OrderIdGenerator {
    /// Produce one candidate identifier.
    fn generate(&self) -> OrderId;
}

/// The default generator: a fresh CSPRNG draw per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOrderIdGenerator;

impl OrderIdGenerator for RandomOrderIdGenerator {
    fn generate(&self) -> OrderId {
        OrderId::generate()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generate_shape() {
        let id = OrderId::generate();
        assert_eq!(id.as_str().len(), ORDER_ID_LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id.as_str(), id.as_str().to_lowercase());
    }

    #[test]
    fn test_from_bytes() {
        assert_eq!(OrderId::from_bytes([0x00, 0x00, 0x00]).as_str(), "000000");
        assert_eq!(OrderId::from_bytes([0xff, 0xff, 0xff]).as_str(), "ffffff");
        assert_eq!(OrderId::from_bytes([0xa3, 0xf0, 0x9b]).as_str(), "a3f09b");
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = OrderId::parse("a3f09b").expect("valid");
        assert_eq!(id.to_string(), "a3f09b");
        assert_eq!(OrderId::parse(id.as_str()), Ok(id));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(OrderId::parse(""), Err(OrderIdError::BadLength));
        assert_eq!(OrderId::parse("a3f09"), Err(OrderIdError::BadLength));
        assert_eq!(OrderId::parse("a3f09bb"), Err(OrderIdError::BadLength));
        assert_eq!(OrderId::parse("A3F09B"), Err(OrderIdError::BadCharacter));
        assert_eq!(OrderId::parse("a3f09z"), Err(OrderIdError::BadCharacter));
    }

    #[test]
    fn test_serde_as_string() {
        let id = OrderId::parse("0c42de").expect("valid");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"0c42de\"");
        let back: OrderId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn test_generated_ids_are_mostly_distinct() {
        // 100 draws from a 24-bit space; a collision here is ~0.03% likely,
        // so tolerate at most one.
        let ids: HashSet<_> = (0..100).map(|_| OrderId::generate()).collect();
        assert!(ids.len() >= 99);
    }
}
