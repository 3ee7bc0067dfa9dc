//! Session and token family types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique token family identifier
///
/// A family groups every token descended from one login or registration event
/// via rotation. Revoking the family invalidates all of them at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(pub Uuid);

impl FamilyId {
    /// Create a new random family ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a family ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for FamilyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FamilyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for FamilyId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Token pair returned by issuance and rotation
///
/// `expired_at` is the access token's expiry; `refreshable_until` is the
/// family's absolute refresh ceiling, fixed at family creation and never
/// extended by rotation. Both serialize as RFC 3339 timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPair {
    /// Access token (short-lived)
    pub access: String,
    /// Refresh token (long-lived, single-use)
    pub refresh: String,
    /// Access token expiry
    pub expired_at: DateTime<Utc>,
    /// Absolute ceiling past which the family can no longer be refreshed
    pub refreshable_until: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_family_id_roundtrip() {
        let id = FamilyId::new();
        let parsed = FamilyId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_session_pair_wire_shape() {
        let pair = SessionPair {
            access: "a.b".to_string(),
            refresh: "c.d".to_string(),
            expired_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            refreshable_until: Utc.with_ymd_and_hms(2025, 6, 8, 12, 0, 0).unwrap(),
        };

        let json = serde_json::to_string(&pair).unwrap();
        assert!(json.contains(r#""expired_at":"2025-06-01T12:00:00Z""#));
        assert!(json.contains(r#""refreshable_until":"2025-06-08T12:00:00Z""#));

        let back: SessionPair = serde_json::from_str(&json).unwrap();
        assert_eq!(back.access, pair.access);
        assert!(back.expired_at < back.refreshable_until);
    }
}
