//! Role Model

use serde::{Deserialize, Serialize};

/// Closed set of application roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Supervisor,
    Avp,
    Manager,
    User,
    Eksternal,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Supervisor,
        Role::Avp,
        Role::Manager,
        Role::User,
        Role::Eksternal,
    ];

    /// Parse a session role string. Names match exactly; anything else,
    /// including case or whitespace variants, yields `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "supervisor" => Some(Self::Supervisor),
            "avp" => Some(Self::Avp),
            "manager" => Some(Self::Manager),
            "user" => Some(Self::User),
            "eksternal" => Some(Self::Eksternal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Supervisor => "supervisor",
            Self::Avp => "avp",
            Self::Manager => "manager",
            Self::User => "user",
            Self::Eksternal => "eksternal",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_role() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_parse_rejects_case_and_whitespace_variants() {
        assert_eq!(Role::parse(" Admin "), None);
        assert_eq!(Role::parse("admin "), None);
        assert_eq!(Role::parse("AVP"), None);
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }
}
