//! Actor Model

use serde::{Deserialize, Serialize};

use super::{Plant, Role};

/// The person issuing a request, as established by the session layer
///
/// `role` is kept as the raw session string; [`Actor::role`] parses it and
/// unknown names are treated as fully restricted downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub role: String,
    /// `None` means the actor is not bound to one plant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant: Option<Plant>,
    pub display_name: String,
}

impl Actor {
    pub fn new(role: impl Into<String>, plant: Option<Plant>, display_name: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            plant,
            display_name: display_name.into(),
        }
    }

    /// Parsed role, `None` for names outside the closed set
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }
}
