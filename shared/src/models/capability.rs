//! Capability Set
//!
//! Derived per request from role (and optionally plant), never stored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub can_add: bool,
    pub can_edit_direct: bool,
    pub can_delete_direct: bool,
    pub needs_approval_for_edit: bool,
    pub needs_approval_for_delete: bool,
    pub is_view_only: bool,
    pub can_view_users_page: bool,
    #[serde(rename = "canViewRKAPPage")]
    pub can_view_rkap_page: bool,
    pub can_view_settings: bool,
}

impl Capabilities {
    /// Capability set for roles outside the closed enumeration
    pub const RESTRICTED: Capabilities = Capabilities {
        can_add: false,
        can_edit_direct: false,
        can_delete_direct: false,
        needs_approval_for_edit: false,
        needs_approval_for_delete: false,
        is_view_only: true,
        can_view_users_page: false,
        can_view_rkap_page: false,
        can_view_settings: false,
    };

    /// Whether any write path (direct or gated) exists
    pub fn can_write(&self) -> bool {
        self.can_add
            || self.can_edit_direct
            || self.can_delete_direct
            || self.needs_approval_for_edit
            || self.needs_approval_for_delete
    }

    /// Check the structural invariants of a capability set:
    /// direct and gated paths never overlap, and view-only excludes writes.
    pub fn is_consistent(&self) -> bool {
        let exclusive = !(self.can_edit_direct && self.needs_approval_for_edit)
            && !(self.can_delete_direct && self.needs_approval_for_delete);
        let view_only_ok =
            !self.is_view_only || !(self.can_add || self.can_edit_direct || self.can_delete_direct);
        exclusive && view_only_ok
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::RESTRICTED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restricted_is_consistent() {
        let caps = Capabilities::default();
        assert!(caps.is_view_only);
        assert!(!caps.can_write());
        assert!(caps.is_consistent());
    }

    #[test]
    fn test_overlap_is_inconsistent() {
        let caps = Capabilities {
            can_edit_direct: true,
            needs_approval_for_edit: true,
            is_view_only: false,
            ..Capabilities::RESTRICTED
        };
        assert!(!caps.is_consistent());
    }

    #[test]
    fn test_serde_keeps_frontend_names() {
        let json = serde_json::to_value(Capabilities::RESTRICTED).unwrap();
        assert_eq!(json["isViewOnly"], true);
        assert_eq!(json["canViewRKAPPage"], false);
        assert_eq!(json["needsApprovalForDelete"], false);
    }
}
