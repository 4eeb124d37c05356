//! Permission Definitions
//!
//! Role based capability model.
//!
//! ## Rules
//! - One static table maps each role to its capability set
//! - Roles outside the table are view-only with no page access
//! - Direct and gated write paths never overlap for the same action
//! - Creates are never gated: a role either adds directly or not at all

use std::collections::HashSet;

use shared::models::{ActionType, Actor, Capabilities, Plant, Role};

#[allow(clippy::too_many_arguments)]
const fn caps(
    can_add: bool,
    edit_direct: bool,
    delete_direct: bool,
    edit_gated: bool,
    delete_gated: bool,
    view_only: bool,
    users_page: bool,
    rkap_page: bool,
    settings: bool,
) -> Capabilities {
    Capabilities {
        can_add,
        can_edit_direct: edit_direct,
        can_delete_direct: delete_direct,
        needs_approval_for_edit: edit_gated,
        needs_approval_for_delete: delete_gated,
        is_view_only: view_only,
        can_view_users_page: users_page,
        can_view_rkap_page: rkap_page,
        can_view_settings: settings,
    }
}

/// Authoritative role table
///
/// Column order: add, edit-direct, delete-direct, edit-needs-approval,
/// delete-needs-approval, view-only, users page, RKAP page, settings.
#[rustfmt::skip]
pub const ROLE_CAPABILITIES: &[(Role, Capabilities)] = &[
    (Role::Admin,      caps(true,  true,  true,  false, false, false, true,  true,  true)),
    (Role::Supervisor, caps(true,  true,  true,  false, false, false, false, true,  true)),
    (Role::Avp,        caps(true,  true,  true,  false, false, false, false, true,  true)),
    (Role::User,       caps(true,  false, false, true,  true,  false, false, false, false)),
    (Role::Manager,    caps(false, false, false, false, false, true,  false, false, false)),
    (Role::Eksternal,  caps(false, false, false, false, false, true,  false, false, false)),
];

/// Table lookup for a parsed role
pub fn role_capabilities(role: Role) -> Capabilities {
    ROLE_CAPABILITIES
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, c)| *c)
        .unwrap_or(Capabilities::RESTRICTED)
}

/// Mutation being attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Edit,
    Delete,
}

impl MutationKind {
    /// Action recorded on an approval request. `None` for creates.
    pub fn action_type(&self) -> Option<ActionType> {
        match self {
            Self::Create => None,
            Self::Edit => Some(ActionType::Edit),
            Self::Delete => Some(ActionType::Delete),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

impl From<ActionType> for MutationKind {
    fn from(action: ActionType) -> Self {
        match action {
            ActionType::Edit => Self::Edit,
            ActionType::Delete => Self::Delete,
        }
    }
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a mutation must be handled for a given capability set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Apply immediately
    Direct,
    /// Capture as an approval request
    NeedsApproval,
    Forbidden,
}

pub fn classify(caps: &Capabilities, kind: MutationKind) -> Disposition {
    let (direct, gated) = match kind {
        MutationKind::Create => (caps.can_add, false),
        MutationKind::Edit => (caps.can_edit_direct, caps.needs_approval_for_edit),
        MutationKind::Delete => (caps.can_delete_direct, caps.needs_approval_for_delete),
    };
    if direct {
        Disposition::Direct
    } else if gated {
        Disposition::NeedsApproval
    } else {
        Disposition::Forbidden
    }
}

/// Reviewing an action requires being able to perform it directly
pub fn can_review(caps: &Capabilities, action: ActionType) -> bool {
    match action {
        ActionType::Edit => caps.can_edit_direct,
        ActionType::Delete => caps.can_delete_direct,
    }
}

/// Plants whose actors may see the users, RKAP and settings pages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagePlantPolicy {
    plants: HashSet<Plant>,
}

impl PagePlantPolicy {
    pub fn new(plants: impl IntoIterator<Item = Plant>) -> Self {
        Self {
            plants: plants.into_iter().collect(),
        }
    }

    /// Actors with no plant binding always pass
    pub fn allows(&self, plant: Option<&Plant>) -> bool {
        plant.is_none_or(|p| self.plants.contains(p))
    }
}

/// Computes capability sets from role and plant
#[derive(Debug, Clone, Default)]
pub struct PermissionEvaluator {
    page_policy: Option<PagePlantPolicy>,
}

impl PermissionEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_policy(mut self, policy: PagePlantPolicy) -> Self {
        self.page_policy = Some(policy);
        self
    }

    pub fn page_policy(&self) -> Option<&PagePlantPolicy> {
        self.page_policy.as_ref()
    }

    /// Capability set for a role string and optional plant binding
    ///
    /// Total: unknown roles get [`Capabilities::RESTRICTED`]. The page policy
    /// only ever removes page flags, write capabilities come from the table.
    pub fn capabilities(&self, role: &str, plant: Option<&Plant>) -> Capabilities {
        let mut caps = Role::parse(role)
            .map(role_capabilities)
            .unwrap_or(Capabilities::RESTRICTED);

        if let Some(policy) = &self.page_policy
            && !policy.allows(plant)
        {
            caps.can_view_users_page = false;
            caps.can_view_rkap_page = false;
            caps.can_view_settings = false;
        }
        caps
    }

    pub fn for_actor(&self, actor: &Actor) -> Capabilities {
        self.capabilities(&actor.role, actor.plant.as_ref())
    }

    pub fn can_add(&self, role: &str, plant: Option<&Plant>) -> bool {
        self.capabilities(role, plant).can_add
    }

    pub fn can_edit_direct(&self, role: &str, plant: Option<&Plant>) -> bool {
        self.capabilities(role, plant).can_edit_direct
    }

    pub fn can_delete_direct(&self, role: &str, plant: Option<&Plant>) -> bool {
        self.capabilities(role, plant).can_delete_direct
    }

    pub fn needs_approval_for_edit(&self, role: &str, plant: Option<&Plant>) -> bool {
        self.capabilities(role, plant).needs_approval_for_edit
    }

    pub fn needs_approval_for_delete(&self, role: &str, plant: Option<&Plant>) -> bool {
        self.capabilities(role, plant).needs_approval_for_delete
    }

    pub fn is_view_only(&self, role: &str, plant: Option<&Plant>) -> bool {
        self.capabilities(role, plant).is_view_only
    }

    pub fn can_view_users_page(&self, role: &str, plant: Option<&Plant>) -> bool {
        self.capabilities(role, plant).can_view_users_page
    }

    pub fn can_view_rkap_page(&self, role: &str, plant: Option<&Plant>) -> bool {
        self.capabilities(role, plant).can_view_rkap_page
    }

    pub fn can_view_settings(&self, role: &str, plant: Option<&Plant>) -> bool {
        self.capabilities(role, plant).can_view_settings
    }

    /// Classify a mutation for an actor
    pub fn classify(&self, actor: &Actor, kind: MutationKind) -> Disposition {
        classify(&self.for_actor(actor), kind)
    }
}
