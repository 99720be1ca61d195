//! Role matching and the permission flags shown for the active client.

use serde::Serialize;

use crate::domain::client::Client;

pub const SERVICE_ACCESS_ROLE: &str = "recovery";
pub const SERVICE_ANALYST_ROLE: &str = "recovery_analyst";
pub const SERVICE_MANAGER_ROLE: &str = "recovery_manager";
pub const SERVICE_ADMIN_ROLE: &str = "recovery_admin";
pub const SERVICE_REPRESENTATIVE_ROLE: &str = "recovery_representative";

/// Returns `true` when `role` is present in `roles` (exact match).
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

fn segment_matches(granted: &str, required: &str) -> bool {
    granted == "*" || granted == required
}

/// Matches `resource:action` permission strings.
///
/// Each granted segment may be `*`; a bare `*` grants everything.
pub fn has_permission(granted: &[String], required: &str) -> bool {
    let (req_resource, req_action) = required.split_once(':').unwrap_or((required, ""));

    granted.iter().any(|grant| {
        if grant == "*" {
            return true;
        }
        match grant.split_once(':') {
            Some((resource, action)) => {
                segment_matches(resource, req_resource) && segment_matches(action, req_action)
            }
            None => grant == required,
        }
    })
}

/// Capability set resolved once from the session roles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub can_view: bool,
    pub can_edit: bool,
    pub can_approve: bool,
    pub is_admin: bool,
    pub is_representative: bool,
}

impl Capabilities {
    /// Role definitions; unknown roles grant nothing.
    fn for_role(role: &str) -> Self {
        match role {
            SERVICE_ACCESS_ROLE => Self {
                can_view: true,
                ..Self::default()
            },
            SERVICE_ANALYST_ROLE => Self {
                can_view: true,
                can_edit: true,
                ..Self::default()
            },
            SERVICE_MANAGER_ROLE => Self {
                can_view: true,
                can_edit: true,
                can_approve: true,
                ..Self::default()
            },
            SERVICE_ADMIN_ROLE => Self {
                can_view: true,
                can_edit: true,
                can_approve: true,
                is_admin: true,
                is_representative: false,
            },
            SERVICE_REPRESENTATIVE_ROLE => Self {
                can_view: true,
                is_representative: true,
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    /// Capabilities granted by a session, if any role beyond plain access is held.
    ///
    /// Users holding only the access role get `None`, leaving the decision to
    /// the flags embedded on the client record.
    pub fn from_session_roles(roles: &[String]) -> Option<Self> {
        let grants_more = roles
            .iter()
            .any(|role| role != SERVICE_ACCESS_ROLE && Self::for_role(role) != Self::default());
        grants_more.then(|| Self::from_roles(roles))
    }

    /// Union of the role definitions for every role held.
    pub fn from_roles(roles: &[String]) -> Self {
        roles
            .iter()
            .map(|role| Self::for_role(role))
            .fold(Self::default(), |acc, caps| Self {
                can_view: acc.can_view || caps.can_view,
                can_edit: acc.can_edit || caps.can_edit,
                can_approve: acc.can_approve || caps.can_approve,
                is_admin: acc.is_admin || caps.is_admin,
                is_representative: acc.is_representative || caps.is_representative,
            })
    }
}

/// Read-only permission flags for the active client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPermissions {
    pub can_view: bool,
    pub can_edit: bool,
    pub can_approve: bool,
    pub is_admin: bool,
    pub is_representative: bool,
}

impl ClientPermissions {
    /// Derives the flags for `client`.
    ///
    /// No client means no permissions. Session capabilities take precedence
    /// over the flags embedded on the client record; a client without
    /// embedded flags grants nothing.
    pub fn resolve(client: Option<&Client>, capabilities: Option<&Capabilities>) -> Self {
        let Some(client) = client else {
            return Self::default();
        };

        if let Some(caps) = capabilities {
            return Self {
                can_view: caps.can_view,
                can_edit: caps.can_edit,
                can_approve: caps.can_approve,
                is_admin: caps.is_admin,
                is_representative: caps.is_representative,
            };
        }

        match client.user_roles {
            Some(roles) => Self {
                can_view: roles.can_view,
                can_edit: roles.can_edit,
                can_approve: roles.can_approve,
                is_admin: roles.is_admin,
                is_representative: roles.is_representative,
            },
            None => Self::default(),
        }
    }
}
