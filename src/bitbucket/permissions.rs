//! Effective permission grants for a repository
//!
//! Resolution issues one access-grant listing per permission level and, for
//! group-based grants, a follow-up request expanding the group into its
//! individual members. A grant backed by a group is not considered complete
//! until that expansion has happened.
//!
//! Two conventions are pinned down here:
//! - a permission level with no grant entries is absent from the returned
//!   map, never present with an empty value;
//! - no sub-request failure is isolated: a failed grant listing or group
//!   expansion aborts the whole resolve with the transport error rather
//!   than degrading to an empty member list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::client::BitbucketClient;
use super::error::BitbucketError;
use super::models::Page;

/// Access level of a permission grant
///
/// Orders from the strongest grant down, which is also the order levels are
/// resolved and reported in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// Full administrative access
    #[strum(serialize = "admin")]
    Admin,
    /// Push access
    #[strum(serialize = "write")]
    Write,
    /// Read-only access
    #[strum(serialize = "read")]
    Read,
}

impl PermissionLevel {
    /// All levels, strongest first
    pub const ALL: [PermissionLevel; 3] = [
        PermissionLevel::Admin,
        PermissionLevel::Write,
        PermissionLevel::Read,
    ];

    /// Capitalized label used in human-readable reports
    pub fn title(&self) -> &'static str {
        match self {
            PermissionLevel::Admin => "Admin",
            PermissionLevel::Write => "Write",
            PermissionLevel::Read => "Read",
        }
    }
}

/// An individual account referenced by a grant or group membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// URL-safe account name
    pub username: String,

    /// Human-readable name for display purposes
    pub display_name: String,
}

/// A user group referenced by a grant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRef {
    /// Workspace-qualified group identifier, e.g. "my-team:developers"
    pub full_slug: String,

    /// Human-readable group name, not always present
    #[serde(default)]
    pub name: Option<String>,
}

/// One grant entry as returned by the access-grant endpoint
///
/// Carries either a `user` or a `group` reference, never both.
#[derive(Debug, Clone, Deserialize)]
pub struct GrantEntry {
    /// Individual grantee, absent for group grants
    #[serde(default)]
    pub user: Option<Account>,

    /// Group grantee, absent for individual grants
    #[serde(default)]
    pub group: Option<GroupRef>,
}

/// A resolved permission grant for one access level
///
/// Exactly one of `user` and `group` is set, or neither when the service
/// returned an entry with no grantee. For group grants, `users` holds the
/// expanded member list; the raw group reference alone is never the final
/// state of a resolved grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    /// Access level this grant applies to
    pub level: PermissionLevel,

    /// Individual grantee, if the grant targets a single user
    pub user: Option<Account>,

    /// Group grantee, if the grant targets a group
    pub group: Option<GroupRef>,

    /// Members of the group grantee, resolved before the grant is returned
    pub users: Vec<Account>,
}

/// Expands a group into its individual members
///
/// # Errors
///
/// Propagates transport and decoding errors; a failed expansion is a
/// genuine fetch failure, never an empty member list.
pub async fn group_members(
    client: &BitbucketClient,
    group_full_slug: &str,
) -> Result<Vec<Account>, BitbucketError> {
    let url = client.group_members_url(group_full_slug);
    let page: Page<Account> = client.get_json(&url).await?;
    Ok(page.values)
}

/// Resolves the effective admin/write/read grants of a repository
///
/// Issues one grant-listing request per level in [`PermissionLevel::ALL`]
/// order and keeps the first entry of each listing. Group grants are
/// completed by expanding membership into the grant's `users` field.
///
/// Levels without any grant entry are absent from the returned map.
///
/// # Errors
///
/// Any failing sub-request aborts the whole resolve; there is no partial
/// result.
pub async fn resolve_repo_permissions(
    client: &BitbucketClient,
    workspace: &str,
    repo_slug: &str,
) -> Result<BTreeMap<PermissionLevel, Permission>, BitbucketError> {
    let mut resolved = BTreeMap::new();

    for level in PermissionLevel::ALL {
        let url = client.permission_grants_url(workspace, repo_slug, level);
        let page: Page<GrantEntry> = client.get_json(&url).await?;

        let Some(entry) = page.values.into_iter().next() else {
            tracing::debug!("No {} grant on {}/{}", level, workspace, repo_slug);
            continue;
        };

        let mut permission = Permission {
            level,
            user: entry.user,
            group: entry.group,
            users: Vec::new(),
        };

        if let Some(group) = &permission.group {
            permission.users = group_members(client, &group.full_slug).await?;
        }

        resolved.insert(level, permission);
    }

    Ok(resolved)
}
