//! Human-readable rendering of resolved permissions

use std::collections::BTreeMap;

use super::permissions::{Permission, PermissionLevel};

/// Formats a resolved-permissions mapping as an indented text report
///
/// Levels appear in Admin/Write/Read order; a level absent from the map
/// prints nothing. Individual grants print the user line, group grants
/// print the group slug followed by the expanded member list.
pub fn permissions_report(
    repo_name: &str,
    permissions: &BTreeMap<PermissionLevel, Permission>,
) -> String {
    let mut lines = vec![format!("Permissions for repository: {}", repo_name)];

    for (level, permission) in permissions {
        lines.push(format!("  {} permission:", level.title()));

        if let Some(user) = &permission.user {
            lines.push(format!("    User: {} ({})", user.display_name, user.username));
        }

        if let Some(group) = &permission.group {
            lines.push(format!("    Group: {}", group.full_slug));
            if !permission.users.is_empty() {
                lines.push("    Users in group:".to_string());
                for member in &permission.users {
                    lines.push(format!(
                        "      - {} ({})",
                        member.display_name, member.username
                    ));
                }
            }
        }
    }

    lines.join("\n")
}
