//! Typed records for the Bitbucket Cloud 2.0 wire format
//!
//! Each record is built directly from one API response and never mutated
//! afterwards. Unknown response fields are ignored; missing required fields
//! fail deserialization of the whole record.
//!
//! Bitbucket timestamps come with a partial timezone marker (a trailing
//! literal `Z`). The [`partial_timestamp`] helper strips the marker and
//! interprets the rest as a naive instant, without applying any offset.
//! Callers comparing these instants against offset-aware clocks must account
//! for that themselves.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::error::BitbucketError;

/// A single hyperlink entry in a `links` map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    /// Target URL of the link
    pub href: String,
}

/// The canonical hyperlinks attached to a repository record
///
/// `source` is the raw-content browsing root the bulk fetcher composes
/// per-file download URLs from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryLinks {
    /// Canonical API URL of the repository itself
    #[serde(rename = "self")]
    pub self_link: Link,

    /// Root URL for browsing raw source content
    pub source: Link,

    /// Clone URL of the repository
    pub clone: Link,

    /// Web UI URL, not present on every service version
    #[serde(default)]
    pub html: Option<Link>,
}

/// Account that owns a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    /// Human-readable name for display purposes
    pub display_name: String,

    /// Account type tag, e.g. "user" or "team"
    #[serde(rename = "type")]
    pub account_type: String,

    /// Globally unique account identifier (includes curly braces)
    pub uuid: String,

    /// URL-safe account name
    pub username: String,

    /// Link map attached to the account record
    #[serde(default)]
    pub links: HashMap<String, Link>,
}

/// Named collection of repositories under shared access control
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    /// Record type tag, always "workspace"
    #[serde(rename = "type")]
    pub workspace_type: String,

    /// Globally unique workspace identifier
    pub uuid: String,

    /// Human-readable workspace name
    pub name: String,

    /// URL-safe identifier used in API paths and repository URLs
    pub slug: String,

    /// Link map attached to the workspace record
    #[serde(default)]
    pub links: HashMap<String, Link>,
}

/// Project grouping a repository belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Record type tag, always "project"
    #[serde(rename = "type")]
    pub project_type: String,

    /// Short uppercase key used in URLs
    pub key: String,

    /// Globally unique project identifier
    pub uuid: String,

    /// Human-readable project name
    pub name: String,

    /// Link map attached to the project record
    #[serde(default)]
    pub links: HashMap<String, Link>,
}

/// The designated default branch of a repository
///
/// Used by the bulk fetcher when a file pattern names no branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainBranch {
    /// Branch name, e.g. "main" or "master"
    pub name: String,

    /// Reference kind tag, "branch" for ordinary branches
    #[serde(rename = "type")]
    pub branch_type: String,
}

/// Repository-level settings overriding workspace defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideSettings {
    /// Whether the repository overrides the default merge strategy
    pub default_merge_strategy: bool,

    /// Whether the repository overrides the branching model
    pub branching_model: bool,
}

/// A repository record as returned by the Bitbucket Cloud API
///
/// `slug` is unique within a workspace; `uuid` is globally unique and
/// stable across renames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Record type tag, always "repository"
    #[serde(rename = "type")]
    pub repository_type: String,

    /// Workspace-qualified name, e.g. "my-team/my-repo"
    pub full_name: String,

    /// Human-readable display name
    pub name: String,

    /// URL-safe identifier, unique within the workspace
    pub slug: String,

    /// Free-form description, may be empty
    pub description: String,

    /// Source control type, "git" on Bitbucket Cloud
    pub scm: String,

    /// Project homepage if one was configured
    pub website: Option<String>,

    /// Account that owns the repository
    pub owner: Owner,

    /// Workspace the repository lives in
    pub workspace: Workspace,

    /// Whether the repository is private
    pub is_private: bool,

    /// Project the repository is grouped under
    pub project: Project,

    /// Fork policy, e.g. "allow_forks" or "no_public_forks"
    pub fork_policy: String,

    /// Creation instant, parsed from the service's partial-timezone format
    #[serde(with = "partial_timestamp")]
    pub created_on: NaiveDateTime,

    /// Last-update instant, same format as `created_on`
    #[serde(with = "partial_timestamp")]
    pub updated_on: NaiveDateTime,

    /// Repository size in bytes
    pub size: u64,

    /// Primary programming language, may be empty
    pub language: String,

    /// Globally unique repository identifier, stable across renames
    pub uuid: String,

    /// Designated default branch
    pub mainbranch: MainBranch,

    /// Repository-level setting overrides
    pub override_settings: OverrideSettings,

    /// Whether the issue tracker is enabled
    pub has_issues: bool,

    /// Whether the wiki is enabled
    pub has_wiki: bool,

    /// Canonical hyperlinks (self, source browsing root, clone URL)
    pub links: RepositoryLinks,

    /// Full name of the fork parent, absent for non-forks
    #[serde(default)]
    pub parent: Option<String>,
}

/// One page of the service's paginated list envelope
///
/// Listing endpoints wrap their results in `{"values": [...], "next": ...}`
/// where `next` is the absolute URL of the following page, absent on the
/// last one.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Records carried by this page
    pub values: Vec<T>,

    /// Absolute URL of the next page, absent when this page is the last
    #[serde(default)]
    pub next: Option<String>,
}

/// Maps a top-level JSON array into repository records
///
/// The output has the same length and order as the input array. A malformed
/// date or a missing required field fails the entire parse; no partial
/// results are returned.
///
/// # Errors
///
/// Returns [`BitbucketError::MalformedRecord`] with serde's description of
/// the offending field and position.
pub fn parse_repositories(json: &str) -> Result<Vec<Repository>, BitbucketError> {
    serde_json::from_str(json).map_err(|e| BitbucketError::MalformedRecord(e.to_string()))
}

/// Serde helper for Bitbucket's partial-timezone timestamps
///
/// A trailing literal `Z` is stripped before parsing; the remaining string
/// is interpreted as a naive ISO-8601 instant. No UTC offset is applied.
pub(crate) mod partial_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn parse(raw: &str) -> Result<NaiveDateTime, String> {
        let naive = raw.trim_end_matches('Z');
        naive
            .parse::<NaiveDateTime>()
            .map_err(|e| format!("invalid timestamp {:?}: {}", raw, e))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
    }
}
