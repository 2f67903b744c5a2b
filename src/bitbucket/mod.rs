//! Bitbucket workspace helpers
//!
//! This module provides typed helpers for:
//! - Listing the repositories of a workspace
//! - Fetching single-repository metadata
//! - Resolving effective admin/write/read permission grants
//! - Bulk-downloading specific files from many repositories in parallel
//!
//! ## Authentication
//!
//! All requests use HTTP Basic authentication with a Bitbucket app
//! password. Credentials are read from the environment once, when a
//! [`BitbucketConfig`] is built, and carried explicitly from there:
//!
//! ```bash
//! export BITBUCKET_USERNAME=your_username
//! export BITBUCKET_APP_PASSWORD=your_app_password
//! ```
//!
//! ```no_run
//! use bitfetch::bitbucket::{BitbucketClient, BitbucketConfig};
//!
//! # fn example() -> Result<(), bitfetch::bitbucket::BitbucketError> {
//! let client = BitbucketClient::new(BitbucketConfig::from_env()?)?;
//! # Ok(())
//! # }
//! ```
//!
//! Missing credentials fail fast with an error naming the variable, before
//! any request is issued.

pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod permissions;
pub mod report;
pub mod repositories;

pub use client::BitbucketClient;
pub use config::{BitbucketConfig, check_required_env_vars};
pub use error::BitbucketError;
pub use fetcher::{download_all_repo_files, download_file, download_repo_files, file_urls};
pub use models::{MainBranch, Owner, Project, Repository, Workspace, parse_repositories};
pub use permissions::{
    Account, GroupRef, Permission, PermissionLevel, group_members, resolve_repo_permissions,
};
pub use report::permissions_report;
pub use repositories::{list_repositories, repository_info};
