//! Bitfetch library for Bitbucket workspace automation
//!
//! This library provides helpers for working with the Bitbucket Cloud 2.0
//! REST API from scripts and notebook-style tooling:
//! - List the repositories of a workspace
//! - Fetch repository metadata as typed records
//! - Resolve effective admin/write/read permission grants, expanding group
//!   membership into individual users
//! - Bulk-download specific files from many repositories concurrently
//!
//! ## Authentication
//!
//! Requests authenticate with HTTP Basic using a Bitbucket app password.
//! Credentials are sourced from two environment variables:
//!
//! ```bash
//! export BITBUCKET_USERNAME=your_username
//! export BITBUCKET_APP_PASSWORD=your_app_password
//! ```
//!
//! Both are required; a missing variable fails fast with an error naming
//! it, checked before any network request.
//!
//! ## Usage
//!
//! This library can be used in two ways:
//! - Through the `bitfetch-cli` binary
//! - Directly as a Rust library
//!
//! ```no_run
//! use bitfetch::bitbucket::{self, BitbucketClient, BitbucketConfig};
//!
//! # async fn example() -> Result<(), bitfetch::bitbucket::BitbucketError> {
//! let client = BitbucketClient::new(BitbucketConfig::from_env()?)?;
//! let repos = bitbucket::list_repositories(&client, "my-team").await?;
//! println!("Found {} repositories", repos.len());
//! # Ok(())
//! # }
//! ```
//!
//! See the README.md file for more usage examples.

pub mod bitbucket;
