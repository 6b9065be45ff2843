//! Cached, read-only client for Crowdin project info.
//!
//! [`crowdin::CachedCrowdinClient`] fetches project info once per session and
//! exposes the decoded project details and a flat index of the file tree.

pub mod cache;
pub mod config;
pub mod crowdin;
