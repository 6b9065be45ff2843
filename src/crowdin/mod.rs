//! Read-only access to a Crowdin project's details and file tree.

pub mod api_types;
pub mod cached_client;
pub mod client;
pub mod error;
pub mod model;
pub mod timestamp;
pub mod tree;
pub mod types;

pub use cached_client::CachedCrowdinClient;
pub use client::{CrowdinApi, HttpProjectSource, ProjectSource};
pub use error::{Error, ModelError};
pub use model::{FieldKind, FieldDef, FieldValue, Model, RawMap, Record};
pub use types::{Directory, File, FileIndex, Node, Project};
