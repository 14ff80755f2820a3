//! qsgroup
//!
//! Declarative management of Amazon QuickSight groups. The
//! `aws_quicksight_group` resource is driven through create, read, update,
//! delete and import by a [`provider::Provider`], talking to QuickSight
//! through the [`quicksight::api::GroupApi`] trait.

pub mod aws;
pub mod config;
pub mod error;
pub mod provider;
pub mod quicksight;
pub mod resource;
pub mod state;

/// Version injected at compile time via QSGROUP_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("QSGROUP_VERSION") {
    Some(v) => v,
    None => "dev",
};
