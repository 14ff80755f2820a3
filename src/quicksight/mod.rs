//! Amazon QuickSight
//!
//! # Module Structure
//!
//! - [`api`] - The [`GroupApi`](api::GroupApi) trait and request/response shapes
//! - [`sdk`] - `GroupApi` over the QuickSight SDK client
//! - [`group`] - The `aws_quicksight_group` resource

pub mod api;
pub mod group;
mod sdk;

#[cfg(test)]
pub(crate) mod fake;
