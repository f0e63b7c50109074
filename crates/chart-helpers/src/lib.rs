//! Helpers to derive Kubernetes resource names and labels the way Helm charts
//! do in their `_helpers.tpl`, plus a small model of the release changelog.
//!
//! ## Modules
//!
//! - [`naming`] derives names from a [`naming::NamingContext`].
//! - [`kvp`] contains the chart label keys, validated label values and the label
//!   sets.
//! - [`helm`] loads a naming context from `Chart.yaml` and `values.yaml`.
//! - [`meta`] builds object metadata for generated manifests.
//! - [`changelog`] parses the `## [version] - date` changelog convention.

pub mod changelog;
pub mod helm;
pub mod kvp;
pub mod logging;
pub mod meta;
pub mod naming;
pub mod yaml;

// External re-exports
pub use k8s_openapi;
