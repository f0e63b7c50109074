//! Object metadata for manifests rendered from a [`NamingContext`].
use std::collections::BTreeMap;

use k8s_openapi::{
    api::core::v1::ServiceAccount,
    apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta},
};

use crate::{
    kvp::label::sets,
    naming::{self, NamingContext},
};

/// A builder to build [`ObjectMeta`] objects.
///
/// It is recommended to always call [`Self::with_chart_labels()`], so every
/// resource carries the common chart labels.
#[derive(Clone, Debug, Default)]
pub struct ObjectMetaBuilder {
    name: Option<String>,
    namespace: Option<String>,
    labels: Option<BTreeMap<String, String>>,
    annotations: Option<BTreeMap<String, String>>,
}

impl ObjectMetaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn namespace_opt(&mut self, namespace: impl Into<Option<String>>) -> &mut Self {
        self.namespace = namespace.into();
        self
    }

    /// This adds multiple annotations to the existing annotations.
    /// Existing annotations with the same key are overwritten.
    pub fn with_annotations(&mut self, annotations: BTreeMap<String, String>) -> &mut Self {
        self.annotations
            .get_or_insert_with(BTreeMap::new)
            .extend(annotations);
        self
    }

    /// This adds multiple labels to the existing labels.
    /// Existing labels with the same key are overwritten.
    pub fn with_labels(&mut self, labels: BTreeMap<String, String>) -> &mut Self {
        self.labels.get_or_insert_with(BTreeMap::new).extend(labels);
        self
    }

    /// Adds the common chart labels of `ctx`, see [`sets::common`].
    pub fn with_chart_labels(&mut self, ctx: &NamingContext) -> &mut Self {
        self.with_labels(sets::common(ctx))
    }

    pub fn build(&self) -> ObjectMeta {
        ObjectMeta {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            labels: self.labels.clone(),
            annotations: self.annotations.clone(),
            ..ObjectMeta::default()
        }
    }
}

/// Returns the metadata of the chart's primary resources: named after
/// [`naming::full_name`] and labelled with the common chart labels.
pub fn object_meta(ctx: &NamingContext, namespace: Option<&str>) -> ObjectMeta {
    ObjectMetaBuilder::new()
        .name(naming::full_name(ctx))
        .namespace_opt(namespace.map(ToOwned::to_owned))
        .with_chart_labels(ctx)
        .build()
}

/// Returns the selector matching the chart's resources, see
/// [`sets::selector`].
pub fn label_selector(ctx: &NamingContext) -> LabelSelector {
    LabelSelector {
        match_labels: Some(sets::selector(ctx)),
        match_expressions: None,
    }
}

/// Returns the service account the chart creates, or [`None`] if the context
/// does not request its creation. The account is named after
/// [`naming::service_account_name`].
pub fn service_account(
    ctx: &NamingContext,
    namespace: Option<&str>,
    annotations: BTreeMap<String, String>,
) -> Option<ServiceAccount> {
    if !ctx.service_account_create {
        return None;
    }

    let mut metadata = ObjectMetaBuilder::new();
    metadata
        .name(naming::service_account_name(ctx))
        .namespace_opt(namespace.map(ToOwned::to_owned))
        .with_chart_labels(ctx);

    if !annotations.is_empty() {
        metadata.with_annotations(annotations);
    }

    Some(ServiceAccount {
        metadata: metadata.build(),
        ..ServiceAccount::default()
    })
}
