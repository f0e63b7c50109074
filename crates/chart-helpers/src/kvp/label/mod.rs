//! This module provides types and functions to construct Kubernetes labels
//! for chart resources. The keys are the chart's fixed [`LabelKey`] set, the
//! values are derived names in the Kubernetes label value format.
//!
//! See <https://kubernetes.io/docs/concepts/overview/working-with-objects/labels/>
//! for more information on Kubernetes labels.
use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use snafu::{ResultExt, Snafu};

use crate::kvp::{LabelKey, UnknownLabelKeyError};

mod value;

pub use value::*;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum LabelError {
    #[snafu(display("invalid value {value:?} for label {key}"))]
    InvalidValue {
        source: LabelValueError,
        key: LabelKey,
        value: String,
    },

    #[snafu(display("failed to parse label key"))]
    ParseKey { source: UnknownLabelKeyError },
}

/// A single validated label.
///
/// ```
/// # use chart_helpers::kvp::{Label, LabelKey};
/// let label = Label::new(LabelKey::PartOf, "aptos-validator").unwrap();
/// assert_eq!(label.to_string(), "app.kubernetes.io/part-of=aptos-validator");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub key: LabelKey,
    pub value: LabelValue,
}

impl Label {
    pub fn new(key: LabelKey, value: &str) -> Result<Self, LabelError> {
        let value = LabelValue::from_str(value).context(InvalidValueSnafu { key, value })?;
        Ok(Self { key, value })
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// A validated set of labels. Inserting a label with a key which is already
/// present replaces its value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Labels(BTreeMap<LabelKey, LabelValue>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a plain label map, like the one returned by [`sets::common`].
    pub fn try_from_unvalidated(labels: &BTreeMap<String, String>) -> Result<Self, LabelError> {
        labels
            .iter()
            .map(|(key, value)| {
                let key = LabelKey::from_str(key).context(ParseKeySnafu)?;
                Label::new(key, value)
            })
            .collect()
    }

    /// Returns the previous value of the label's key, if any.
    pub fn insert(&mut self, label: Label) -> Option<LabelValue> {
        self.0.insert(label.key, label.value)
    }

    pub fn get(&self, key: LabelKey) -> Option<&LabelValue> {
        self.0.get(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the labels into a map ready for use in `ObjectMeta::labels`.
    pub fn to_unvalidated(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }
}

impl Extend<Label> for Labels {
    fn extend<T: IntoIterator<Item = Label>>(&mut self, iter: T) {
        for label in iter {
            self.insert(label);
        }
    }
}

impl FromIterator<Label> for Labels {
    fn from_iter<T: IntoIterator<Item = Label>>(iter: T) -> Self {
        let mut labels = Self::new();
        labels.extend(iter);
        labels
    }
}

/// Well-known labels set on chart resources.
pub mod well_known {
    use crate::kvp::{LabelKey, consts::HELM_MANAGED_BY_VALUE};

    use super::{Label, LabelError};

    /// Creates the `helm.sh/chart` label with `chart` as the value, see
    /// [`naming::chart`](crate::naming::chart).
    pub fn chart(chart: &str) -> Result<Label, LabelError> {
        Label::new(LabelKey::Chart, chart)
    }

    /// Creates the `app.kubernetes.io/part-of` label with `name` as the value.
    pub fn part_of(name: &str) -> Result<Label, LabelError> {
        Label::new(LabelKey::PartOf, name)
    }

    /// Creates the `app.kubernetes.io/version` label with `version` as the
    /// value.
    pub fn version(version: &str) -> Result<Label, LabelError> {
        Label::new(LabelKey::Version, version)
    }

    /// Creates the `app.kubernetes.io/managed-by` label. Its value is always
    /// `Helm`, so this can't fail.
    pub fn managed_by_helm() -> Label {
        Label::new(LabelKey::ManagedBy, HELM_MANAGED_BY_VALUE)
            .expect("failed to parse hard-coded managed-by label")
    }
}

/// Common sets of labels derived from a [`NamingContext`].
///
/// The plain builders ([`common`](sets::common) and
/// [`selector`](sets::selector)) never fail and return maps which can be put
/// into `ObjectMeta::labels` right away. Use
/// [`validated_common`](sets::validated_common) when the chart inputs are
/// not trusted to produce valid label values.
///
/// [`NamingContext`]: crate::naming::NamingContext
pub mod sets {
    use std::collections::BTreeMap;

    use crate::{
        kvp::{LabelKey, consts::HELM_MANAGED_BY_VALUE},
        naming::{self, NamingContext},
    };

    use super::{LabelError, Labels, well_known};

    /// Returns the labels every chart resource carries:
    ///
    /// - `helm.sh/chart`, see [`naming::chart`]
    /// - `app.kubernetes.io/part-of`, see [`naming::name`]
    /// - `app.kubernetes.io/managed-by`, always `Helm`
    /// - `app.kubernetes.io/version`, only if the context has an app version
    pub fn common(ctx: &NamingContext) -> BTreeMap<String, String> {
        let mut labels = selector(ctx);

        labels.insert(LabelKey::Chart.to_string(), naming::chart(ctx));
        labels.insert(
            LabelKey::ManagedBy.to_string(),
            HELM_MANAGED_BY_VALUE.to_owned(),
        );

        if let Some(app_version) = ctx.app_version() {
            labels.insert(LabelKey::Version.to_string(), app_version.to_owned());
        }

        labels
    }

    /// Returns the labels used to select the chart's resources. These don't
    /// change between chart or app versions and are therefore safe to use in
    /// immutable selectors.
    pub fn selector(ctx: &NamingContext) -> BTreeMap<String, String> {
        BTreeMap::from([(LabelKey::PartOf.to_string(), naming::name(ctx))])
    }

    /// Returns the same set as [`common`], but validates every value against
    /// the Kubernetes label value format.
    pub fn validated_common(ctx: &NamingContext) -> Result<Labels, LabelError> {
        let mut labels = Labels::new();

        labels.extend([
            well_known::chart(&naming::chart(ctx))?,
            well_known::part_of(&naming::name(ctx))?,
            well_known::managed_by_helm(),
        ]);

        if let Some(app_version) = ctx.app_version() {
            labels.insert(well_known::version(app_version)?);
        }

        Ok(labels)
    }
}
