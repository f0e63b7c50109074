use std::{fmt::Display, str::FromStr};

use snafu::Snafu;
use strum::{EnumIter, IntoEnumIterator};

use crate::kvp::consts::{
    HELM_CHART_KEY, K8S_APP_MANAGED_BY_KEY, K8S_APP_PART_OF_KEY, K8S_APP_VERSION_KEY,
};

#[derive(Debug, PartialEq, Eq, Snafu)]
#[snafu(display("unknown label key {key:?}, chart resources only carry the well-known keys"))]
pub struct UnknownLabelKeyError {
    pub key: String,
}

/// The keys of the labels set on chart resources.
///
/// Chart resources only ever carry this fixed set of keys, which is why keys
/// are an enum instead of free-form validated strings.
///
/// ```
/// # use chart_helpers::kvp::LabelKey;
/// let key: LabelKey = "helm.sh/chart".parse().unwrap();
/// assert_eq!(key, LabelKey::Chart);
/// assert_eq!(LabelKey::PartOf.to_string(), "app.kubernetes.io/part-of");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum LabelKey {
    /// `helm.sh/chart`
    Chart,

    /// `app.kubernetes.io/part-of`
    PartOf,

    /// `app.kubernetes.io/managed-by`
    ManagedBy,

    /// `app.kubernetes.io/version`
    Version,
}

impl LabelKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chart => HELM_CHART_KEY,
            Self::PartOf => K8S_APP_PART_OF_KEY,
            Self::ManagedBy => K8S_APP_MANAGED_BY_KEY,
            Self::Version => K8S_APP_VERSION_KEY,
        }
    }
}

impl FromStr for LabelKey {
    type Err = UnknownLabelKeyError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|key| key.as_str() == input)
            .ok_or_else(|| UnknownLabelKeySnafu { key: input }.build())
    }
}

impl Display for LabelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;

    #[test]
    fn every_key_parses_from_its_string() {
        for key in LabelKey::iter() {
            assert_eq!(LabelKey::from_str(key.as_str()), Ok(key));
        }
    }

    #[rstest]
    #[case("app.kubernetes.io/name")]
    #[case("helm.sh/Chart")]
    #[case("chart")]
    #[case("")]
    fn unknown_key(#[case] input: &str) {
        assert_eq!(
            LabelKey::from_str(input),
            Err(UnknownLabelKeyError {
                key: input.to_owned()
            })
        );
    }
}
