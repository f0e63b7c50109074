//! Typed views of the Helm inputs which feed the naming helpers.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

use crate::naming::NamingContext;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to parse chart metadata (Chart.yaml)"))]
    ParseChartMetadata { source: serde_yaml::Error },

    #[snafu(display("failed to parse chart values (values.yaml)"))]
    ParseChartValues { source: serde_yaml::Error },
}

/// The subset of a `Chart.yaml` file the naming helpers need.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    pub name: String,
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
}

/// A dynamic representation of a chart's `values.yaml` file.
///
/// This works with any chart values file, as it only contains the naming
/// related fields the chart helpers read. Unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartValues {
    pub name_override: Option<String>,

    // Helm spells this one with a lowercase "n"
    #[serde(rename = "fullnameOverride")]
    pub fullname_override: Option<String>,

    pub service_account: ServiceAccountValues,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceAccountValues {
    /// Specifies whether the chart creates its own service account.
    pub create: bool,

    /// Annotations to add to the created service account.
    pub annotations: BTreeMap<String, String>,

    /// The name of the service account to use. If not set and `create` is
    /// true, a name is derived from the full name.
    pub name: Option<String>,
}

impl Default for ServiceAccountValues {
    fn default() -> Self {
        Self {
            create: true,
            annotations: BTreeMap::new(),
            name: None,
        }
    }
}

impl NamingContext {
    /// Assembles the naming context of `release_name` from the parsed chart
    /// metadata and values.
    pub fn from_chart(
        release_name: impl Into<String>,
        chart: &ChartMetadata,
        values: &ChartValues,
    ) -> Self {
        Self {
            chart_name: chart.name.clone(),
            chart_version: chart.version.clone(),
            release_name: release_name.into(),
            name_override: values.name_override.clone(),
            fullname_override: values.fullname_override.clone(),
            service_account_name: values.service_account.name.clone(),
            service_account_create: values.service_account.create,
            app_version: chart.app_version.clone(),
        }
    }
}

/// Parses the contents of `Chart.yaml` and `values.yaml` and assembles the
/// naming context of `release_name`.
pub fn load_context(
    release_name: impl Into<String>,
    chart_yaml: &str,
    values_yaml: &str,
) -> Result<NamingContext> {
    let chart: ChartMetadata = serde_yaml::from_str(chart_yaml).context(ParseChartMetadataSnafu)?;
    let values = parse_values(values_yaml)?;

    Ok(NamingContext::from_chart(release_name, &chart, &values))
}

/// Parses the contents of a `values.yaml` file.
///
/// An empty file (or one consisting only of comments) yields the default
/// values, as it does for Helm.
pub fn parse_values(values_yaml: &str) -> Result<ChartValues> {
    let values: Option<ChartValues> =
        serde_yaml::from_str(values_yaml).context(ParseChartValuesSnafu)?;
    Ok(values.unwrap_or_default())
}

#[cfg(test)]
mod test {
    use indoc::indoc;

    use super::*;
    use crate::naming;

    const CHART_YAML: &str = indoc! {"
        apiVersion: v2
        name: aptos-validator
        description: Aptos blockchain validator deployment
        version: 1.2+3
        appVersion: '1.0'
    "};

    #[test]
    fn parse_chart_metadata() {
        let chart: ChartMetadata = serde_yaml::from_str(CHART_YAML).unwrap();

        assert_eq!(
            chart,
            ChartMetadata {
                name: "aptos-validator".to_owned(),
                version: "1.2+3".to_owned(),
                app_version: Some("1.0".to_owned()),
            }
        );
    }

    #[test]
    fn parse_full_values() {
        let values = parse_values(indoc! {"
            nameOverride: node
            fullnameOverride: ''
            imageTag: devnet
            serviceAccount:
              create: false
              name: validator
              annotations:
                eks.amazonaws.com/role-arn: arn:aws:iam::123456789012:role/validator
        "})
        .unwrap();

        assert_eq!(values.name_override.as_deref(), Some("node"));
        assert_eq!(values.fullname_override.as_deref(), Some(""));
        assert!(!values.service_account.create);
        assert_eq!(values.service_account.name.as_deref(), Some("validator"));
        assert_eq!(values.service_account.annotations.len(), 1);
    }

    #[test]
    fn parse_empty_values() {
        assert_eq!(parse_values("").unwrap(), ChartValues::default());
        assert_eq!(
            parse_values("# only comments\n").unwrap(),
            ChartValues::default()
        );
        assert!(ChartValues::default().service_account.create);
    }

    #[test]
    fn load() {
        let ctx = load_context("myrelease", CHART_YAML, "serviceAccount: {}\n").unwrap();

        assert_eq!(naming::full_name(&ctx), "myrelease-aptos-validator");
        assert_eq!(naming::chart(&ctx), "aptos-validator-1.2_3");
        assert_eq!(
            naming::service_account_name(&ctx),
            "myrelease-aptos-validator"
        );
        assert_eq!(ctx.app_version(), Some("1.0"));
    }

    #[test]
    fn load_invalid_chart() {
        let err = load_context("myrelease", "name: [unclosed", "").unwrap_err();
        assert!(matches!(err, Error::ParseChartMetadata { .. }));

        let err = load_context("myrelease", "description: no name\n", "").unwrap_err();
        assert!(matches!(err, Error::ParseChartMetadata { .. }));
    }

    #[test]
    fn load_invalid_values() {
        let err = load_context("myrelease", CHART_YAML, "serviceAccount: [1, 2]\n").unwrap_err();
        assert!(matches!(err, Error::ParseChartValues { .. }));
    }
}
