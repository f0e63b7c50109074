//! Derives the names a chart gives to its Kubernetes resources.
//!
//! Every function in this module is a pure function of a [`NamingContext`]
//! and never fails. Names follow the RFC 1123 length constraint Kubernetes
//! enforces for most object names:
//!
//! * contain at most 63 characters
//! * do not end with a hyphen
//!
//! The constraint is enforced by truncation (see [`truncate_name`]), not by
//! returning errors. Callers which need hard guarantees on the character set
//! should validate the result, for example via
//! [`LabelValue`](crate::kvp::LabelValue).
use tracing::debug;

/// The maximum number of characters of a derived name.
pub const MAX_NAME_LEN: usize = 63;

/// The service account used when the chart neither creates one nor names one.
pub const DEFAULT_SERVICE_ACCOUNT_NAME: &str = "default";

/// The input of every deriver in this module.
///
/// It combines the chart identity (from `Chart.yaml`), the release identity
/// and the user supplied overrides (from `values.yaml`). It has no identity or
/// lifecycle of its own and is recomputed for every render. Use
/// [`NamingContext::from_chart`] to assemble it from parsed Helm inputs.
///
/// Empty override strings are treated exactly like absent ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamingContext {
    pub chart_name: String,
    pub chart_version: String,
    pub release_name: String,
    pub name_override: Option<String>,
    pub fullname_override: Option<String>,
    pub service_account_name: Option<String>,
    pub service_account_create: bool,
    pub app_version: Option<String>,
}

impl NamingContext {
    /// Creates a context without any overrides, which does not request the
    /// creation of a service account.
    pub fn new(
        chart_name: impl Into<String>,
        chart_version: impl Into<String>,
        release_name: impl Into<String>,
    ) -> Self {
        Self {
            chart_name: chart_name.into(),
            chart_version: chart_version.into(),
            release_name: release_name.into(),
            ..Self::default()
        }
    }

    /// Returns the app version, if one is present and non-empty.
    pub fn app_version(&self) -> Option<&str> {
        non_empty(self.app_version.as_ref())
    }

    /// The override-or-chart-name, before any truncation.
    fn base_name(&self) -> &str {
        non_empty(self.name_override.as_ref()).unwrap_or(&self.chart_name)
    }
}

/// Truncates `input` to at most [`MAX_NAME_LEN`] bytes and strips all
/// trailing hyphens from the result.
///
/// Truncation never splits a multi-byte character. Helm's `trimSuffix "-"`
/// only strips a single hyphen, which can leave a name like `foo-` behind when
/// the cut lands on `--`. All trailing hyphens are stripped here, so the
/// result never ends with one.
pub fn truncate_name(input: &str) -> String {
    let mut end = input.len().min(MAX_NAME_LEN);
    while !input.is_char_boundary(end) {
        end -= 1;
    }

    let truncated = input[..end].trim_end_matches('-');

    if truncated.len() != input.len() {
        debug!(
            name = input,
            truncated, "discarded trailing characters of derived name"
        );
    }

    truncated.to_owned()
}

/// Derives the short resource name.
///
/// This is the `name_override` if set, otherwise the chart name.
pub fn name(ctx: &NamingContext) -> String {
    truncate_name(ctx.base_name())
}

/// Derives the fully qualified resource name, which combines the release and
/// the chart identity.
///
/// A `fullname_override` takes precedence over everything else. Otherwise the
/// release name is used on its own if it already contains the short name, or
/// joined with it (`<release>-<name>`) if it does not.
///
/// ```
/// # use chart_helpers::naming::{full_name, NamingContext};
/// let ctx = NamingContext::new("aptos-validator", "0.2.0", "devnet");
/// assert_eq!(full_name(&ctx), "devnet-aptos-validator");
/// ```
pub fn full_name(ctx: &NamingContext) -> String {
    if let Some(fullname_override) = non_empty(ctx.fullname_override.as_ref()) {
        return truncate_name(fullname_override);
    }

    let base = ctx.base_name();
    if ctx.release_name.contains(base) {
        truncate_name(&ctx.release_name)
    } else {
        truncate_name(&format!("{release}-{base}", release = ctx.release_name))
    }
}

/// Derives the `<chart name>-<chart version>` descriptor used in the
/// `helm.sh/chart` label.
///
/// `+` is not allowed in label values, so every occurrence (which is common in
/// semver build metadata) is replaced with `_`.
pub fn chart(ctx: &NamingContext) -> String {
    let chart = format!("{}-{}", ctx.chart_name, ctx.chart_version).replace('+', "_");
    truncate_name(&chart)
}

/// Derives the name of the service account the workloads run as.
///
/// An explicit `service_account_name` always wins. Without one, a chart that
/// creates its own service account names it after [`full_name`], and a chart
/// that does not create one falls back to the namespace's
/// [`DEFAULT_SERVICE_ACCOUNT_NAME`].
pub fn service_account_name(ctx: &NamingContext) -> String {
    match non_empty(ctx.service_account_name.as_ref()) {
        Some(service_account_name) => service_account_name.to_owned(),
        None if ctx.service_account_create => full_name(ctx),
        None => DEFAULT_SERVICE_ACCOUNT_NAME.to_owned(),
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;
    use crate::kvp::label::sets;

    fn validator_ctx(release_name: &str) -> NamingContext {
        NamingContext::new("aptos-validator", "0.2.0", release_name)
    }

    #[rstest]
    #[case("aptos-validator", "aptos-validator")]
    #[case(&"a".repeat(64), &"a".repeat(63))]
    #[case(&format!("{}-b", "a".repeat(62)), &"a".repeat(62))]
    #[case(&format!("{}--b", "a".repeat(61)), &"a".repeat(61))]
    #[case("foo-", "foo")]
    #[case("foo---", "foo")]
    #[case("-", "")]
    #[case("", "")]
    fn truncate(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(truncate_name(input), expected);
    }

    #[test]
    fn truncate_multi_byte() {
        // 62 ASCII bytes followed by a two byte character, which does not fit
        let input = format!("{}ä", "a".repeat(62));
        assert_eq!(truncate_name(&input), "a".repeat(62));
    }

    #[rstest]
    #[case(None, "aptos-validator")]
    #[case(Some("foo"), "foo")]
    #[case(Some(""), "aptos-validator")]
    fn name_resolution(#[case] override_name: Option<&str>, #[case] expected: &str) {
        let ctx = NamingContext {
            name_override: override_name.map(ToOwned::to_owned),
            ..validator_ctx("myrelease")
        };

        assert_eq!(name(&ctx), expected);
    }

    #[rstest]
    #[case("myrelease", None, None, "myrelease-aptos-validator")]
    #[case("aptos-validator-prod", None, None, "aptos-validator-prod")]
    #[case("prod", Some("node"), None, "prod-node")]
    #[case("node-1", Some("node"), None, "node-1")]
    #[case("prod", None, Some("custom"), "custom")]
    #[case("prod", Some("node"), Some("custom"), "custom")]
    #[case("prod", None, Some(""), "prod-aptos-validator")]
    fn full_name_resolution(
        #[case] release_name: &str,
        #[case] name_override: Option<&str>,
        #[case] fullname_override: Option<&str>,
        #[case] expected: &str,
    ) {
        let ctx = NamingContext {
            name_override: name_override.map(ToOwned::to_owned),
            fullname_override: fullname_override.map(ToOwned::to_owned),
            ..validator_ctx(release_name)
        };

        assert_eq!(full_name(&ctx), expected);
    }

    #[test]
    fn full_name_truncated() {
        let release_name = "r".repeat(60);
        let ctx = validator_ctx(&release_name);

        // "rrr...r-aptos-validator" cut at 63 bytes ends with "-ap"
        assert_eq!(full_name(&ctx), format!("{release_name}-ap"));
    }

    #[test]
    fn full_name_trims_hyphen_at_cut() {
        let release_name = "r".repeat(63);
        let ctx = validator_ctx(&release_name);

        assert_eq!(full_name(&ctx), release_name);
    }

    #[rstest]
    #[case("aptos-validator", "1.2+3", "aptos-validator-1.2_3")]
    #[case("aptos-validator", "0.2.0", "aptos-validator-0.2.0")]
    #[case("chart", "1.0.0+build+1", "chart-1.0.0_build_1")]
    fn chart_label(#[case] chart_name: &str, #[case] chart_version: &str, #[case] expected: &str) {
        let ctx = NamingContext::new(chart_name, chart_version, "release");
        assert_eq!(chart(&ctx), expected);
    }

    #[rstest]
    #[case(true, None, "myrelease-aptos-validator")]
    #[case(true, Some("validator-sa"), "validator-sa")]
    #[case(false, None, "default")]
    #[case(false, Some("validator-sa"), "validator-sa")]
    #[case(true, Some(""), "myrelease-aptos-validator")]
    #[case(false, Some(""), "default")]
    fn service_account_resolution(
        #[case] create: bool,
        #[case] explicit_name: Option<&str>,
        #[case] expected: &str,
    ) {
        let ctx = NamingContext {
            service_account_create: create,
            service_account_name: explicit_name.map(ToOwned::to_owned),
            ..validator_ctx("myrelease")
        };

        assert_eq!(service_account_name(&ctx), expected);
    }

    #[rstest]
    #[case(&"f".repeat(64), &"f".repeat(63))]
    #[case(&format!("{}-x", "f".repeat(62)), &"f".repeat(62))]
    #[case(&format!("{}----", "f".repeat(60)), &"f".repeat(60))]
    fn full_name_override_truncated(#[case] override_name: &str, #[case] expected: &str) {
        let ctx = NamingContext {
            fullname_override: Some(override_name.to_owned()),
            service_account_create: true,
            ..validator_ctx("myrelease")
        };

        assert_eq!(full_name(&ctx), expected);
        assert_eq!(service_account_name(&ctx), expected);
    }

    #[test]
    fn derived_names_stay_within_limits() {
        let fillers = ["", "-", "a", "ab-", "x--y", "long-name-with-many-parts"];

        for repeat in [0, 1, 10, 31, 32, 63, 64, 100] {
            for filler in fillers {
                let input = filler.repeat(repeat);
                let plain = NamingContext {
                    chart_name: input.clone(),
                    chart_version: input.clone(),
                    release_name: format!("{input}-release"),
                    name_override: Some(input.clone()),
                    service_account_create: true,
                    ..NamingContext::default()
                };
                let overridden = NamingContext {
                    fullname_override: Some(format!("{input}-fullname-{input}")),
                    ..plain.clone()
                };

                for ctx in [plain, overridden] {
                    for derived in [
                        name(&ctx),
                        full_name(&ctx),
                        chart(&ctx),
                        service_account_name(&ctx),
                    ] {
                        assert!(derived.len() <= MAX_NAME_LEN, "{derived:?} is too long");
                        assert!(!derived.ends_with('-'), "{derived:?} ends with a hyphen");
                    }
                }
            }
        }
    }

    #[test]
    fn derivers_are_idempotent() {
        let ctx = NamingContext {
            name_override: Some("node".to_owned()),
            service_account_create: true,
            app_version: Some("1.0".to_owned()),
            ..validator_ctx("testnet")
        };

        assert_eq!(name(&ctx), name(&ctx));
        assert_eq!(full_name(&ctx), full_name(&ctx));
        assert_eq!(chart(&ctx), chart(&ctx));
        assert_eq!(service_account_name(&ctx), service_account_name(&ctx));
        assert_eq!(sets::common(&ctx), sets::common(&ctx));
        assert_eq!(sets::selector(&ctx), sets::selector(&ctx));

        // Truncation is a fixed point, so deriving from a derived name is a no-op
        let renamed = NamingContext {
            name_override: Some(name(&ctx)),
            fullname_override: Some(full_name(&ctx)),
            ..ctx.clone()
        };
        assert_eq!(name(&renamed), name(&ctx));
        assert_eq!(full_name(&renamed), full_name(&ctx));
        assert_eq!(sets::common(&renamed), sets::common(&ctx));
    }
}
