use const_format::concatcp;

/// The well-known Kubernetes app key prefix.
const K8S_APP_KEY_PREFIX: &str = "app.kubernetes.io/";

/// The Helm-specific key prefix.
const HELM_KEY_PREFIX: &str = "helm.sh/";

/// The well-known Helm chart key `helm.sh/chart`. It is used to identify the
/// chart name and version a resource was rendered from, e.g.
/// `aptos-validator-0.2.0`.
pub const HELM_CHART_KEY: &str = concatcp!(HELM_KEY_PREFIX, "chart");

/// The well-known Kubernetes app part-of key `app.kubernetes.io/part-of`. It is
/// used to specify the name of a higher level application this one is part of,
/// e.g. `aptos-validator`.
pub const K8S_APP_PART_OF_KEY: &str = concatcp!(K8S_APP_KEY_PREFIX, "part-of");

/// The well-known Kubernetes app managed-by key `app.kubernetes.io/managed-by`.
/// It is used to indicate what tool is being used to manage the operation of
/// an application.
pub const K8S_APP_MANAGED_BY_KEY: &str = concatcp!(K8S_APP_KEY_PREFIX, "managed-by");

/// The well-known Kubernetes app version key `app.kubernetes.io/version`. The
/// value can represent a semantic version or a revision, e.g. `1.0`.
pub const K8S_APP_VERSION_KEY: &str = concatcp!(K8S_APP_KEY_PREFIX, "version");

/// The value of the managed-by label. Helm always renders `.Release.Service`
/// as `Helm`.
pub const HELM_MANAGED_BY_VALUE: &str = "Helm";
