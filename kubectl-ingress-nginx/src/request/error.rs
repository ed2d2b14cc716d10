use snafu::Snafu;

/// A failed call to the cluster API.
///
/// `NotFound` is kept apart from every other failure because it doubles as a
/// feature probe: an API group/version that the cluster does not serve answers
/// with 404.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApiError {
    #[snafu(display("The server could not find the requested resource {resource} in {scope}"))]
    NotFound { resource: &'static str, scope: String },

    #[snafu(display("Failed to list {resource} in {scope}, error: {source}"))]
    List {
        resource: &'static str,
        scope: String,
        #[snafu(source(from(kube::Error, Box::new)))]
        source: Box<kube::Error>,
    },

    #[snafu(display("Failed to decode {resource} in {scope}, error: {source}"))]
    Decode { resource: &'static str, scope: String, source: serde_json::Error },
}

impl ApiError {
    /// Classifies a client error, splitting HTTP 404 off from everything else.
    pub(crate) fn from_kube(resource: &'static str, namespace: &str, source: kube::Error) -> Self {
        let scope = scope(namespace);
        match source {
            kube::Error::Api(ref response) if response.code == 404 => {
                Self::NotFound { resource, scope }
            }
            source => Self::List { resource, scope, source: Box::new(source) },
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool { matches!(self, Self::NotFound { .. }) }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("{source}"))]
    Api { source: ApiError },

    #[snafu(display("pod {pod_name} not found in namespace {namespace}"))]
    PodNotFound { pod_name: String, namespace: String },

    #[snafu(display("no pods for label selector {selector} found in namespace {namespace}"))]
    NoPodsForLabelSelector { selector: String, namespace: String },

    #[snafu(display("no pods for deployment {deployment} found in namespace {namespace}"))]
    NoPodsForDeployment { deployment: String, namespace: String },

    #[snafu(display("could not find service {service_name} in namespace {namespace}"))]
    ServiceNotFound { service_name: String, namespace: String },
}

impl From<ApiError> for Error {
    fn from(source: ApiError) -> Self { Self::Api { source } }
}

/// Human readable form of a namespace argument, where `""` means every
/// namespace.
pub(crate) fn scope(namespace: &str) -> String {
    if namespace.is_empty() {
        "all namespaces".to_string()
    } else {
        format!("namespace {namespace}")
    }
}
