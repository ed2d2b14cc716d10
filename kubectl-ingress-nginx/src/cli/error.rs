use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{source}"))]
    Configuration { source: crate::config::Error },

    #[snafu(display("{source}"))]
    Request { source: crate::request::Error },

    #[snafu(display("{source}"))]
    PodExec { source: crate::pod_exec::Error },

    #[snafu(display("{source}"))]
    Browser { source: crate::ui::browser::Error },

    #[snafu(display("you did not choose any of urls"))]
    NoUrlChosen,

    #[snafu(display("Failed to write to stdout, error: {source}"))]
    WriteStdout { source: std::io::Error },

    #[snafu(display("Failed to write to stderr, error: {source}"))]
    WriteStderr { source: std::io::Error },

    #[snafu(display("Failed to load kubeconfig from {}, error: {source}", path.display()))]
    LoadKubeconfig { path: PathBuf, source: kube::config::KubeconfigError },

    #[snafu(display("Failed to load kubeconfig context, error: {source}"))]
    KubeconfigContext { source: kube::config::KubeconfigError },

    #[snafu(display("Failed to infer Kubernetes client configuration, error: {source}"))]
    InferKubeConfig { source: kube::config::InferConfigError },

    #[snafu(display("Failed to initialize Kubernetes client configuration, error: {source}"))]
    KubeConfig { source: kube::Error },

    #[snafu(display("Failed to create tokio runtime, error: {source}"))]
    InitializeTokioRuntime { source: std::io::Error },
}

impl From<crate::config::Error> for Error {
    fn from(source: crate::config::Error) -> Self { Self::Configuration { source } }
}

impl From<crate::request::Error> for Error {
    fn from(source: crate::request::Error) -> Self { Self::Request { source } }
}

impl From<crate::pod_exec::Error> for Error {
    fn from(source: crate::pod_exec::Error) -> Self { Self::PodExec { source } }
}

impl From<crate::ui::browser::Error> for Error {
    fn from(source: crate::ui::browser::Error) -> Self { Self::Browser { source } }
}
