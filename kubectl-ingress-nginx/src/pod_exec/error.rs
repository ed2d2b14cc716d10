use std::borrow::Cow;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display(
        "Failed to execute command in pod {pod_name} in namespace {namespace}, error: {source}"
    ))]
    ExecPod {
        namespace: String,
        pod_name: String,
        #[snafu(source(from(kube::Error, Box::new)))]
        source: Box<kube::Error>,
    },

    #[snafu(display("{stream} requested but missing"))]
    GetPodStream { stream: Cow<'static, str> },

    #[snafu(display("Failed to read {stream} of pod {pod_name}, error: {source}"))]
    ReadPodStream { pod_name: String, stream: Cow<'static, str>, source: std::io::Error },

    #[snafu(display("Command failed in pod {pod_name}: {message}"))]
    CommandFailed { pod_name: String, message: String },
}
