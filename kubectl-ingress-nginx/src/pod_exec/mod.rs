//! Running one command in a pod container and collecting what it prints.

mod error;

use k8s_openapi::{api::core::v1::Pod, apimachinery::pkg::apis::meta::v1::Status};
use kube::{Api, api::AttachParams};
use snafu::{OptionExt, ResultExt};
use tokio::io::{AsyncRead, AsyncReadExt};

pub use self::error::Error;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Clone, Debug)]
pub struct PodExec {
    api: Api<Pod>,
    pod_name: String,
    namespace: String,
    container: Option<String>,
    command: Vec<String>,
}

impl PodExec {
    pub fn new<I, S>(
        api: Api<Pod>,
        pod_name: impl Into<String>,
        namespace: impl Into<String>,
        command: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            api,
            pod_name: pod_name.into(),
            namespace: namespace.into(),
            container: None,
            command: command.into_iter().map(Into::into).collect(),
        }
    }

    /// Runs in `container` instead of the pod's default container. An empty
    /// name keeps the default.
    #[must_use]
    pub fn with_container(self, container: &str) -> Self {
        let container = Some(container.to_string()).filter(|c| !c.is_empty());
        Self { container, ..self }
    }

    /// Runs the command to completion without a terminal.
    ///
    /// # Errors
    ///
    /// Fails when the exec call cannot be set up, a stream cannot be read, or
    /// the API server reports the command as failed.
    pub async fn output(self) -> Result<ExecOutput, Error> {
        let Self { api, pod_name, namespace, container, command } = self;
        tracing::debug!("Executing {command:?} in pod {pod_name} in namespace {namespace}");

        let mut attached = api
            .exec(
                &pod_name,
                command,
                &AttachParams {
                    container,
                    stdin: false,
                    stdout: true,
                    stderr: true,
                    tty: false,
                    ..AttachParams::default()
                },
            )
            .await
            .with_context(|_| error::ExecPodSnafu {
                namespace: namespace.clone(),
                pod_name: pod_name.clone(),
            })?;

        let pod_stdout =
            attached.stdout().context(error::GetPodStreamSnafu { stream: "stdout" })?;
        let pod_stderr =
            attached.stderr().context(error::GetPodStreamSnafu { stream: "stderr" })?;
        let status = attached.take_status();

        let (stdout, stderr) = tokio::try_join!(
            read_stream(pod_stdout, &pod_name, "stdout"),
            read_stream(pod_stderr, &pod_name, "stderr"),
        )?;

        let status = match status {
            Some(status) => status.await,
            None => None,
        };
        if let Err(err) = attached.join().await {
            tracing::debug!(
                "Exec session in pod {pod_name} did not shut down cleanly, error: {err}"
            );
        }

        check_status(&pod_name, status.as_ref(), &stderr)?;
        Ok(ExecOutput { stdout, stderr })
    }
}

async fn read_stream<R>(mut stream: R, pod_name: &str, name: &'static str) -> Result<String, Error>
where
    R: AsyncRead + Unpin,
{
    let mut buf = String::new();
    let _size = stream
        .read_to_string(&mut buf)
        .await
        .with_context(|_| error::ReadPodStreamSnafu { pod_name, stream: name })?;
    Ok(buf)
}

/// Turns the final exec status into an error when the command did not
/// succeed. A missing status is treated as success.
fn check_status(pod_name: &str, status: Option<&Status>, stderr: &str) -> Result<(), Error> {
    let Some(status) = status else {
        return Ok(());
    };
    if status.status.as_deref() != Some("Failure") {
        return Ok(());
    }

    let mut message = status.message.clone().unwrap_or_default();
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        message = format!("{message}: {stderr}");
    }
    error::CommandFailedSnafu { pod_name, message }.fail()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        let status = Status { status: Some("Success".to_string()), ..Status::default() };
        assert!(check_status("web-7f8", Some(&status), "").is_ok());
        assert!(check_status("web-7f8", None, "ignored").is_ok());
    }

    #[test]
    fn test_failure_status_carries_stderr() {
        let status = Status {
            status: Some("Failure".to_string()),
            message: Some("command terminated with non-zero exit code".to_string()),
            ..Status::default()
        };
        let err = check_status("web-7f8", Some(&status), "no such host\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Command failed in pod web-7f8: command terminated with non-zero exit code: no such \
             host"
        );
    }
}
