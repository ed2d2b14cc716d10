use clap::Args;
use snafu::ResultExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{
    cli::{
        error::{self, Error},
        internal::{self, PodTargetArgs},
    },
    config::Config,
    pod_exec::ExecOutput,
    request::ConnectionFlags,
};

#[derive(Args, Clone)]
pub struct ExecCommand {
    #[command(flatten)]
    pub target: PodTargetArgs,

    #[arg(
        help = "Command to execute in the ingress-nginx container",
        required = true,
        last = true
    )]
    pub command: Vec<String>,
}

impl ExecCommand {
    pub async fn run(self, flags: ConnectionFlags, config: Config) -> Result<(), Error> {
        let Self { target, command } = self;
        let context = internal::connect(flags).await?;
        let output = target.exec(&context, &config, command).await?;
        write_output(&output, &mut tokio::io::stdout(), &mut tokio::io::stderr()).await
    }
}

/// Forwards the stderr of the command first, then its stdout.
async fn write_output<O, E>(
    output: &ExecOutput,
    stdout: &mut O,
    stderr: &mut E,
) -> Result<(), Error>
where
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    stderr.write_all(output.stderr.as_bytes()).await.context(error::WriteStderrSnafu)?;
    stderr.flush().await.context(error::WriteStderrSnafu)?;

    stdout.write_all(output.stdout.as_bytes()).await.context(error::WriteStdoutSnafu)?;
    stdout.flush().await.context(error::WriteStdoutSnafu)
}
