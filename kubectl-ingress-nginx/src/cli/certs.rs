use clap::Args;
use ingress_nginx_base::consts::DBG_CERTS_GET;
use snafu::ResultExt;
use tokio::io::AsyncWriteExt;

use crate::{
    certificate,
    cli::{
        error::{self, Error},
        internal::{self, PodTargetArgs},
    },
    config::Config,
    request::ConnectionFlags,
};

#[derive(Args, Clone)]
pub struct CertsCommand {
    #[arg(long = "host", required = true, help = "Get the cert for this hostname")]
    pub host: String,

    #[command(flatten)]
    pub target: PodTargetArgs,

    #[arg(long = "pretty", help = "Pretty print certificates")]
    pub pretty: bool,
}

impl CertsCommand {
    pub async fn run(self, flags: ConnectionFlags, config: Config) -> Result<(), Error> {
        let Self { host, target, pretty } = self;
        let context = internal::connect(flags).await?;

        let command = DBG_CERTS_GET.iter().map(ToString::to_string).chain([host]);
        let output = target.exec(&context, &config, command).await?;

        if pretty {
            let mut stdout = std::io::stdout().lock();
            certificate::write_pem_blocks(output.stdout.as_bytes(), &mut stdout)
                .context(error::WriteStdoutSnafu)
        } else {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(output.stdout.as_bytes()).await.context(error::WriteStdoutSnafu)?;
            stdout.flush().await.context(error::WriteStdoutSnafu)
        }
    }
}
