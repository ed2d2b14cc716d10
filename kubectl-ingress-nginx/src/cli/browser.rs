use clap::Args;
use snafu::{OptionExt, ResultExt};
use tokio::io::AsyncWriteExt;

use crate::{
    cli::{
        error::{self, Error},
        ingresses::matches_host,
        internal,
    },
    request::{ConnectionFlags, IngressRow},
    ui::{browser, fuzzy_finder::UrlListExt},
};

#[derive(Args, Clone)]
pub struct BrowserCommand {
    #[arg(long = "host", help = "Show just the ingress definitions for this hostname")]
    pub host: Option<String>,

    #[arg(
        short = 'A',
        long = "all-namespaces",
        help = "Find ingress definitions from all namespaces"
    )]
    pub all_namespaces: bool,
}

impl BrowserCommand {
    pub async fn run(self, flags: ConnectionFlags) -> Result<(), Error> {
        let Self { host, all_namespaces } = self;
        let context = internal::connect(flags.with_all_namespaces(all_namespaces)).await?;
        let urls = urls(&context.ingress_rows().await?, host.as_deref());

        if browser::is_interactive_mode() {
            let url = urls.select_url().context(error::NoUrlChosenSnafu)?;
            return browser::open_url(&url).await.map_err(Error::from);
        }

        let mut stdout = tokio::io::stdout();
        for url in urls {
            stdout.write_all(url.as_bytes()).await.context(error::WriteStdoutSnafu)?;
            stdout.write_u8(b'\n').await.context(error::WriteStdoutSnafu)?;
        }
        stdout.flush().await.context(error::WriteStdoutSnafu)
    }
}

/// URLs of the rows that have a host, restricted to `host` when given.
fn urls(rows: &[IngressRow], host: Option<&str>) -> Vec<String> {
    rows.iter().filter(|row| matches_host(row, host)).filter_map(IngressRow::url).collect()
}
