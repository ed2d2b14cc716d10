use clap::Args;
use snafu::ResultExt;
use tokio::io::AsyncWriteExt;

use crate::{
    cli::{
        error::{self, Error},
        internal,
    },
    request::{ConnectionFlags, IngressRow},
    ui::table::{IngressListing, IngressListingExt},
};

#[derive(Args, Clone)]
pub struct IngressesCommand {
    #[arg(long = "host", help = "Show just the ingress definitions for this hostname")]
    pub host: Option<String>,

    #[arg(
        short = 'A',
        long = "all-namespaces",
        help = "Find ingress definitions from all namespaces"
    )]
    pub all_namespaces: bool,
}

impl IngressesCommand {
    pub async fn run(self, flags: ConnectionFlags) -> Result<(), Error> {
        let Self { host, all_namespaces } = self;
        let context = internal::connect(flags.with_all_namespaces(all_namespaces)).await?;

        let rows = context
            .ingress_rows()
            .await?
            .into_iter()
            .filter(|row| matches_host(row, host.as_deref()))
            .collect::<Vec<_>>();

        let mut listings = Vec::with_capacity(rows.len());
        for row in rows {
            let endpoints = context.count_endpoints(&row.namespace, &row.service_name).await?;
            listings.push(IngressListing { row, endpoints });
        }

        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(listings.render_table(all_namespaces).as_bytes())
            .await
            .context(error::WriteStdoutSnafu)?;
        stdout.write_u8(b'\n').await.context(error::WriteStdoutSnafu)
    }
}

/// Rows pass when no host filter is given or the host matches it exactly.
pub fn matches_host(row: &IngressRow, host: Option<&str>) -> bool {
    host.filter(|host| !host.is_empty()).is_none_or(|host| row.host == host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_host() {
        let row = IngressRow { host: "shop.example.com".to_string(), ..IngressRow::default() };
        assert!(matches_host(&row, None));
        assert!(matches_host(&row, Some("")));
        assert!(matches_host(&row, Some("shop.example.com")));
        assert!(!matches_host(&row, Some("example.com")));
    }
}
