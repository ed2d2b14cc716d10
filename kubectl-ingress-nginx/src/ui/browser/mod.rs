mod error;

use std::io::{IsTerminal, Write};

use crossterm::style::Stylize;
use ingress_nginx_base::consts::ENV_IGNORE_FZF;
use snafu::ResultExt;

pub use self::error::Error;

/// Program that opens a URL with the user's preferred application.
#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(not(target_os = "macos"))]
const OPENER: &str = "xdg-open";

/// Whether URLs should be picked interactively instead of printed.
pub fn is_interactive_mode() -> bool {
    std::env::var_os(ENV_IGNORE_FZF).is_none_or(|value| value.is_empty())
        && std::io::stdout().is_terminal()
}

/// Opens `url` in the system browser and reports it on stderr.
///
/// # Errors
///
/// Fails when the opener cannot be started or exits unsuccessfully.
pub async fn open_url(url: &str) -> Result<(), Error> {
    tracing::debug!("Opening {url} with {OPENER}");
    let status = tokio::process::Command::new(OPENER)
        .arg(url)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .status()
        .await
        .with_context(|_| error::SpawnOpenerSnafu { program: OPENER, url })?;

    if !status.success() {
        return error::OpenerFailedSnafu { program: OPENER, url, status }.fail();
    }

    let mut stderr = std::io::stderr().lock();
    if let Err(err) =
        writeln!(stderr, "{} Open url in browser: {}", "✔".green(), url.to_string().green())
    {
        tracing::debug!("Failed to report the opened url, error: {err}");
    }
    Ok(())
}
