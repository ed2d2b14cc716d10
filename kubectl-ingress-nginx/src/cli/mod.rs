//! Command line interface of the `kubectl ingress-nginx` plugin.
//!
//! # Examples
//!
//! ```bash
//! # List the ingresses of every namespace with their endpoint counts
//! kubectl ingress-nginx ingresses -A
//!
//! # Pick an ingress URL and open it in the browser
//! kubectl ingress-nginx browser
//!
//! # Show the certificate the controller serves for a host
//! kubectl ingress-nginx certs --host shop.example.com --pretty
//!
//! # Run a command in the controller container
//! kubectl ingress-nginx exec -n ingress-nginx -- /dbg backends list
//! ```

mod browser;
mod certs;
pub mod error;
mod exec;
mod info;
mod ingresses;
mod internal;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use ingress_nginx_base::CLI_PROGRAM_NAME;
use snafu::ResultExt;
use tokio::{io::AsyncWriteExt, runtime::Runtime};

pub use self::error::Error;
use self::{
    browser::BrowserCommand, certs::CertsCommand, exec::ExecCommand, info::InfoCommand,
    ingresses::IngressesCommand,
};
use crate::{config::Config, request::ConnectionFlags, shadow};

#[derive(Parser)]
#[command(
    name = CLI_PROGRAM_NAME,
    bin_name = "kubectl ingress-nginx",
    author,
    version,
    long_version = shadow::CLAP_LONG_VERSION,
    about = "A kubectl plugin for inspecting the ingress-nginx controller",
    long_about = "Inspects ingress-nginx in a Kubernetes cluster: lists ingress hosts with \
                  their services and endpoints, opens ingress URLs in a browser, dumps the \
                  TLS certificates served by the controller and runs commands in its pods.",
    color = clap::ColorChoice::Auto
)]
pub struct Cli {
    #[clap(subcommand)]
    commands: Option<Commands>,

    #[clap(
        long = "kubeconfig",
        global = true,
        help = "Path to the kubeconfig file to use for CLI requests"
    )]
    kubeconfig: Option<PathBuf>,

    #[clap(long = "context", global = true, help = "The name of the kubeconfig context to use")]
    context: Option<String>,

    #[clap(
        short = 'n',
        long = "namespace",
        global = true,
        help = "If present, the namespace scope for this CLI request"
    )]
    namespace: Option<String>,

    /// Path to the configuration file.
    #[clap(
        long = "config",
        global = true,
        env = "INGRESS_NGINX_CONFIG_FILE_PATH",
        help = "Specify a configuration file. Defaults to \
                ~/.config/kubectl-ingress-nginx/config.yaml or INGRESS_NGINX_CONFIG_FILE_PATH \
                env var."
    )]
    config_file: Option<PathBuf>,

    #[clap(
        long = "log-level",
        global = true,
        env = "INGRESS_NGINX_LOG_LEVEL",
        help = "Set the logging level (e.g., warn, info, debug, trace)."
    )]
    log_level: Option<tracing::Level>,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    #[command(about = "Display client and server version information")]
    Version {
        #[clap(long = "client", help = "If true, shows client version only (no server required).")]
        client: bool,
    },

    #[command(about = "Generate shell completion script for the specified shell (bash, zsh, fish)")]
    Completions { shell: clap_complete::Shell },

    #[command(about = "Output the default configuration in YAML format")]
    DefaultConfig,

    #[command(about = "Provide a short summary of all of the ingress definitions")]
    Ingresses(IngressesCommand),

    #[command(about = "Open url defined in ingress with browser")]
    Browser(BrowserCommand),

    #[command(about = "Output the certificate data stored in an ingress-nginx pod")]
    Certs(CertsCommand),

    #[command(about = "Execute a command inside an ingress-nginx pod")]
    Exec(ExecCommand),

    #[command(about = "Show information about the ingress-nginx service")]
    Info(InfoCommand),
}

impl Default for Cli {
    fn default() -> Self { Self::parse() }
}

impl Cli {
    fn load_config(&self) -> Result<Config, Error> {
        let mut config =
            Config::load(self.config_file.clone().unwrap_or_else(Config::search_config_file_path))?;

        if let Some(log_level) = self.log_level {
            config.log.level = log_level;
        }

        Ok(config)
    }

    fn connection_flags(&self) -> ConnectionFlags {
        ConnectionFlags {
            kubeconfig: self.kubeconfig.clone(),
            context: self.context.clone(),
            namespace: self.namespace.clone(),
            all_namespaces: false,
        }
    }

    /// Runs the parsed command and returns the process exit code.
    ///
    /// # Errors
    ///
    /// Returns an `Error` when the configuration cannot be loaded, the Tokio
    /// runtime cannot be created or the command fails.
    pub fn run(self) -> Result<i32, Error> {
        let client_version = Self::command().get_version().unwrap_or_default().to_string();
        match self.commands {
            Some(Commands::Completions { shell }) => {
                let mut app = Self::command();
                let bin_name = app.get_name().to_string();
                clap_complete::generate(shell, &mut app, bin_name, &mut std::io::stdout());
                return Ok(0);
            }
            Some(Commands::DefaultConfig) => {
                std::io::Write::write_all(&mut std::io::stdout(), &Config::template_basic())
                    .context(error::WriteStdoutSnafu)?;
                return Ok(0);
            }
            None => {
                let help = Self::command().render_long_help().ansi().to_string();
                std::io::Write::write_all(&mut std::io::stderr(), help.as_bytes())
                    .context(error::WriteStdoutSnafu)?;
                return Ok(-1);
            }
            _ => {}
        }

        let config = self.load_config()?;
        config.log.registry();
        let flags = self.connection_flags();

        let fut = async move {
            match self.commands {
                Some(Commands::Version { client }) => {
                    let mut info = format!(
                        "{}Client Version: {client_version}\n",
                        Self::command().render_long_version()
                    );
                    if !client {
                        let context = internal::connect(flags).await?;
                        let server_version = context
                            .cluster()
                            .client()
                            .apiserver_version()
                            .await
                            .map_or_else(
                                |_| "unknown".to_string(),
                                |info| format!("{}.{}", info.major, info.minor),
                            );
                        info.push_str("Server Version: ");
                        info.push_str(&server_version);
                        info.push('\n');
                    }
                    tokio::io::stdout()
                        .write_all(info.as_bytes())
                        .await
                        .context(error::WriteStdoutSnafu)?;
                }
                Some(Commands::Ingresses(cmd)) => cmd.run(flags).await?,
                Some(Commands::Browser(cmd)) => cmd.run(flags).await?,
                Some(Commands::Certs(cmd)) => cmd.run(flags, config).await?,
                Some(Commands::Exec(cmd)) => cmd.run(flags, config).await?,
                Some(Commands::Info(cmd)) => cmd.run(flags, config).await?,
                Some(Commands::Completions { .. } | Commands::DefaultConfig) | None => {}
            }

            Ok(0)
        };

        Runtime::new().context(error::InitializeTokioRuntimeSnafu)?.block_on(fut)
    }
}
