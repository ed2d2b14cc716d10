mod error;

use std::path::{Path, PathBuf};

use ingress_nginx_base::consts::{
    DEFAULT_CONTAINER_NAME, DEFAULT_DEPLOYMENT_NAME, DEFAULT_SERVICE_NAME,
};
use ingress_nginx_cli::config::LogConfig;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::error::Error;

const TEMPLATE_BASIC: &str = r"# Configuration of kubectl-ingress-nginx.
#
# Every key is optional; a missing key takes the value shown here.

# Deployment of the ingress-nginx controller, used when no pod is selected.
defaultDeployment: ingress-nginx-controller

# Service of the ingress-nginx controller, shown by `info`.
defaultService: ingress-nginx-controller

# Container that commands are executed in.
defaultContainer: controller

log:
  level: WARN
  emitStderr: true
  emitStdout: false
  emitJournald: false
  # filePath: ~/.local/state/kubectl-ingress-nginx/plugin.log
";

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_deployment")]
    pub default_deployment: String,

    #[serde(default = "default_service")]
    pub default_service: String,

    #[serde(default = "default_container")]
    pub default_container: String,

    #[serde(default = "LogConfig::default")]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_deployment: default_deployment(),
            default_service: default_service(),
            default_container: default_container(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// The first existing configuration file among the project config
    /// directory and its fallbacks, or the default path when none exists.
    pub fn search_config_file_path() -> PathBuf {
        let paths = vec![Self::default_path()]
            .into_iter()
            .chain(ingress_nginx_base::fallback_project_config_directories().into_iter().map(
                |mut path| {
                    path.push(ingress_nginx_base::CLI_CONFIG_NAME);
                    path
                },
            ))
            .collect::<Vec<_>>();
        for path in paths {
            let Ok(exists) = path.try_exists() else {
                continue;
            };
            if exists {
                return path;
            }
        }
        Self::default_path()
    }

    #[inline]
    pub fn default_path() -> PathBuf {
        [
            ingress_nginx_base::PROJECT_CONFIG_DIR.to_path_buf(),
            PathBuf::from(ingress_nginx_base::CLI_CONFIG_NAME),
        ]
        .into_iter()
        .collect()
    }

    /// Loads the configuration at `path`. A file that does not exist yields
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Fails when the path cannot be resolved, or the file cannot be read or
    /// parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file_path = path.as_ref();
        let path = file_path
            .try_resolve()
            .map(|path| path.to_path_buf())
            .with_context(|_| error::ResolveFilePathSnafu { file_path })?;

        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => return Err(Error::OpenConfig { filename: path, source }),
        };

        let mut config =
            Self::from_yaml(&data).context(error::ParseConfigSnafu { filename: path })?;

        config.log.file_path = match config.log.file_path.map(|path| {
            path.try_resolve()
                .map(|path| path.to_path_buf())
                .with_context(|_| error::ResolveFilePathSnafu { file_path: path.clone() })
        }) {
            Some(Ok(path)) => Some(path),
            Some(Err(err)) => return Err(err),
            None => None,
        };

        Ok(config)
    }

    fn from_yaml(data: &[u8]) -> Result<Self, serde_yaml::Error> {
        // an empty file is a valid, empty configuration
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_yaml::from_slice(data)
    }

    /// A commented configuration file holding the default values.
    pub fn template_basic() -> Vec<u8> { TEMPLATE_BASIC.as_bytes().to_vec() }
}

fn default_deployment() -> String { DEFAULT_DEPLOYMENT_NAME.to_string() }

fn default_service() -> String { DEFAULT_SERVICE_NAME.to_string() }

fn default_container() -> String { DEFAULT_CONTAINER_NAME.to_string() }
