use kube::config::{KubeConfigOptions, Kubeconfig};
use snafu::ResultExt;

use crate::{
    cli::{Error, error},
    request::{ConnectionFlags, Context, KubeCluster},
};

/// Builds the cluster context for `flags`.
///
/// An explicit kubeconfig file or context is honored; otherwise the
/// configuration is inferred the way `kubectl` does it.
///
/// # Errors
///
/// Fails when no usable client configuration can be found.
pub async fn connect(flags: ConnectionFlags) -> Result<Context<KubeCluster>, Error> {
    let options =
        KubeConfigOptions { context: flags.context.clone(), ..KubeConfigOptions::default() };

    let config = match (&flags.kubeconfig, &flags.context) {
        (Some(path), _) => {
            let kubeconfig = Kubeconfig::read_from(path)
                .with_context(|_| error::LoadKubeconfigSnafu { path: path.clone() })?;
            kube::Config::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .with_context(|_| error::LoadKubeconfigSnafu { path: path.clone() })?
        }
        (None, Some(_)) => kube::Config::from_kubeconfig(&options)
            .await
            .context(error::KubeconfigContextSnafu)?,
        (None, None) => kube::Config::infer().await.context(error::InferKubeConfigSnafu)?,
    };

    tracing::debug!("Connecting to {}", config.cluster_url);
    let client = kube::Client::try_from(config).context(error::KubeConfigSnafu)?;
    Ok(Context::new(KubeCluster::from(client), flags))
}
