use clap::Args;
use k8s_openapi::api::core::v1::Pod;
use kube::Api;

use crate::{
    cli::Error,
    config::Config,
    ext::PodExt,
    pod_exec::{ExecOutput, PodExec},
    request::{Context, KubeCluster},
};

/// Selects the controller pod a command runs in.
///
/// `--pod` wins over `--selector`, which wins over `--deployment`.
#[derive(Args, Clone, Debug, Default)]
pub struct PodTargetArgs {
    #[arg(long = "pod", help = "Query a particular ingress-nginx pod")]
    pub pod: Option<String>,

    #[arg(
        long = "deployment",
        help = "The name of the ingress-nginx deployment [default: ingress-nginx-controller]"
    )]
    pub deployment: Option<String>,

    #[arg(
        short = 'l',
        long = "selector",
        help = "Selector (label query) of the ingress-nginx pod"
    )]
    pub selector: Option<String>,

    #[arg(
        long = "container",
        help = "The name of the ingress-nginx controller container [default: controller]"
    )]
    pub container: Option<String>,
}

impl PodTargetArgs {
    /// # Errors
    ///
    /// Fails when no pod matches or the pods cannot be listed.
    pub async fn choose_pod(
        &self,
        context: &Context<KubeCluster>,
        config: &Config,
    ) -> Result<Pod, Error> {
        let deployment = self.deployment.as_deref().unwrap_or(&config.default_deployment);
        let pod = context
            .choose_pod(
                self.pod.as_deref().unwrap_or_default(),
                deployment,
                self.selector.as_deref().unwrap_or_default(),
            )
            .await?;
        tracing::debug!("Chose pod {} in namespace {}", pod.name(), pod.namespace());
        Ok(pod)
    }

    /// Chooses the pod and runs `command` in its controller container.
    ///
    /// # Errors
    ///
    /// Fails when no pod matches or the command cannot be run.
    pub async fn exec<I, S>(
        &self,
        context: &Context<KubeCluster>,
        config: &Config,
        command: I,
    ) -> Result<ExecOutput, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pod = self.choose_pod(context, config).await?;
        let container = self.container.as_deref().unwrap_or(&config.default_container);
        let api = Api::<Pod>::namespaced(context.cluster().client().clone(), pod.namespace());

        Ok(PodExec::new(api, pod.name(), pod.namespace(), command)
            .with_container(container)
            .output()
            .await?)
    }
}
