use clap::Args;
use k8s_openapi::api::apps::v1::Deployment;
use snafu::ResultExt;
use tokio::io::AsyncWriteExt;

use crate::{
    cli::{
        error::{self, Error},
        internal,
    },
    config::Config,
    ext::ServiceExt,
    request::ConnectionFlags,
};

#[derive(Args, Clone)]
pub struct InfoCommand {
    #[arg(
        long = "service",
        help = "The name of the ingress-nginx service [default: ingress-nginx-controller]"
    )]
    pub service: Option<String>,

    #[arg(
        long = "deployment",
        help = "The name of the ingress-nginx deployment [default: ingress-nginx-controller]"
    )]
    pub deployment: Option<String>,
}

impl InfoCommand {
    pub async fn run(self, flags: ConnectionFlags, config: Config) -> Result<(), Error> {
        let Self { service, deployment } = self;
        let service = service.unwrap_or(config.default_service);
        let deployment = deployment.unwrap_or(config.default_deployment);

        let context = internal::connect(flags).await?;
        let service = context.get_service_by_name(&service, None).await?;

        let mut lines = vec![
            format!("Service cluster IP address: {}", service.cluster_ip()),
            format!("LoadBalancer IP|CNAME: {}", service.load_balancer_addresses().join(",")),
        ];

        let deployments = context.list_deployments(&context.namespace()).await?;
        if let Some(found) =
            deployments.iter().find(|d| d.metadata.name.as_deref() == Some(deployment.as_str()))
        {
            lines.push(format!(
                "Deployment {deployment} replicas (ready/desired): {}",
                replicas(found)
            ));
        }
        let info = lines.join("\n") + "\n";

        let mut stdout = tokio::io::stdout();
        stdout.write_all(info.as_bytes()).await.context(error::WriteStdoutSnafu)?;
        stdout.flush().await.context(error::WriteStdoutSnafu)
    }
}

/// `ready/desired` replica counts of a deployment.
fn replicas(deployment: &Deployment) -> String {
    let desired = deployment.spec.as_ref().and_then(|spec| spec.replicas).unwrap_or(1);
    let ready = deployment.status.as_ref().and_then(|status| status.ready_replicas).unwrap_or(0);
    format!("{ready}/{desired}")
}

#[cfg(test)]
mod tests {
    use k8s_openapi::api::apps::v1::{DeploymentSpec, DeploymentStatus};

    use super::*;

    #[test]
    fn test_replicas() {
        let mut deployment = Deployment::default();
        assert_eq!(replicas(&deployment), "0/1");

        deployment.spec = Some(DeploymentSpec { replicas: Some(3), ..DeploymentSpec::default() });
        deployment.status =
            Some(DeploymentStatus { ready_replicas: Some(2), ..DeploymentStatus::default() });
        assert_eq!(replicas(&deployment), "2/3");
    }
}
