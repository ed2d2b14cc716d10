use ingress_nginx_base::consts::k8s::kinds;
use k8s_openapi::{Metadata, api::core::v1::Pod};

pub trait PodExt {
    /// Whether the pod was created by a `ReplicaSet` of `deployment`.
    ///
    /// A deployment names its replica sets `<deployment>-<hash>`, so the owner
    /// must carry that prefix and exactly one dash more than the deployment.
    fn is_in_deployment(&self, deployment: &str) -> bool;

    fn name(&self) -> &str;

    fn namespace(&self) -> &str;
}

impl PodExt for Pod {
    fn is_in_deployment(&self, deployment: &str) -> bool {
        let prefix = format!("{deployment}-");
        let dashes = deployment.matches('-').count() + 1;

        self.metadata()
            .owner_references
            .iter()
            .flatten()
            .filter(|owner| owner.controller == Some(true) && owner.kind == kinds::REPLICA_SET)
            .any(|owner| {
                owner.name.starts_with(&prefix) && owner.name.matches('-').count() == dashes
            })
    }

    fn name(&self) -> &str { self.metadata().name.as_deref().unwrap_or_default() }

    fn namespace(&self) -> &str { self.metadata().namespace.as_deref().unwrap_or_default() }
}
