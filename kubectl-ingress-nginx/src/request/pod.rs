use ingress_nginx_base::consts::DEFAULT_DEPLOYMENT_NAME;
use k8s_openapi::api::core::v1::Pod;

use crate::{
    ext::PodExt,
    request::{Cluster, Context, Error},
};

impl<C> Context<C>
where
    C: Cluster,
{
    /// Picks the pod a command should talk to.
    ///
    /// Only the first non-empty criterion counts, in the order `pod_name`,
    /// `selector`, `deployment`. An empty `deployment` means the default
    /// controller deployment. With several matches the first one in list order
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns `Error::Api` when listing pods fails, or the matching
    /// not-found error when nothing matches.
    pub async fn choose_pod(
        &self,
        pod_name: &str,
        deployment: &str,
        selector: &str,
    ) -> Result<Pod, Error> {
        if !pod_name.is_empty() {
            return self.named_pod(pod_name).await;
        }

        if !selector.is_empty() {
            return self.labeled_pod(selector).await;
        }

        self.deployment_pod(deployment).await
    }

    async fn named_pod(&self, pod_name: &str) -> Result<Pod, Error> {
        let namespace = self.namespace();
        self.cluster
            .list_pods(&namespace, None)
            .await?
            .into_iter()
            .find(|pod| pod.metadata.name.as_deref() == Some(pod_name))
            .ok_or_else(|| Error::PodNotFound { pod_name: pod_name.to_string(), namespace })
    }

    async fn labeled_pod(&self, selector: &str) -> Result<Pod, Error> {
        let namespace = self.namespace();
        self.cluster
            .list_pods(&namespace, Some(selector))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NoPodsForLabelSelector {
                selector: selector.to_string(),
                namespace,
            })
    }

    async fn deployment_pod(&self, deployment: &str) -> Result<Pod, Error> {
        let deployment = if deployment.is_empty() { DEFAULT_DEPLOYMENT_NAME } else { deployment };
        let namespace = self.namespace();
        self.cluster
            .list_pods(&namespace, None)
            .await?
            .into_iter()
            .find(|pod| pod.is_in_deployment(deployment))
            .ok_or_else(|| Error::NoPodsForDeployment {
                deployment: deployment.to_string(),
                namespace,
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::request::{
        ConnectionFlags, Context,
        fake::{FakeCluster, labeled_pod, pod, replica_set_pod},
    };

    fn context(pods: Vec<k8s_openapi::api::core::v1::Pod>) -> Context<FakeCluster> {
        let cluster = FakeCluster { pods, ..FakeCluster::default() };
        Context::new(cluster, ConnectionFlags::default())
    }

    #[tokio::test]
    async fn test_named_pod_ignores_other_criteria() {
        let context = context(vec![
            replica_set_pod(
                "ingress-nginx-controller-5d8f-abcde",
                "ingress-nginx",
                "ingress-nginx-controller-5d8f",
            ),
            pod("web-7f8", "ingress-nginx"),
        ]);

        let chosen =
            context.choose_pod("web-7f8", "ingress-nginx-controller", "app=x").await.unwrap();
        assert_eq!(chosen.metadata.name.as_deref(), Some("web-7f8"));

        let calls = context.cluster().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].label_selector, None);
    }

    #[tokio::test]
    async fn test_named_pod_not_found() {
        let context = context(vec![pod("web-1", "ingress-nginx")]);
        let err = context.choose_pod("web-7f8", "", "").await.unwrap_err();
        assert_eq!(err.to_string(), "pod web-7f8 not found in namespace ingress-nginx");
    }

    #[tokio::test]
    async fn test_labeled_pod_uses_one_filtered_list() {
        let context = context(vec![
            labeled_pod("a-1", "ingress-nginx", &[("team", "a")]),
            labeled_pod("b-1", "ingress-nginx", &[("team", "b")]),
            labeled_pod("a-2", "ingress-nginx", &[("team", "a")]),
        ]);

        let chosen = context.choose_pod("", "", "team=a").await.unwrap();
        assert_eq!(chosen.metadata.name.as_deref(), Some("a-1"));

        let calls = context.cluster().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].label_selector.as_deref(), Some("team=a"));
        assert_eq!(calls[0].namespace, "ingress-nginx");
    }

    #[tokio::test]
    async fn test_labeled_pod_not_found() {
        let context = context(vec![labeled_pod("b-1", "ingress-nginx", &[("team", "b")])]);
        let err = context.choose_pod("", "ingress-nginx-controller", "team=a").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "no pods for label selector team=a found in namespace ingress-nginx"
        );
    }

    #[tokio::test]
    async fn test_deployment_pod() {
        let context = context(vec![
            replica_set_pod("other-6c9-xyz", "ingress-nginx", "other-6c9"),
            replica_set_pod(
                "ingress-nginx-controller-5d8f-abcde",
                "ingress-nginx",
                "ingress-nginx-controller-5d8f",
            ),
        ]);

        let chosen = context.choose_pod("", "ingress-nginx-controller", "").await.unwrap();
        assert_eq!(chosen.metadata.name.as_deref(), Some("ingress-nginx-controller-5d8f-abcde"));

        let defaulted = context.choose_pod("", "", "").await.unwrap();
        assert_eq!(defaulted.metadata.name, chosen.metadata.name);
    }

    #[tokio::test]
    async fn test_deployment_pod_not_found() {
        let context = context(vec![replica_set_pod(
            "ingress-nginx-controller-admission-7b-q",
            "ingress-nginx",
            "ingress-nginx-controller-admission-7b",
        )]);

        let err = context.choose_pod("", "ingress-nginx-controller", "").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "no pods for deployment ingress-nginx-controller found in namespace ingress-nginx"
        );
    }

    #[tokio::test]
    async fn test_explicit_namespace_is_used() {
        let cluster =
            FakeCluster { pods: vec![pod("web-7f8", "team-a")], ..FakeCluster::default() };
        let flags =
            ConnectionFlags { namespace: Some("team-a".to_string()), ..ConnectionFlags::default() };
        let context = Context::new(cluster, flags);

        let chosen = context.choose_pod("web-7f8", "", "").await.unwrap();
        assert_eq!(chosen.metadata.namespace.as_deref(), Some("team-a"));
    }
}
