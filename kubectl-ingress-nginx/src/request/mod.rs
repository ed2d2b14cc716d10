//! Resource discovery against the cluster.
//!
//! Every lookup goes through a [`Context`], which owns the [`Cluster`]
//! handle, the connection flags it was created for and the endpoint-slice
//! cache. Commands build one `Context` and pass it by reference.

mod cluster;
mod endpoint_slice;
mod error;
#[cfg(test)]
pub mod fake;
mod ingress;
pub mod legacy;
mod pod;

use std::path::PathBuf;

use k8s_openapi::api::{apps::v1::Deployment, core::v1::Service};
use tokio::sync::Mutex;

pub use self::{
    cluster::{Cluster, KubeCluster},
    endpoint_slice::{EndpointSliceCache, EndpointSliceRecord},
    error::{ApiError, Error},
    ingress::{IngressDefinition, IngressRow},
};

/// How to reach the cluster and which namespace to look at.
///
/// Built by the command line layer and never changed afterwards.
#[derive(Clone, Debug, Default)]
pub struct ConnectionFlags {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub namespace: Option<String>,
    pub all_namespaces: bool,
}

impl ConnectionFlags {
    #[must_use]
    pub fn with_all_namespaces(self, all_namespaces: bool) -> Self {
        Self { all_namespaces, ..self }
    }
}

/// Derives the namespace lookups are scoped to. `""` stands for all
/// namespaces.
///
/// An explicit namespace wins over the all-namespaces flag, which wins over
/// the namespace of the kubeconfig context.
pub fn resolve_namespace(flags: &ConnectionFlags, context_namespace: &str) -> String {
    if let Some(namespace) = flags.namespace.as_deref().filter(|s| !s.is_empty()) {
        return namespace.to_string();
    }
    if flags.all_namespaces {
        return String::new();
    }
    if context_namespace.is_empty() {
        "default".to_string()
    } else {
        context_namespace.to_string()
    }
}

pub struct Context<C> {
    cluster: C,
    flags: ConnectionFlags,
    endpoint_slices: Mutex<EndpointSliceCache>,
}

impl<C> Context<C>
where
    C: Cluster,
{
    pub fn new(cluster: C, flags: ConnectionFlags) -> Self {
        Self { cluster, flags, endpoint_slices: Mutex::new(EndpointSliceCache::default()) }
    }

    pub const fn cluster(&self) -> &C { &self.cluster }

    pub fn namespace(&self) -> String {
        resolve_namespace(&self.flags, self.cluster.default_namespace())
    }

    /// # Errors
    ///
    /// Returns `Error::Api` when the list call fails.
    pub async fn list_deployments(&self, namespace: &str) -> Result<Vec<Deployment>, Error> {
        Ok(self.cluster.list_deployments(namespace).await?)
    }

    /// Finds the service called `name` in the resolved namespace.
    ///
    /// `services` can carry a list fetched earlier, in which case the cluster
    /// is not asked again.
    ///
    /// # Errors
    ///
    /// Returns `Error::Api` when listing fails and `Error::ServiceNotFound`
    /// when no service has that name.
    pub async fn get_service_by_name(
        &self,
        name: &str,
        services: Option<&[Service]>,
    ) -> Result<Service, Error> {
        let namespace = self.namespace();
        let fetched;
        let services = match services {
            Some(services) => services,
            None => {
                fetched = self.cluster.list_services(&namespace).await?;
                fetched.as_slice()
            }
        };

        services
            .iter()
            .find(|service| service.metadata.name.as_deref() == Some(name))
            .cloned()
            .ok_or_else(|| Error::ServiceNotFound { service_name: name.to_string(), namespace })
    }

    /// # Errors
    ///
    /// Returns `Error::Api` when the endpoint slices cannot be listed.
    pub async fn get_endpoint_slices(
        &self,
        namespace: &str,
    ) -> Result<Vec<EndpointSliceRecord>, Error> {
        Ok(self.endpoint_slices.lock().await.get(&self.cluster, namespace).await?)
    }

    /// The endpoint slices labelled as belonging to `service_name`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Api` when the endpoint slices cannot be listed.
    pub async fn get_endpoint_slices_by_service_name(
        &self,
        namespace: &str,
        service_name: &str,
    ) -> Result<Vec<EndpointSliceRecord>, Error> {
        Ok(self
            .get_endpoint_slices(namespace)
            .await?
            .into_iter()
            .filter(|record| record.service_name() == Some(service_name))
            .collect())
    }

    /// Counts the endpoint addresses of a service.
    ///
    /// `None` means there is no endpoint-slice data for the service at all,
    /// as opposed to `Some(0)` for a service without ready endpoints.
    ///
    /// # Errors
    ///
    /// Returns `Error::Api` when the endpoint slices cannot be listed.
    pub async fn count_endpoints(
        &self,
        namespace: &str,
        service_name: &str,
    ) -> Result<Option<usize>, Error> {
        let records = self.get_endpoint_slices_by_service_name(namespace, service_name).await?;
        if records.is_empty() {
            return Ok(None);
        }
        Ok(Some(records.iter().map(EndpointSliceRecord::address_count).sum()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::fake::{FakeCluster, Reply, endpoint_slice, service};

    #[test]
    fn test_resolve_namespace() {
        let flags = ConnectionFlags::default();
        assert_eq!(resolve_namespace(&flags, "team-a"), "team-a");
        assert_eq!(resolve_namespace(&flags, ""), "default");

        let all = flags.clone().with_all_namespaces(true);
        assert_eq!(resolve_namespace(&all, "team-a"), "");

        let explicit =
            ConnectionFlags { namespace: Some("team-b".to_string()), ..all.clone() };
        assert_eq!(resolve_namespace(&explicit, "team-a"), "team-b");

        let blank = ConnectionFlags { namespace: Some(String::new()), ..flags };
        assert_eq!(resolve_namespace(&blank, "team-a"), "team-a");
    }

    #[tokio::test]
    async fn test_count_endpoints() {
        let cluster = FakeCluster {
            endpoint_slices: Reply::Items(vec![
                endpoint_slice("web-1", "team-a", "web", &[&["10.0.0.1", "10.0.0.2"]]),
                endpoint_slice("web-2", "team-a", "web", &[&["10.0.0.3", "10.0.0.4", "10.0.0.5"]]),
                endpoint_slice("idle-1", "team-a", "idle", &[]),
            ]),
            ..FakeCluster::default()
        };
        let context = Context::new(cluster, ConnectionFlags::default());

        assert_eq!(context.count_endpoints("team-a", "web").await.unwrap(), Some(5));
        assert_eq!(context.count_endpoints("team-a", "idle").await.unwrap(), Some(0));
        assert_eq!(context.count_endpoints("team-a", "missing").await.unwrap(), None);
        assert_eq!(context.count_endpoints("team-b", "web").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_count_endpoints_without_api() {
        let context = Context::new(FakeCluster::default(), ConnectionFlags::default());
        assert_eq!(context.count_endpoints("team-a", "web").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_service_by_name() {
        let cluster = FakeCluster {
            services: vec![service("ingress-nginx-controller", "ingress-nginx")],
            ..FakeCluster::default()
        };
        let context = Context::new(cluster, ConnectionFlags::default());

        let found = context.get_service_by_name("ingress-nginx-controller", None).await.unwrap();
        assert_eq!(found.metadata.namespace.as_deref(), Some("ingress-nginx"));

        let err = context.get_service_by_name("missing", None).await.unwrap_err();
        assert_eq!(err.to_string(), "could not find service missing in namespace ingress-nginx");
    }

    #[tokio::test]
    async fn test_get_service_by_name_uses_given_list() {
        let context = Context::new(FakeCluster::default(), ConnectionFlags::default());
        let services = [service("web", "ingress-nginx")];

        let found = context.get_service_by_name("web", Some(&services)).await.unwrap();
        assert_eq!(found.metadata.name.as_deref(), Some("web"));
        assert_eq!(context.cluster().call_count(), 0);
    }
}
