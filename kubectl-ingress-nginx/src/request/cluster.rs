use std::fmt::Debug;

use k8s_openapi::{
    NamespaceResourceScope,
    api::{
        apps::v1::Deployment,
        core::v1::{Pod, Service},
        discovery::v1::EndpointSlice,
        networking::v1::Ingress,
    },
};
use kube::{
    Api, Resource,
    api::{ApiResource, DynamicObject, ListParams},
};
use serde::de::DeserializeOwned;
use snafu::ResultExt;

use crate::request::{
    error::{self, ApiError},
    legacy,
};

/// The list calls the plugin makes against a cluster.
///
/// An empty `namespace` lists across all namespaces. Implementations report a
/// 404 from the API server as [`ApiError::NotFound`] so callers can probe for
/// API versions a cluster does not serve.
pub trait Cluster {
    /// Namespace of the active kubeconfig context.
    fn default_namespace(&self) -> &str;

    async fn list_pods(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> Result<Vec<Pod>, ApiError>;

    async fn list_deployments(&self, namespace: &str) -> Result<Vec<Deployment>, ApiError>;

    async fn list_services(&self, namespace: &str) -> Result<Vec<Service>, ApiError>;

    async fn list_ingresses(&self, namespace: &str) -> Result<Vec<Ingress>, ApiError>;

    async fn list_legacy_ingresses(
        &self,
        namespace: &str,
    ) -> Result<Vec<legacy::Ingress>, ApiError>;

    async fn list_endpoint_slices(&self, namespace: &str) -> Result<Vec<EndpointSlice>, ApiError>;

    async fn list_legacy_endpoint_slices(
        &self,
        namespace: &str,
    ) -> Result<Vec<legacy::EndpointSlice>, ApiError>;
}

/// [`Cluster`] backed by a `kube::Client`.
#[derive(Clone)]
pub struct KubeCluster {
    client: kube::Client,
}

impl From<kube::Client> for KubeCluster {
    fn from(client: kube::Client) -> Self { Self { client } }
}

impl KubeCluster {
    pub const fn client(&self) -> &kube::Client { &self.client }

    fn api<K>(&self, namespace: &str) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        <K as Resource>::DynamicType: Default,
    {
        if namespace.is_empty() {
            Api::all(self.client.clone())
        } else {
            Api::namespaced(self.client.clone(), namespace)
        }
    }

    async fn list<K>(
        &self,
        resource: &'static str,
        namespace: &str,
        list_params: &ListParams,
    ) -> Result<Vec<K>, ApiError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        <K as Resource>::DynamicType: Default,
    {
        tracing::debug!("Listing {resource} in {}", error::scope(namespace));
        self.api::<K>(namespace)
            .list(list_params)
            .await
            .map(|list| list.items)
            .map_err(|source| ApiError::from_kube(resource, namespace, source))
    }

    async fn list_dynamic<T>(
        &self,
        resource: &'static str,
        api_resource: &ApiResource,
        namespace: &str,
    ) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!("Listing {resource} in {}", error::scope(namespace));
        let api: Api<DynamicObject> = if namespace.is_empty() {
            Api::all_with(self.client.clone(), api_resource)
        } else {
            Api::namespaced_with(self.client.clone(), namespace, api_resource)
        };

        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|source| ApiError::from_kube(resource, namespace, source))?;

        list.items
            .into_iter()
            .map(|object| serde_json::to_value(object).and_then(serde_json::from_value))
            .collect::<Result<Vec<T>, _>>()
            .with_context(|_| error::DecodeSnafu { resource, scope: error::scope(namespace) })
    }
}

impl Cluster for KubeCluster {
    fn default_namespace(&self) -> &str { self.client.default_namespace() }

    async fn list_pods(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> Result<Vec<Pod>, ApiError> {
        let list_params = ListParams {
            label_selector: label_selector.map(ToString::to_string),
            ..ListParams::default()
        };
        self.list("pods", namespace, &list_params).await
    }

    async fn list_deployments(&self, namespace: &str) -> Result<Vec<Deployment>, ApiError> {
        self.list("deployments.apps/v1", namespace, &ListParams::default()).await
    }

    async fn list_services(&self, namespace: &str) -> Result<Vec<Service>, ApiError> {
        self.list("services", namespace, &ListParams::default()).await
    }

    async fn list_ingresses(&self, namespace: &str) -> Result<Vec<Ingress>, ApiError> {
        self.list("ingresses.networking.k8s.io/v1", namespace, &ListParams::default()).await
    }

    async fn list_legacy_ingresses(
        &self,
        namespace: &str,
    ) -> Result<Vec<legacy::Ingress>, ApiError> {
        self.list_dynamic(
            "ingresses.networking.k8s.io/v1beta1",
            &legacy::INGRESS_V1BETA1,
            namespace,
        )
        .await
    }

    async fn list_endpoint_slices(&self, namespace: &str) -> Result<Vec<EndpointSlice>, ApiError> {
        self.list("endpointslices.discovery.k8s.io/v1", namespace, &ListParams::default()).await
    }

    async fn list_legacy_endpoint_slices(
        &self,
        namespace: &str,
    ) -> Result<Vec<legacy::EndpointSlice>, ApiError> {
        self.list_dynamic(
            "endpointslices.discovery.k8s.io/v1beta1",
            &legacy::ENDPOINT_SLICE_V1BETA1,
            namespace,
        )
        .await
    }
}
