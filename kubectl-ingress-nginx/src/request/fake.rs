//! In-memory [`Cluster`] used by the unit tests.

use std::{collections::BTreeMap, sync::Mutex};

use k8s_openapi::{
    api::{
        apps::v1::Deployment,
        core::v1::{Pod, Service},
        discovery::v1::{self as discovery, EndpointSlice},
        networking::v1::Ingress,
    },
    apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference},
};

use crate::request::{ApiError, Cluster, error::scope, legacy};

/// What the fake answers for one API version.
#[derive(Clone, Debug, Default)]
pub enum Reply<T> {
    /// The API version is not served by the cluster.
    #[default]
    NotFound,
    Items(Vec<T>),
    /// Any failure other than "not found".
    Broken,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub api: &'static str,
    pub namespace: String,
    pub label_selector: Option<String>,
}

#[derive(Debug)]
pub struct FakeCluster {
    pub default_namespace: String,
    pub pods: Vec<Pod>,
    pub deployments: Vec<Deployment>,
    pub services: Vec<Service>,
    pub ingresses: Reply<Ingress>,
    pub legacy_ingresses: Reply<legacy::Ingress>,
    pub endpoint_slices: Reply<EndpointSlice>,
    pub legacy_endpoint_slices: Reply<legacy::EndpointSlice>,
    /// Cluster-wide lists fail, as they do for users bound to a single
    /// namespace.
    pub forbid_all_namespaces: bool,
    pub calls: Mutex<Vec<Call>>,
}

impl Default for FakeCluster {
    fn default() -> Self {
        Self {
            default_namespace: "ingress-nginx".to_string(),
            pods: Vec::new(),
            deployments: Vec::new(),
            services: Vec::new(),
            ingresses: Reply::default(),
            legacy_ingresses: Reply::default(),
            endpoint_slices: Reply::default(),
            legacy_endpoint_slices: Reply::default(),
            forbid_all_namespaces: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeCluster {
    pub fn calls(&self) -> Vec<Call> { self.calls.lock().map(|calls| calls.clone()).unwrap() }

    pub fn call_count(&self) -> usize { self.calls().len() }

    pub fn reset_calls(&self) { self.calls.lock().unwrap().clear(); }

    fn record(&self, api: &'static str, namespace: &str, label_selector: Option<&str>) {
        self.calls.lock().unwrap().push(Call {
            api,
            namespace: namespace.to_string(),
            label_selector: label_selector.map(ToString::to_string),
        });
    }

    fn reply<T, F>(
        &self,
        api: &'static str,
        namespace: &str,
        reply: &Reply<T>,
        metadata: F,
    ) -> Result<Vec<T>, ApiError>
    where
        T: Clone,
        F: Fn(&T) -> &ObjectMeta,
    {
        self.record(api, namespace, None);
        match reply {
            Reply::NotFound => Err(ApiError::NotFound { resource: api, scope: scope(namespace) }),
            Reply::Broken => Err(broken(api, namespace)),
            Reply::Items(_) if namespace.is_empty() && self.forbid_all_namespaces => {
                Err(broken(api, namespace))
            }
            Reply::Items(items) => Ok(items
                .iter()
                .filter(|item| in_namespace(metadata(item), namespace))
                .cloned()
                .collect()),
        }
    }
}

impl Cluster for FakeCluster {
    fn default_namespace(&self) -> &str { &self.default_namespace }

    async fn list_pods(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> Result<Vec<Pod>, ApiError> {
        self.record("pods", namespace, label_selector);
        Ok(self
            .pods
            .iter()
            .filter(|pod| in_namespace(&pod.metadata, namespace))
            .filter(|pod| label_selector.is_none_or(|selector| matches_selector(pod, selector)))
            .cloned()
            .collect())
    }

    async fn list_deployments(&self, namespace: &str) -> Result<Vec<Deployment>, ApiError> {
        self.reply("deployments", namespace, &Reply::Items(self.deployments.clone()), |d| {
            &d.metadata
        })
    }

    async fn list_services(&self, namespace: &str) -> Result<Vec<Service>, ApiError> {
        self.reply("services", namespace, &Reply::Items(self.services.clone()), |s| &s.metadata)
    }

    async fn list_ingresses(&self, namespace: &str) -> Result<Vec<Ingress>, ApiError> {
        self.reply("ingresses/v1", namespace, &self.ingresses, |i| &i.metadata)
    }

    async fn list_legacy_ingresses(
        &self,
        namespace: &str,
    ) -> Result<Vec<legacy::Ingress>, ApiError> {
        self.reply("ingresses/v1beta1", namespace, &self.legacy_ingresses, |i| &i.metadata)
    }

    async fn list_endpoint_slices(&self, namespace: &str) -> Result<Vec<EndpointSlice>, ApiError> {
        self.reply("endpointslices/v1", namespace, &self.endpoint_slices, |e| &e.metadata)
    }

    async fn list_legacy_endpoint_slices(
        &self,
        namespace: &str,
    ) -> Result<Vec<legacy::EndpointSlice>, ApiError> {
        self.reply("endpointslices/v1beta1", namespace, &self.legacy_endpoint_slices, |e| {
            &e.metadata
        })
    }
}

fn in_namespace(metadata: &ObjectMeta, namespace: &str) -> bool {
    namespace.is_empty() || metadata.namespace.as_deref() == Some(namespace)
}

fn matches_selector(pod: &Pod, selector: &str) -> bool {
    let labels = pod.metadata.labels.clone().unwrap_or_default();
    selector.split(',').all(|requirement| {
        requirement.split_once('=').is_some_and(|(key, value)| {
            labels.get(key.trim()).map(String::as_str) == Some(value.trim())
        })
    })
}

fn broken(api: &'static str, namespace: &str) -> ApiError {
    ApiError::Decode {
        resource: api,
        scope: scope(namespace),
        source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
    }
}

pub fn meta(name: &str, namespace: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        ..ObjectMeta::default()
    }
}

pub fn pod(name: &str, namespace: &str) -> Pod {
    Pod { metadata: meta(name, namespace), ..Pod::default() }
}

pub fn labeled_pod(name: &str, namespace: &str, labels: &[(&str, &str)]) -> Pod {
    let mut pod = pod(name, namespace);
    pod.metadata.labels = Some(
        labels.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect(),
    );
    pod
}

pub fn replica_set_pod(name: &str, namespace: &str, replica_set: &str) -> Pod {
    let mut pod = pod(name, namespace);
    pod.metadata.owner_references = Some(vec![OwnerReference {
        api_version: "apps/v1".to_string(),
        kind: "ReplicaSet".to_string(),
        name: replica_set.to_string(),
        uid: format!("uid-{replica_set}"),
        controller: Some(true),
        ..OwnerReference::default()
    }]);
    pod
}

pub fn service(name: &str, namespace: &str) -> Service {
    Service { metadata: meta(name, namespace), ..Service::default() }
}

/// An `EndpointSlice` of `service` with one endpoint per entry of
/// `endpoints`.
pub fn endpoint_slice(
    name: &str,
    namespace: &str,
    service: &str,
    endpoints: &[&[&str]],
) -> EndpointSlice {
    let mut metadata = meta(name, namespace);
    metadata.labels = Some(BTreeMap::from([(
        ingress_nginx_base::consts::k8s::labels::SERVICE_NAME.to_string(),
        service.to_string(),
    )]));
    EndpointSlice {
        metadata,
        address_type: "IPv4".to_string(),
        endpoints: endpoints
            .iter()
            .map(|addresses| discovery::Endpoint {
                addresses: addresses.iter().map(ToString::to_string).collect(),
                ..discovery::Endpoint::default()
            })
            .collect(),
        ..EndpointSlice::default()
    }
}

pub fn legacy_endpoint_slice(
    name: &str,
    namespace: &str,
    service: &str,
    endpoints: &[&[&str]],
) -> legacy::EndpointSlice {
    let v1 = endpoint_slice(name, namespace, service, endpoints);
    legacy::EndpointSlice {
        metadata: v1.metadata,
        endpoints: v1
            .endpoints
            .into_iter()
            .map(|endpoint| legacy::Endpoint { addresses: endpoint.addresses })
            .collect(),
    }
}
