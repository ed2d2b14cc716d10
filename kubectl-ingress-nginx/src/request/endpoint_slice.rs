//! Endpoint-slice lookups, normalized over `discovery.k8s.io/v1` and
//! `discovery.k8s.io/v1beta1` and cached per namespace.

use std::collections::{BTreeMap, HashMap};

use ingress_nginx_base::consts::k8s::labels;
use k8s_openapi::api::discovery::v1::EndpointSlice;

use crate::request::{ApiError, Cluster, error::scope, legacy};

/// An `EndpointSlice` reduced to what the plugin reads, independent of the API
/// version it was served under.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndpointSliceRecord {
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
    pub endpoints: Vec<Endpoint>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Endpoint {
    pub addresses: Vec<String>,
}

impl EndpointSliceRecord {
    /// Name of the `Service` this slice belongs to.
    pub fn service_name(&self) -> Option<&str> {
        self.labels.get(labels::SERVICE_NAME).map(String::as_str)
    }

    pub fn address_count(&self) -> usize {
        self.endpoints.iter().map(|endpoint| endpoint.addresses.len()).sum()
    }
}

impl From<EndpointSlice> for EndpointSliceRecord {
    fn from(slice: EndpointSlice) -> Self {
        Self {
            namespace: slice.metadata.namespace.unwrap_or_default(),
            labels: slice.metadata.labels.unwrap_or_default(),
            endpoints: slice
                .endpoints
                .into_iter()
                .map(|endpoint| Endpoint { addresses: endpoint.addresses })
                .collect(),
        }
    }
}

impl From<legacy::EndpointSlice> for EndpointSliceRecord {
    fn from(slice: legacy::EndpointSlice) -> Self {
        Self {
            namespace: slice.metadata.namespace.unwrap_or_default(),
            labels: slice.metadata.labels.unwrap_or_default(),
            endpoints: slice
                .endpoints
                .into_iter()
                .map(|endpoint| Endpoint { addresses: endpoint.addresses })
                .collect(),
        }
    }
}

/// Fetches the endpoint slices of `namespace`, trying `v1` before `v1beta1`.
///
/// This is the only place that knows about both API versions. When both fail,
/// the `v1beta1` error is returned.
pub async fn fetch_endpoint_slices<C>(
    cluster: &C,
    namespace: &str,
) -> Result<Vec<EndpointSliceRecord>, ApiError>
where
    C: Cluster,
{
    match cluster.list_endpoint_slices(namespace).await {
        Ok(slices) => Ok(slices.into_iter().map(EndpointSliceRecord::from).collect()),
        Err(err) => {
            tracing::debug!("Falling back to discovery.k8s.io/v1beta1, error: {err}");
            let slices = cluster.list_legacy_endpoint_slices(namespace).await?;
            Ok(slices.into_iter().map(EndpointSliceRecord::from).collect())
        }
    }
}

/// Endpoint slices per namespace, where the key `""` holds every namespace.
///
/// Entries are never evicted. Once the cluster-wide entry exists, any other
/// namespace is derived from it instead of being fetched.
#[derive(Debug, Default)]
pub struct EndpointSliceCache {
    entries: HashMap<String, Vec<EndpointSliceRecord>>,
    all_namespaces_attempted: bool,
    all_namespaces_failed: bool,
    no_endpoint_slices_api: bool,
}

impl EndpointSliceCache {
    /// Returns the endpoint slices of `namespace`.
    ///
    /// A cluster that serves neither API version yields an empty list, and the
    /// cache then stops asking for good.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` of the direct lookup when it fails with anything
    /// other than "not found". A failing cluster-wide prefetch is not an error:
    /// the namespace is then looked up on its own, and the cluster-wide entry
    /// reads as empty.
    pub async fn get<C>(
        &mut self,
        cluster: &C,
        namespace: &str,
    ) -> Result<Vec<EndpointSliceRecord>, ApiError>
    where
        C: Cluster,
    {
        if self.no_endpoint_slices_api {
            return Ok(Vec::new());
        }

        if let Some(records) = self.entries.get(namespace) {
            tracing::debug!("Endpoint slices of {} served from cache", scope(namespace));
            return Ok(records.clone());
        }

        if namespace.is_empty() {
            if self.all_namespaces_failed {
                return Ok(Vec::new());
            }
        } else {
            self.prefetch_all_namespaces(cluster).await;
        }

        if let Some(all) = self.entries.get("") {
            let records = all
                .iter()
                .filter(|record| record.namespace == namespace)
                .cloned()
                .collect::<Vec<_>>();
            drop(self.entries.insert(namespace.to_string(), records.clone()));
            return Ok(records);
        }

        match fetch_endpoint_slices(cluster, namespace).await {
            Ok(records) => {
                drop(self.entries.insert(namespace.to_string(), records.clone()));
                Ok(records)
            }
            Err(err) if err.is_not_found() => {
                tracing::warn!("EndpointSlice API is not available, error: {err}");
                self.no_endpoint_slices_api = true;
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Tries once per cache to load every namespace in a single call.
    async fn prefetch_all_namespaces<C>(&mut self, cluster: &C)
    where
        C: Cluster,
    {
        if self.all_namespaces_attempted || self.entries.contains_key("") {
            return;
        }
        self.all_namespaces_attempted = true;

        match fetch_endpoint_slices(cluster, "").await {
            Ok(records) => drop(self.entries.insert(String::new(), records)),
            Err(err) => {
                tracing::debug!("Ignoring failed endpoint slice prefetch, error: {err}");
                self.all_namespaces_failed = true;
            }
        }
    }
}
