//! Ingress listing across `networking.k8s.io/v1` and `v1beta1`, and the rows
//! the commands display.

use std::collections::BTreeSet;

use k8s_openapi::{
    api::networking::v1::{Ingress, IngressBackend},
    apimachinery::pkg::util::intstr::IntOrString,
};

use crate::request::{Cluster, Context, Error, legacy};

/// An ingress as served by whichever API version the cluster supports.
#[derive(Clone, Debug)]
pub enum IngressDefinition {
    V1(Box<Ingress>),
    V1beta1(Box<legacy::Ingress>),
}

impl From<Ingress> for IngressDefinition {
    fn from(ingress: Ingress) -> Self { Self::V1(Box::new(ingress)) }
}

impl From<legacy::Ingress> for IngressDefinition {
    fn from(ingress: legacy::Ingress) -> Self { Self::V1beta1(Box::new(ingress)) }
}

/// One host and path of an ingress.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngressRow {
    pub namespace: String,
    pub ingress_name: String,
    pub host: String,
    pub path: String,
    pub tls: bool,
    pub service_name: String,
    pub service_port: String,
    /// Load balancer IPs and hostnames, comma separated.
    pub address: String,
}

impl IngressRow {
    /// URL of the row, or `None` for rows without a host.
    pub fn url(&self) -> Option<String> {
        if self.host.is_empty() {
            return None;
        }
        let scheme = if self.tls { "https" } else { "http" };
        Some(format!("{scheme}://{}{}", self.host, self.path))
    }
}

#[derive(Clone, Debug, Default)]
struct Backend {
    service_name: String,
    service_port: String,
}

impl Backend {
    /// `name:port`, the form a default backend is shown in.
    fn joined(&self) -> String { format!("{}:{}", self.service_name, self.service_port) }
}

impl From<&IngressBackend> for Backend {
    fn from(backend: &IngressBackend) -> Self {
        let Some(service) = backend.service.as_ref() else {
            return Self::default();
        };
        let service_port = service
            .port
            .as_ref()
            .and_then(|port| {
                port.number.map(|number| number.to_string()).or_else(|| port.name.clone())
            })
            .unwrap_or_default();
        Self { service_name: service.name.clone(), service_port }
    }
}

impl From<&legacy::IngressBackend> for Backend {
    fn from(backend: &legacy::IngressBackend) -> Self {
        let service_port = match &backend.service_port {
            Some(IntOrString::Int(number)) => number.to_string(),
            Some(IntOrString::String(name)) => name.clone(),
            None => String::new(),
        };
        Self { service_name: backend.service_name.clone().unwrap_or_default(), service_port }
    }
}

struct Rule {
    host: String,
    /// `None` for a rule without an `http` section.
    paths: Option<Vec<(String, Backend)>>,
}

/// The fields rows are built from, shared by both API versions.
struct Normalized {
    namespace: String,
    name: String,
    address: String,
    tls_hosts: BTreeSet<String>,
    default_backend: Option<Backend>,
    rules: Vec<Rule>,
}

impl From<&Ingress> for Normalized {
    fn from(ingress: &Ingress) -> Self {
        let spec = ingress.spec.clone().unwrap_or_default();
        let addresses = ingress
            .status
            .iter()
            .filter_map(|status| status.load_balancer.as_ref())
            .filter_map(|load_balancer| load_balancer.ingress.as_ref())
            .flatten()
            .flat_map(|ingress| [ingress.ip.clone(), ingress.hostname.clone()])
            .flatten()
            .filter(|address| !address.is_empty())
            .collect::<Vec<_>>();

        Self {
            namespace: ingress.metadata.namespace.clone().unwrap_or_default(),
            name: ingress.metadata.name.clone().unwrap_or_default(),
            address: addresses.join(","),
            tls_hosts: spec
                .tls
                .iter()
                .flatten()
                .filter_map(|tls| tls.hosts.clone())
                .flatten()
                .collect(),
            default_backend: spec.default_backend.as_ref().map(Backend::from),
            rules: spec
                .rules
                .iter()
                .flatten()
                .map(|rule| Rule {
                    host: rule.host.clone().unwrap_or_default(),
                    paths: rule.http.as_ref().map(|http| {
                        http.paths
                            .iter()
                            .map(|path| {
                                (path.path.clone().unwrap_or_default(), Backend::from(&path.backend))
                            })
                            .collect()
                    }),
                })
                .collect(),
        }
    }
}

impl From<&legacy::Ingress> for Normalized {
    fn from(ingress: &legacy::Ingress) -> Self {
        let addresses = ingress
            .status
            .load_balancer
            .ingress
            .iter()
            .flat_map(|ingress| [ingress.ip.clone(), ingress.hostname.clone()])
            .flatten()
            .filter(|address| !address.is_empty())
            .collect::<Vec<_>>();

        Self {
            namespace: ingress.metadata.namespace.clone().unwrap_or_default(),
            name: ingress.metadata.name.clone().unwrap_or_default(),
            address: addresses.join(","),
            tls_hosts: ingress.spec.tls.iter().flat_map(|tls| tls.hosts.clone()).collect(),
            default_backend: ingress.spec.backend.as_ref().map(Backend::from),
            rules: ingress
                .spec
                .rules
                .iter()
                .map(|rule| Rule {
                    host: rule.host.clone().unwrap_or_default(),
                    paths: rule.http.as_ref().map(|http| {
                        http.paths
                            .iter()
                            .map(|path| {
                                (path.path.clone().unwrap_or_default(), Backend::from(&path.backend))
                            })
                            .collect()
                    }),
                })
                .collect(),
        }
    }
}

impl Normalized {
    fn rows(&self) -> Vec<IngressRow> {
        let row = |host: String, path: String, service_name: String, service_port: String| {
            IngressRow {
                namespace: self.namespace.clone(),
                ingress_name: self.name.clone(),
                tls: self.tls_hosts.contains(&host),
                host,
                path,
                service_name,
                service_port,
                address: self.address.clone(),
            }
        };
        let default_service =
            self.default_backend.as_ref().map(Backend::joined).unwrap_or_default();

        // catch-all ingress
        if self.rules.is_empty() && !default_service.is_empty() {
            return vec![row("*".to_string(), String::new(), default_service, String::new())];
        }

        let mut rows = Vec::new();
        for rule in &self.rules {
            match &rule.paths {
                None => rows.push(row(
                    rule.host.clone(),
                    String::new(),
                    default_service.clone(),
                    String::new(),
                )),
                Some(paths) => rows.extend(paths.iter().map(|(path, backend)| {
                    row(
                        rule.host.clone(),
                        path.clone(),
                        backend.service_name.clone(),
                        backend.service_port.clone(),
                    )
                })),
            }
        }
        rows
    }
}

impl IngressDefinition {
    /// Flattens the ingress into one row per host and path.
    pub fn rows(&self) -> Vec<IngressRow> {
        match self {
            Self::V1(ingress) => Normalized::from(ingress.as_ref()).rows(),
            Self::V1beta1(ingress) => Normalized::from(ingress.as_ref()).rows(),
        }
    }
}

impl<C> Context<C>
where
    C: Cluster,
{
    /// Lists ingresses, falling back to `v1beta1` when `v1` fails for any
    /// reason.
    ///
    /// # Errors
    ///
    /// Returns `Error::Api` with the `v1beta1` error when both versions fail.
    pub async fn list_ingresses(&self, namespace: &str) -> Result<Vec<IngressDefinition>, Error> {
        match self.cluster.list_ingresses(namespace).await {
            Ok(ingresses) => Ok(ingresses.into_iter().map(IngressDefinition::from).collect()),
            Err(err) => {
                tracing::debug!("Falling back to networking.k8s.io/v1beta1, error: {err}");
                let ingresses = self.cluster.list_legacy_ingresses(namespace).await?;
                Ok(ingresses.into_iter().map(IngressDefinition::from).collect())
            }
        }
    }

    /// Rows of every ingress in the resolved namespace.
    ///
    /// # Errors
    ///
    /// Returns `Error::Api` when ingresses cannot be listed.
    pub async fn ingress_rows(&self) -> Result<Vec<IngressRow>, Error> {
        let ingresses = self.list_ingresses(&self.namespace()).await?;
        Ok(ingresses.iter().flat_map(IngressDefinition::rows).collect())
    }
}
