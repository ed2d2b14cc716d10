use k8s_openapi::api::core::v1::Service;

pub trait ServiceExt {
    fn cluster_ip(&self) -> &str;

    /// IPs and hostnames assigned by the load balancer, in status order.
    fn load_balancer_addresses(&self) -> Vec<String>;
}

impl ServiceExt for Service {
    fn cluster_ip(&self) -> &str {
        self.spec.as_ref().and_then(|spec| spec.cluster_ip.as_deref()).unwrap_or_default()
    }

    fn load_balancer_addresses(&self) -> Vec<String> {
        self.status
            .iter()
            .filter_map(|status| status.load_balancer.as_ref())
            .filter_map(|load_balancer| load_balancer.ingress.as_ref())
            .flatten()
            .flat_map(|ingress| [ingress.ip.clone(), ingress.hostname.clone()])
            .flatten()
            .collect()
    }
}
