pub mod k8s {
    pub mod labels {
        /// Label carried by every `EndpointSlice` naming the `Service` it
        /// belongs to.
        pub const SERVICE_NAME: &str = "kubernetes.io/service-name";
    }

    pub mod kinds {
        pub const REPLICA_SET: &str = "ReplicaSet";
    }
}

pub const DEFAULT_DEPLOYMENT_NAME: &str = "ingress-nginx-controller";
pub const DEFAULT_SERVICE_NAME: &str = "ingress-nginx-controller";
pub const DEFAULT_CONTAINER_NAME: &str = "controller";

/// Setting this variable to any non-empty value disables the interactive URL
/// picker of the `browser` subcommand.
pub const ENV_IGNORE_FZF: &str = "INGRESS_IGNORE_FZF";

/// Command run inside the controller container to dump the certificate
/// served for a host.
pub const DBG_CERTS_GET: [&str; 3] = ["/dbg", "certs", "get"];
