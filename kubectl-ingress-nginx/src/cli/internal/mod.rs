//! Pieces shared by the subcommands: reaching the cluster and choosing the
//! pod a command runs in.

mod client;
mod pod_target;

pub use self::{client::connect, pod_target::PodTargetArgs};
