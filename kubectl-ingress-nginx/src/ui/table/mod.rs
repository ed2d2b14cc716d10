//! Tabular output of the listing commands.

mod ingress_row_ext;

pub use self::ingress_row_ext::{IngressListing, IngressListingExt};
