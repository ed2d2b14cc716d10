//! Renders ingress rows with their endpoint counts as a table.

use comfy_table::{Cell, ContentArrangement};

use crate::request::IngressRow;

/// An ingress row with the number of endpoints behind its service, `None`
/// when there is no endpoint data for it.
#[derive(Clone, Debug)]
pub struct IngressListing {
    pub row: IngressRow,
    pub endpoints: Option<usize>,
}

pub trait IngressListingExt {
    /// Renders the listing, with a leading `NAMESPACE` column when
    /// `show_namespace` is set.
    fn render_table(&self, show_namespace: bool) -> String;
}

impl IngressListingExt for [IngressListing] {
    fn render_table(&self, show_namespace: bool) -> String {
        let mut header = vec![
            "INGRESS NAME",
            "HOST+PATH",
            "ADDRESSES",
            "TLS",
            "SERVICE",
            "SERVICE PORT",
            "ENDPOINTS",
        ];
        if show_namespace {
            header.insert(0, "NAMESPACE");
        }

        let rows = self
            .iter()
            .map(|listing| {
                let IngressListing { row, endpoints } = listing;
                let mut cells = vec![
                    Cell::new(&row.ingress_name),
                    Cell::new(format!("{}{}", row.host, row.path)),
                    Cell::new(&row.address),
                    Cell::new(if row.tls { "YES" } else { "NO" }),
                    Cell::new(&row.service_name),
                    Cell::new(&row.service_port),
                    Cell::new(endpoints.map_or_else(|| "?".to_string(), |n| n.to_string())),
                ];
                if show_namespace {
                    cells.insert(0, Cell::new(&row.namespace));
                }
                cells
            })
            .collect::<Vec<_>>();

        comfy_table::Table::new()
            .load_preset(comfy_table::presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Disabled)
            .set_header(header)
            .add_rows(rows)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<IngressListing> {
        vec![
            IngressListing {
                row: IngressRow {
                    namespace: "team-a".to_string(),
                    ingress_name: "shop".to_string(),
                    host: "shop.example.com".to_string(),
                    path: "/cart".to_string(),
                    tls: true,
                    service_name: "cart".to_string(),
                    service_port: "8080".to_string(),
                    address: "203.0.113.7".to_string(),
                },
                endpoints: Some(3),
            },
            IngressListing {
                row: IngressRow {
                    namespace: "team-b".to_string(),
                    ingress_name: "fallback".to_string(),
                    host: "*".to_string(),
                    service_name: "default-http:80".to_string(),
                    ..IngressRow::default()
                },
                endpoints: None,
            },
        ]
    }

    #[test]
    fn test_render_table() {
        let table = listing().render_table(false);
        let lines = table.lines().map(str::trim).collect::<Vec<_>>();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("INGRESS NAME"));
        assert!(lines[0].ends_with("ENDPOINTS"));
        assert!(!table.contains("NAMESPACE"));

        let cells = lines[1].split_whitespace().collect::<Vec<_>>();
        assert_eq!(cells, vec!["shop", "shop.example.com/cart", "203.0.113.7", "YES", "cart", "8080", "3"]);
        assert!(lines[2].starts_with("fallback"));
        assert!(lines[2].contains("NO"));
        assert!(lines[2].ends_with('?'));
    }

    #[test]
    fn test_render_table_with_namespace() {
        let table = listing().render_table(true);
        let lines = table.lines().map(str::trim).collect::<Vec<_>>();
        assert!(lines[0].starts_with("NAMESPACE"));
        assert!(lines[1].starts_with("team-a"));
        assert!(lines[2].starts_with("team-b"));
    }
}
