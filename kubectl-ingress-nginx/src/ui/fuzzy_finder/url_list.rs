use std::{borrow::Cow, sync::Arc};

use ingress_nginx_base::DEFAULT_MENU_PROMPT;
use skim::{
    Skim, SkimItem, SkimItemReceiver, SkimItemSender,
    prelude::{SkimOptionsBuilder, unbounded},
};

pub trait UrlListExt {
    fn items(&self) -> Vec<Arc<dyn SkimItem>>;

    /// Lets the user pick one URL. `None` when nothing was chosen.
    fn select_url(&self) -> Option<String> {
        let items = self.items();
        if items.is_empty() {
            return None;
        }

        let (tx_item, rx_item): (SkimItemSender, SkimItemReceiver) = unbounded();
        for item in items {
            drop(tx_item.send(vec![item]));
        }
        drop(tx_item);

        let options = match SkimOptionsBuilder::default()
            .height("40%".to_string())
            .prompt(DEFAULT_MENU_PROMPT.to_string())
            .multi(false)
            .build()
        {
            Ok(options) => options,
            Err(err) => {
                tracing::warn!("Failed to build fuzzy finder options, error: {err}");
                return None;
            }
        };

        let out = Skim::run_with(options, Some(rx_item)).ok()?;
        if out.is_abort {
            return None;
        }
        out.selected_items
            .first()
            .map(|item| item.output().trim().to_string())
            .filter(|url| !url.is_empty())
    }
}

impl UrlListExt for [String] {
    fn items(&self) -> Vec<Arc<dyn SkimItem>> {
        self.iter().map(|url| Arc::new(UrlSkimItem::from(url.clone())) as Arc<dyn SkimItem>).collect()
    }
}

pub struct UrlSkimItem(String);

impl From<String> for UrlSkimItem {
    fn from(value: String) -> Self { Self(value) }
}

impl SkimItem for UrlSkimItem {
    fn text(&self) -> Cow<'_, str> { Cow::Borrowed(&self.0) }

    fn output(&self) -> Cow<'_, str> { Cow::Borrowed(&self.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_keep_urls() {
        let urls = vec!["https://shop.example.com/".to_string(), "http://a.example.com/x".to_string()];
        let items = urls.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].output(), "http://a.example.com/x");
    }

    #[test]
    fn test_nothing_to_select() {
        let urls: Vec<String> = Vec::new();
        assert_eq!(urls.select_url(), None);
    }
}
