use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("Page not found: {0}")]
    NotFound(String),
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Retrieves the raw markup served at `url`.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// A node matched by a selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatedNode {
    /// Outer markup of the node, usable as input for nested lookups
    pub markup: String,
    /// Concatenated text content
    pub text: String,
}

impl LocatedNode {
    pub fn new(markup: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            text: text.into(),
        }
    }
}

pub trait MarkupLocator: Send + Sync {
    /// Returns every node of `markup` matching the CSS `selector`, in
    /// document order.
    fn select(&self, markup: &str, selector: &str) -> Vec<LocatedNode>;

    /// Text of the first match, trimmed.
    fn first_text(&self, markup: &str, selector: &str) -> Option<String> {
        self.select(markup, selector)
            .into_iter()
            .next()
            .map(|node| node.text.trim().to_string())
    }

    /// Trimmed text of every match.
    fn texts(&self, markup: &str, selector: &str) -> Vec<String> {
        self.select(markup, selector)
            .into_iter()
            .map(|node| node.text.trim().to_string())
            .collect()
    }
}
