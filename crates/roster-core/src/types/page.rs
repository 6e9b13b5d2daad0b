//! Paginated read results.

use serde::{Deserialize, Serialize};

/// One page of a paginated listing.
///
/// `next_token` is `None` on the last page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page, in backend order.
    pub items: Vec<T>,
    /// Token to request the following page.
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// A final page holding `items`.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }

    /// An empty final page.
    pub fn empty() -> Self {
        Self::last(Vec::new())
    }

    /// Returns `true` if another page follows.
    pub fn has_more(&self) -> bool {
        self.next_token.is_some()
    }
}
