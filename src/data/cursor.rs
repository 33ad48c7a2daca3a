//! Pagination position within the location-area catalog

use super::LocationAreaPage;

/// Where the session sits in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    NoPageLoaded,
    OnFirstPage,
    OnMiddlePage,
    OnLastPage,
}

/// Edge of the catalog reached by a navigation command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    FirstPage,
    LastPage,
}

/// Next/previous links of the most recently loaded catalog page
///
/// Links are only ever copied from a decoded page, never built locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    next: Option<String>,
    previous: Option<String>,
    loaded: bool,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_url(&self) -> Option<&str> {
        self.next.as_deref()
    }

    pub fn previous_url(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Whether any page has been loaded yet
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replaces both links with those of `page`
    pub fn update(&mut self, page: &LocationAreaPage) {
        self.next = page.next.clone();
        self.previous = page.previous.clone();
        self.loaded = true;
    }

    pub fn state(&self) -> PageState {
        if !self.loaded {
            return PageState::NoPageLoaded;
        }
        match (&self.previous, &self.next) {
            (None, _) => PageState::OnFirstPage,
            (Some(_), Some(_)) => PageState::OnMiddlePage,
            (Some(_), None) => PageState::OnLastPage,
        }
    }
}
