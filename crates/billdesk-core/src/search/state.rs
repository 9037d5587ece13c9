//! Search box and suggestion list state.

use serde::Serialize;

use crate::catalog::CatalogItem;
use crate::search::filter;

/// What the operator sees while searching.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SearchState {
    /// Current search box text.
    pub query: String,
    /// Suggestions for the current query.
    pub candidates: Vec<CatalogItem>,
    /// Whether the suggestion list is shown.
    pub visible: bool,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// React to typed text.
    ///
    /// The list is shown whenever the text is non-blank, even with no
    /// matches; blank text clears the candidates and hides it.
    pub fn input(&mut self, query: impl Into<String>, catalog: &[CatalogItem]) {
        self.query = query.into();
        if self.query.trim().is_empty() {
            self.candidates.clear();
            self.visible = false;
        } else {
            self.candidates = filter::filter(&self.query, catalog);
            self.visible = true;
        }
    }

    /// The search box gained focus.
    pub fn focus(&mut self) {
        self.visible = true;
    }

    /// The search box lost focus.
    pub fn blur(&mut self) {
        self.visible = false;
    }

    /// Show `text` in the box after a pick, with no suggestions open.
    pub fn set_placeholder(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.candidates.clear();
        self.visible = false;
    }

    /// Reset to an empty box.
    pub fn clear(&mut self) {
        self.set_placeholder(String::new());
    }

    /// Candidate at a position in the suggestion list.
    pub fn candidate(&self, index: usize) -> Option<&CatalogItem> {
        self.candidates.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};

    fn catalog() -> Vec<CatalogItem> {
        vec![CatalogItem::new("1", "Widget", "M", Money::new(250, Currency::USD))]
    }

    #[test]
    fn test_visible_without_matches() {
        let mut search = SearchState::new();
        search.input("zzz", &catalog());
        assert!(search.visible);
        assert!(search.candidates.is_empty());
    }

    #[test]
    fn test_blank_hides() {
        let mut search = SearchState::new();
        search.input("wid", &catalog());
        assert_eq!(search.candidates.len(), 1);

        search.input(" ", &catalog());
        assert!(!search.visible);
        assert!(search.candidates.is_empty());
    }

    #[test]
    fn test_focus_and_blur() {
        let mut search = SearchState::new();
        search.focus();
        assert!(search.visible);
        search.blur();
        assert!(!search.visible);
    }

    #[test]
    fn test_placeholder_closes_list() {
        let mut search = SearchState::new();
        search.input("wid", &catalog());
        search.set_placeholder("Widget");
        assert_eq!(search.query, "Widget");
        assert!(search.candidates.is_empty());
        assert!(!search.visible);
    }
}
