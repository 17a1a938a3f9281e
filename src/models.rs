use anyhow::{ensure, Result};
use ratatui::{
    text::{Line, Span},
    widgets::{ListItem, ListState},
};

/// Sidebar list of selectable model identifiers.
///
/// The set is fixed at startup and the current choice is whatever the list
/// state points at, so `selected` can never name a model outside the set.
pub struct ModelList {
    pub items: Vec<ModelItem>,
    pub state: ListState,
}

#[derive(Debug)]
pub struct ModelItem {
    pub name: String,
}

impl ModelList {
    /// An empty model set leaves nothing to select and is a configuration
    /// error, fatal at startup.
    pub fn new<I, S>(models: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<ModelItem> = models
            .into_iter()
            .map(|name| ModelItem { name: name.into() })
            .collect();
        ensure!(!items.is_empty(), "No models configured");
        let mut state = ListState::default();
        state.select(Some(0));
        Ok(Self { items, state })
    }

    /// The currently chosen model identifier.
    pub fn selected(&self) -> &str {
        let index = self.state.selected().unwrap_or(0).min(self.items.len() - 1);
        &self.items[index].name
    }

    pub fn select_next(&mut self) {
        let index = self.state.selected().unwrap_or(0);
        self.state.select(Some((index + 1) % self.items.len()));
    }

    pub fn select_previous(&mut self) {
        let index = self.state.selected().unwrap_or(0);
        self.state
            .select(Some((index + self.items.len() - 1) % self.items.len()));
    }
}

impl From<&ModelItem> for ListItem<'_> {
    fn from(value: &ModelItem) -> Self {
        let line = Line::from(Span::raw(value.name.clone()));
        ListItem::new(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MODELS;

    #[test]
    fn empty_model_set_is_a_configuration_error() {
        assert!(ModelList::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn selection_starts_at_the_first_model() {
        let list = ModelList::new(MODELS).expect("non-empty model set");
        assert_eq!(list.selected(), MODELS[0]);
    }

    #[test]
    fn cycling_never_leaves_the_configured_set() {
        let mut list = ModelList::new(MODELS).expect("non-empty model set");
        for _ in 0..7 {
            list.select_next();
            assert!(MODELS.contains(&list.selected()));
        }
        for _ in 0..7 {
            list.select_previous();
            assert!(MODELS.contains(&list.selected()));
        }
    }

    #[test]
    fn next_and_previous_wrap_around() {
        let mut list = ModelList::new(["a", "b"]).expect("non-empty model set");
        list.select_previous();
        assert_eq!(list.selected(), "b");
        list.select_next();
        assert_eq!(list.selected(), "a");
    }
}
