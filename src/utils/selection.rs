use super::catalog::{Model, ModelCatalog};

/// Catalog, search filter, and multi-selection state for the model dropdown.
///
/// The filtered view is a derived subset of the catalog and never touches the
/// selection; select-all and clear-all are scoped to whatever the filter
/// currently shows. The selection keeps insertion order and is only ever
/// mutated by the explicit operations below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelSelector {
    catalog: ModelCatalog,
    search_term: String,
    filtered: Vec<String>,
    selected: Vec<String>,
}

impl ModelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Model identifiers currently visible under the active search term,
    /// in catalog order.
    pub fn visible(&self) -> &[String] {
        &self.filtered
    }

    /// Selected identifiers in the order they were chosen.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, model_id: &str) -> bool {
        self.selected.iter().any(|id| id == model_id)
    }

    /// Replace the catalog wholesale and reset the filtered view to the full
    /// catalog. The selection is deliberately left alone: an id that vanished
    /// from the new catalog keeps its slot and renders as a raw identifier.
    pub fn replace_catalog(&mut self, models: Vec<Model>) {
        self.catalog = ModelCatalog::new(models);
        self.search_term.clear();
        self.filtered = self.catalog.matching("");
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.filtered = self.catalog.matching(term);
    }

    /// Idempotent add/remove; a no-op when the id is already in the
    /// requested state.
    pub fn toggle(&mut self, model_id: &str, on: bool) {
        let position = self.selected.iter().position(|id| id == model_id);
        match (position, on) {
            (None, true) => self.selected.push(model_id.to_string()),
            (Some(index), false) => {
                self.selected.remove(index);
            }
            _ => {}
        }
    }

    /// User-initiated removal of a single chip.
    pub fn remove(&mut self, model_id: &str) {
        self.toggle(model_id, false);
    }

    /// Add every identifier in the filtered view to the selection. Ids
    /// outside the view are untouched.
    pub fn select_all_visible(&mut self) {
        for model_id in self.filtered.clone() {
            self.toggle(&model_id, true);
        }
    }

    /// Remove every identifier in the filtered view from the selection. Ids
    /// outside the view are untouched.
    pub fn clear_all_visible(&mut self) {
        for model_id in self.filtered.clone() {
            self.toggle(&model_id, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> ModelSelector {
        let mut selector = ModelSelector::new();
        selector.replace_catalog(vec![
            Model::named("openai/gpt-4o", "GPT-4o"),
            Model::named("anthropic/claude-3-opus", "Claude 3 Opus"),
            Model::named("anthropic/claude-3-haiku", "Claude 3 Haiku"),
            Model::named("google/gemini-pro", "Gemini Pro"),
        ]);
        selector
    }

    #[test]
    fn test_replace_catalog_resets_view() {
        let mut selector = selector();
        selector.set_search_term("claude");
        assert_eq!(selector.visible().len(), 2);

        selector.replace_catalog(vec![Model::named("openai/gpt-4o", "GPT-4o")]);
        assert_eq!(selector.search_term(), "");
        assert_eq!(selector.visible(), ["openai/gpt-4o"]);
    }

    #[test]
    fn test_toggle_round_trip_is_idempotent() {
        let mut selector = selector();
        selector.toggle("openai/gpt-4o", true);
        let before = selector.selected().to_vec();

        selector.toggle("anthropic/claude-3-opus", true);
        selector.toggle("anthropic/claude-3-opus", false);
        assert_eq!(selector.selected(), before.as_slice());

        // Repeating the requested state changes nothing.
        selector.toggle("openai/gpt-4o", true);
        selector.toggle("google/gemini-pro", false);
        assert_eq!(selector.selected(), before.as_slice());
    }

    #[test]
    fn test_selection_preserves_insertion_order() {
        let mut selector = selector();
        selector.toggle("google/gemini-pro", true);
        selector.toggle("openai/gpt-4o", true);
        assert_eq!(selector.selected(), ["google/gemini-pro", "openai/gpt-4o"]);
    }

    #[test]
    fn test_select_all_visible_is_scoped_to_filter() {
        let mut selector = selector();
        selector.toggle("google/gemini-pro", true);

        selector.set_search_term("claude");
        selector.select_all_visible();

        assert_eq!(
            selector.selected(),
            [
                "google/gemini-pro",
                "anthropic/claude-3-opus",
                "anthropic/claude-3-haiku",
            ]
        );
    }

    #[test]
    fn test_clear_all_visible_leaves_outside_selection() {
        let mut selector = selector();
        selector.toggle("google/gemini-pro", true);
        selector.toggle("anthropic/claude-3-opus", true);

        selector.set_search_term("claude");
        selector.clear_all_visible();

        assert_eq!(selector.selected(), ["google/gemini-pro"]);
    }

    #[test]
    fn test_bulk_operations_on_empty_view_are_no_ops() {
        let mut selector = selector();
        selector.toggle("openai/gpt-4o", true);

        selector.set_search_term("no-such-model");
        assert!(selector.visible().is_empty());

        selector.select_all_visible();
        selector.clear_all_visible();
        assert_eq!(selector.selected(), ["openai/gpt-4o"]);
    }

    #[test]
    fn test_remove_matches_toggle_off() {
        let mut selector = selector();
        selector.toggle("openai/gpt-4o", true);
        selector.remove("openai/gpt-4o");
        assert!(selector.selected().is_empty());

        // Removing an unselected id is a no-op.
        selector.remove("openai/gpt-4o");
        assert!(selector.selected().is_empty());
    }

    #[test]
    fn test_selection_survives_catalog_reload() {
        let mut selector = selector();
        selector.toggle("anthropic/claude-3-opus", true);

        selector.replace_catalog(vec![Model::named("openai/gpt-4o", "GPT-4o")]);

        // Stale id stays selected and falls back to its raw identifier.
        assert_eq!(selector.selected(), ["anthropic/claude-3-opus"]);
        assert_eq!(
            selector.catalog().display_name_for("anthropic/claude-3-opus"),
            "anthropic/claude-3-opus"
        );
    }
}
