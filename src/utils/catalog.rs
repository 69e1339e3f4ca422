use serde::Deserialize;

/// A model as reported by the gateway's listing endpoint. Everything beyond
/// the identifier and display name is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Model {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Model {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }

    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }

    pub fn provider_label(&self) -> &'static str {
        provider_label(&self.id)
    }
}

/// Cosmetic provider inference from identifier substrings. Not authoritative.
pub fn provider_label(model_id: &str) -> &'static str {
    if model_id.contains("gpt") {
        "OpenAI"
    } else if model_id.contains("claude") {
        "Anthropic"
    } else if model_id.contains("gemini") {
        "Google"
    } else if model_id.contains("llama") {
        "Meta"
    } else if model_id.contains("mistral") {
        "Mistral"
    } else if model_id.contains("cohere") {
        "Cohere"
    } else {
        "Various"
    }
}

/// The list of models currently offered by the gateway, in listing order.
/// Replaced wholesale on every successful fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelCatalog {
    models: Vec<Model>,
}

impl ModelCatalog {
    pub fn new(models: Vec<Model>) -> Self {
        Self { models }
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Model> {
        self.models.iter()
    }

    pub fn get(&self, model_id: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.id == model_id)
    }

    /// Display name for an identifier, falling back to the raw identifier
    /// when the model is no longer in the catalog (stale selection).
    pub fn display_name_for<'a>(&'a self, model_id: &'a str) -> &'a str {
        self.get(model_id)
            .map(Model::display_name)
            .unwrap_or(model_id)
    }

    /// Identifiers matching `term` case-insensitively against the id, the
    /// display name, or the derived provider label, in catalog order. A
    /// blank term matches everything.
    pub fn matching(&self, term: &str) -> Vec<String> {
        if term.trim().is_empty() {
            return self.models.iter().map(|m| m.id.clone()).collect();
        }

        let term = term.to_lowercase();
        self.models
            .iter()
            .filter(|m| {
                m.id.to_lowercase().contains(&term)
                    || m.display_name().to_lowercase().contains(&term)
                    || m.provider_label().to_lowercase().contains(&term)
            })
            .map(|m| m.id.clone())
            .collect()
    }
}
