use crate::errors::IoError;
use indexmap::IndexMap;
use miette::Diagnostic;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum TemplateError {
    #[error("I/O error within template domain")]
    #[diagnostic(code(modgen::template::io))]
    Io(#[from] IoError),
}

/// Where template blobs come from. A key with no blob is `Ok(None)`, not an error.
pub trait TemplateStore {
    fn load(&self, key: &str) -> Result<Option<String>, TemplateError>;
}
impl TemplateStore for IndexMap<String, String> {
    fn load(&self, key: &str) -> Result<Option<String>, TemplateError> {
        Ok(self.get(key).cloned())
    }
}

/// The two literal tokens stubs are written with.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Placeholders {
    /// Replaced with the name exactly as given (class names, namespaces).
    pub raw: String,
    /// Replaced with the lowercased name (file names, config keys).
    pub slug: String,
}
impl Default for Placeholders {
    fn default() -> Self {
        Self {
            raw: "YourName".to_string(),
            slug: "your_name".to_string(),
        }
    }
}
impl Placeholders {
    pub fn for_name(&self, name: &str) -> Substitutions {
        Substitutions::none()
            .with(&self.raw, name)
            .with(&self.slug, &name.to_lowercase())
    }
}

/// An ordered set of literal `token -> value` replacements applied in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    pairs: Vec<(String, String)>,
}
impl Substitutions {
    /// No replacements: blobs are copied verbatim.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, token: &str, value: &str) -> Self {
        if !token.is_empty() {
            self.pairs.push((token.to_string(), value.to_string()));
        }
        self
    }

    /// Replaces every token occurrence in `text`.
    ///
    /// The input is scanned once, left to right, and scanning resumes after
    /// each replaced token, so text introduced by a replacement is never
    /// matched again. When two tokens start at the same position the longer
    /// one wins.
    pub fn apply(&self, text: &str) -> String {
        if self.pairs.is_empty() {
            return text.to_string();
        }

        let matcher = self.matcher();

        matcher
            .replace_all(text, |caps: &regex::Captures| self.value_of(&caps[0]).to_string())
            .into_owned()
    }

    /// One alternation over every token, longest first, so that the
    /// leftmost-first match is also the longest at its position.
    fn matcher(&self) -> Regex {
        let mut tokens: Vec<&str> = self.pairs.iter().map(|(token, _)| token.as_str()).collect();
        tokens.sort_by(|a, b| b.len().cmp(&a.len()));

        let pattern = tokens
            .into_iter()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");

        Regex::new(&pattern).expect("escaped literals form a valid pattern")
    }

    fn value_of<'s>(&'s self, token: &'s str) -> &'s str {
        self.pairs
            .iter()
            .find(|(candidate, _)| candidate == token)
            .map_or(token, |(_, value)| value.as_str())
    }
}

/// Loads blobs from a [`TemplateStore`] and applies [`Substitutions`] to them.
pub struct Renderer<'a> {
    store: &'a dyn TemplateStore,
}
impl<'a> Renderer<'a> {
    pub fn new(store: &'a dyn TemplateStore) -> Self {
        Self { store }
    }

    /// Renders the blob stored under `key`, or returns `None` when there is none.
    pub fn render(
        &self,
        key: &str,
        substitutions: &Substitutions,
    ) -> Result<Option<String>, TemplateError> {
        let Some(blob) = self.store.load(key)? else {
            log::debug!("no template for key '{}'", key);
            return Ok(None);
        };

        Ok(Some(substitutions.apply(&blob)))
    }
}
