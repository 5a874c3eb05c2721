//! Definitions for items the recipe graph does not know yet
//!
//! Expansion and `add` never talk to a human directly. Whenever they meet an
//! undefined item they ask a [`Definer`] for its [`Definition`]. The binary
//! plugs in the interactive [`Prompter`](super::prompt::Prompter); tests and
//! non-interactive callers use [`Scripted`] or [`Undefined`].

use std::collections::HashMap;

use super::error::{Result, ShopError};

/// What an item is made of, as answered by a [`Definer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    /// A base ingredient, not craftable further
    Basic,
    /// A crafted item: `(ingredient, count per unit)` pairs
    Composite(Vec<(String, u64)>),
}

impl Definition {
    /// Convenience constructor for composite definitions.
    pub fn composite<S: Into<String>>(ingredients: impl IntoIterator<Item = (S, u64)>) -> Self {
        Definition::Composite(
            ingredients
                .into_iter()
                .map(|(name, count)| (name.into(), count))
                .collect(),
        )
    }
}

/// Why the graph is asking for a definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    /// The item was named explicitly by `add`
    Requested,
    /// Expansion reached an item with no entry in the graph
    Undefined,
    /// The item is an ingredient of a recipe that is being defined
    Ingredient { of: String },
}

/// Resolve-or-define capability for missing items.
///
/// Calls block until an answer is available; there is no timeout.
pub trait Definer {
    /// Produce a definition for `name` (already normalized).
    fn define(&mut self, name: &str, cause: &Cause) -> Result<Definition>;

    /// Called when a definition returned by [`Definer::define`] is rejected
    /// (bad name, zero count, empty recipe, cycle). Returning `Ok(())` asks
    /// for the definition again; the default gives up with the error.
    fn reject(&mut self, _name: &str, error: ShopError) -> Result<()> {
        Err(error)
    }
}

impl<D: Definer + ?Sized> Definer for &mut D {
    fn define(&mut self, name: &str, cause: &Cause) -> Result<Definition> {
        (**self).define(name, cause)
    }

    fn reject(&mut self, name: &str, error: ShopError) -> Result<()> {
        (**self).reject(name, error)
    }
}

/// Refuses to define anything: undefined items are lookup failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct Undefined;

impl Definer for Undefined {
    fn define(&mut self, name: &str, _cause: &Cause) -> Result<Definition> {
        Err(ShopError::NotFound(name.to_string()))
    }
}

/// Answers from a fixed table of definitions, recording what was asked.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    definitions: HashMap<String, Definition>,
    asked: Vec<String>,
}

impl Scripted {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `name` as a basic ingredient.
    pub fn basic(mut self, name: &str) -> Self {
        self.definitions.insert(name.to_string(), Definition::Basic);
        self
    }

    /// Queue `name` as a composite item.
    pub fn composite(mut self, name: &str, ingredients: &[(&str, u64)]) -> Self {
        self.definitions.insert(
            name.to_string(),
            Definition::composite(ingredients.iter().copied()),
        );
        self
    }

    /// Names that were asked for, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Definer for Scripted {
    fn define(&mut self, name: &str, _cause: &Cause) -> Result<Definition> {
        self.asked.push(name.to_string());
        self.definitions
            .remove(name)
            .ok_or_else(|| ShopError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_reports_not_found() {
        let err = Undefined.define("iron", &Cause::Undefined).unwrap_err();
        assert!(matches!(err, ShopError::NotFound(name) if name == "iron"));
    }

    #[test]
    fn test_scripted_answers_once() {
        let mut definer = Scripted::new().basic("iron");
        assert_eq!(
            definer.define("iron", &Cause::Requested).unwrap(),
            Definition::Basic
        );
        assert!(definer.define("iron", &Cause::Requested).is_err());
        assert_eq!(definer.asked(), ["iron", "iron"]);
    }

    #[test]
    fn test_default_reject_propagates() {
        let mut definer = Scripted::new();
        let err = definer
            .reject("x", ShopError::Validation("bad".into()))
            .unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
    }
}
