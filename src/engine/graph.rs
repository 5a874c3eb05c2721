//! The recipe graph
//!
//! Maps every known item to either [`Entry::Basic`] (a base ingredient) or
//! [`Entry::Composite`] (a recipe: ingredient name -> count per unit).
//!
//! Item names are always stored normalized (see [`normalize`]). The graph is
//! kept acyclic: every mutation checks for cycles before it is committed, and
//! a failed mutation leaves the graph exactly as it was.
//!
//! Crafting distance is the length of the longest chain from an item down to
//! a basic ingredient. It is the sort key for build orders: smaller distance
//! means the item has to be crafted earlier.

use std::collections::{BTreeMap, HashMap};

use super::define::{Cause, Definer, Definition};
use super::error::{Result, ShopError};
use super::name::normalize;

/// Ingredient name -> count needed for one unit of the crafted item
pub type Recipe = BTreeMap<String, u64>;

/// A graph entry for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Base ingredient, not craftable further
    Basic,
    /// Crafted from the listed ingredients
    Composite(Recipe),
}

impl Entry {
    /// The recipe of a composite item, `None` for basic ingredients
    pub fn recipe(&self) -> Option<&Recipe> {
        match self {
            Entry::Basic => None,
            Entry::Composite(recipe) => Some(recipe),
        }
    }

    pub fn is_basic(&self) -> bool {
        matches!(self, Entry::Basic)
    }
}

/// Node state for DFS traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Unprocessed,
    /// On the current DFS path
    Processing,
    Processed,
}

/// In-memory recipe database
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeGraph {
    entries: BTreeMap<String, Entry>,
}

impl RecipeGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from raw entries.
    ///
    /// Names are normalized; a later entry whose normalized name matches an
    /// earlier one replaces it. Fails on zero counts and on cycles.
    pub fn from_entries<S: AsRef<str>>(
        entries: impl IntoIterator<Item = (S, Entry)>,
    ) -> Result<Self> {
        let mut graph = Self::new();
        for (name, entry) in entries {
            let name = normalize(name.as_ref())?;
            let entry = normalize_entry(&name, entry)?;
            graph.entries.insert(name, entry);
        }

        if let Some(cycle) = graph.find_cycle() {
            return Err(ShopError::Cycle(cycle));
        }

        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if an item exists in the graph
    pub fn contains(&self, name: &str) -> bool {
        normalize(name)
            .map(|name| self.entries.contains_key(&name))
            .unwrap_or(false)
    }

    /// Look up an item's entry
    pub fn get(&self, name: &str) -> Option<&Entry> {
        let name = normalize(name).ok()?;
        self.entries.get(&name)
    }

    /// Look up an item's entry, failing with `NotFound`
    pub fn entry(&self, name: &str) -> Result<&Entry> {
        let name = normalize(name)?;
        self.entries.get(&name).ok_or(ShopError::NotFound(name))
    }

    /// Iterate over all items in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Insert or replace an entry directly, without asking anyone.
    ///
    /// Ingredients do not have to exist yet; expansion will ask for them.
    /// Returns the previous entry. A cycle is rejected and the graph left
    /// unchanged.
    pub fn insert(&mut self, name: &str, entry: Entry) -> Result<Option<Entry>> {
        let name = normalize(name)?;
        let entry = normalize_entry(&name, entry)?;

        let previous = self.entries.insert(name.clone(), entry);
        if let Some(cycle) = self.find_cycle() {
            match previous {
                Some(previous) => self.entries.insert(name, previous),
                None => self.entries.remove(&name),
            };
            return Err(ShopError::Cycle(cycle));
        }

        Ok(previous)
    }

    /// Raw access for sibling modules that already hold a normalized name
    pub(crate) fn lookup(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Crafting distance of an item: 0 for basic ingredients, otherwise one
    /// more than the largest distance among its direct ingredients.
    ///
    /// Never asks for definitions; unknown items are `NotFound`.
    pub fn distance(&self, name: &str) -> Result<u32> {
        let name = normalize(name)?;
        self.distance_memo(&name, &mut HashMap::new(), &mut Vec::new())
    }

    pub(crate) fn distance_memo(
        &self,
        name: &str,
        memo: &mut HashMap<String, u32>,
        path: &mut Vec<String>,
    ) -> Result<u32> {
        if let Some(distance) = memo.get(name) {
            return Ok(*distance);
        }
        if let Some(pos) = path.iter().position(|p| p == name) {
            return Err(cycle_from(&path[pos..], name));
        }

        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| ShopError::NotFound(name.to_string()))?;

        let distance = match entry {
            Entry::Basic => 0,
            Entry::Composite(recipe) => {
                if recipe.is_empty() {
                    return Err(ShopError::validation(format!(
                        "recipe for '{}' lists no ingredients",
                        name
                    )));
                }

                path.push(name.to_string());
                let mut deepest = 0;
                for ingredient in recipe.keys() {
                    deepest = deepest.max(self.distance_memo(ingredient, memo, path)?);
                }
                path.pop();
                deepest + 1
            }
        };

        memo.insert(name.to_string(), distance);
        Ok(distance)
    }

    /// Add a new recipe, asking `definer` what it is made of.
    ///
    /// Ingredients that are not in the graph yet are defined first, depth
    /// first, before the recipe itself is stored. The whole add is staged:
    /// if any nested definition fails nothing is inserted.
    pub fn add_recipe(&mut self, name: &str, definer: &mut dyn Definer) -> Result<()> {
        let name = normalize(name)?;
        if self.entries.contains_key(&name) {
            return Err(ShopError::AlreadyExists(name));
        }

        self.define_staged(&name, &Cause::Requested, definer, &mut Vec::new())
    }

    /// Run [`define_missing`](Self::define_missing) on a copy of the graph and
    /// swap it in only if the result is still acyclic.
    pub(crate) fn define_staged(
        &mut self,
        name: &str,
        cause: &Cause,
        definer: &mut dyn Definer,
        pending: &mut Vec<String>,
    ) -> Result<()> {
        let mut staged = self.clone();
        staged.define_missing(name, cause, definer, pending)?;
        if let Some(cycle) = staged.find_cycle() {
            return Err(ShopError::Cycle(cycle));
        }

        *self = staged;
        Ok(())
    }

    /// Ask for and store a definition of `name`, recursing into undefined
    /// ingredients. `pending` holds the names currently being defined.
    pub(crate) fn define_missing(
        &mut self,
        name: &str,
        cause: &Cause,
        definer: &mut dyn Definer,
        pending: &mut Vec<String>,
    ) -> Result<()> {
        pending.push(name.to_string());

        let entry = loop {
            let definition = definer.define(name, cause)?;
            let checked = check_definition(name, definition, pending).and_then(|entry| {
                match self.cycle_with(name, &entry) {
                    Some(cycle) => Err(ShopError::Cycle(cycle)),
                    None => Ok(entry),
                }
            });
            match checked {
                Ok(entry) => break entry,
                Err(e) if e.is_recoverable_input() => definer.reject(name, e)?,
                Err(e) => return Err(e),
            }
        };

        if let Entry::Composite(recipe) = &entry {
            let of = Cause::Ingredient { of: name.to_string() };
            for ingredient in recipe.keys() {
                if !self.entries.contains_key(ingredient) {
                    self.define_missing(ingredient, &of, definer, pending)?;
                }
            }
        }

        pending.pop();
        self.entries.insert(name.to_string(), entry);
        Ok(())
    }

    /// A cycle that `entry`, stored under the missing `name`, would close
    /// through recipes already in the graph
    fn cycle_with(&mut self, name: &str, entry: &Entry) -> Option<Vec<String>> {
        self.entries.insert(name.to_string(), entry.clone());
        let cycle = self.find_cycle();
        self.entries.remove(name);
        cycle
    }

    /// Rename an item and every reference to it.
    ///
    /// The renamed graph is built on the side and swapped in only once it is
    /// complete, so a failure leaves the graph untouched.
    pub fn rename_recipe(&mut self, old: &str, new: &str) -> Result<()> {
        let old = normalize(old)?;
        let new = normalize(new)?;

        if !self.entries.contains_key(&old) {
            return Err(ShopError::NotFound(old));
        }
        if old == new {
            return Ok(());
        }
        if self.entries.contains_key(&new) {
            return Err(ShopError::AlreadyExists(new));
        }

        let mut renamed = BTreeMap::new();
        for (name, entry) in &self.entries {
            let entry = match entry {
                Entry::Basic => Entry::Basic,
                Entry::Composite(recipe) => {
                    Entry::Composite(rename_ingredient(name, recipe, &old, &new)?)
                }
            };
            let key = if *name == old { new.clone() } else { name.clone() };
            renamed.insert(key, entry);
        }

        let staged = RecipeGraph { entries: renamed };
        if let Some(cycle) = staged.find_cycle() {
            return Err(ShopError::Cycle(cycle));
        }

        *self = staged;
        Ok(())
    }

    /// Deleting recipes is not supported.
    pub fn delete_recipe(&mut self, name: &str) -> Result<()> {
        let name = normalize(name)?;
        if !self.entries.contains_key(&name) {
            return Err(ShopError::NotFound(name));
        }
        Err(ShopError::Unsupported("delete"))
    }

    /// Find a cycle, if any, returned as the closed path `a -> ... -> a`.
    ///
    /// Iterative DFS; ingredients without an entry are treated as leaves.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut state: HashMap<&str, NodeState> = self
            .entries
            .keys()
            .map(|name| (name.as_str(), NodeState::Unprocessed))
            .collect();

        for start in self.entries.keys() {
            if state[start.as_str()] != NodeState::Unprocessed {
                continue;
            }

            // Stack holds (node_name, index_of_next_child_to_visit)
            let mut stack: Vec<(&str, usize)> = vec![(start.as_str(), 0)];
            state.insert(start.as_str(), NodeState::Processing);

            while let Some((node, child_idx)) = stack.pop() {
                let children: Vec<&str> = self
                    .entries
                    .get(node)
                    .and_then(Entry::recipe)
                    .map(|recipe| recipe.keys().map(String::as_str).collect())
                    .unwrap_or_default();

                let mut descended = false;
                for (i, &child) in children.iter().enumerate().skip(child_idx) {
                    match state.get(child).copied() {
                        Some(NodeState::Unprocessed) => {
                            stack.push((node, i + 1));
                            stack.push((child, 0));
                            state.insert(child, NodeState::Processing);
                            descended = true;
                            break;
                        }
                        Some(NodeState::Processing) => {
                            let mut path: Vec<&str> = stack.iter().map(|(n, _)| *n).collect();
                            path.push(node);
                            let pos = path.iter().position(|p| *p == child).unwrap_or(0);
                            let mut cycle: Vec<String> =
                                path[pos..].iter().map(|s| s.to_string()).collect();
                            cycle.push(child.to_string());
                            return Some(cycle);
                        }
                        // Processed, or dangling reference
                        _ => {}
                    }
                }

                if !descended {
                    state.insert(node, NodeState::Processed);
                }
            }
        }

        None
    }
}

/// Normalize ingredient names and check counts of one entry
fn normalize_entry(name: &str, entry: Entry) -> Result<Entry> {
    match entry {
        Entry::Basic => Ok(Entry::Basic),
        Entry::Composite(recipe) => {
            let mut normalized = Recipe::new();
            for (ingredient, count) in recipe {
                add_count(&mut normalized, name, normalize(&ingredient)?, count)?;
            }
            Ok(Entry::Composite(normalized))
        }
    }
}

/// Turn a definition into an entry, rejecting empty recipes, zero counts and
/// ingredients that are still being defined further up the chain.
fn check_definition(name: &str, definition: Definition, pending: &[String]) -> Result<Entry> {
    match definition {
        Definition::Basic => Ok(Entry::Basic),
        Definition::Composite(ingredients) => {
            if ingredients.is_empty() {
                return Err(ShopError::validation(format!(
                    "recipe for '{}' needs at least one ingredient",
                    name
                )));
            }

            let mut recipe = Recipe::new();
            for (ingredient, count) in ingredients {
                let ingredient = normalize(&ingredient)?;
                if let Some(pos) = pending.iter().position(|p| *p == ingredient) {
                    return Err(cycle_from(&pending[pos..], &ingredient));
                }
                add_count(&mut recipe, name, ingredient, count)?;
            }
            Ok(Entry::Composite(recipe))
        }
    }
}

/// Add `count` of `ingredient` to `recipe`, merging repeated ingredients
fn add_count(recipe: &mut Recipe, name: &str, ingredient: String, count: u64) -> Result<()> {
    if count == 0 {
        return Err(ShopError::validation(format!(
            "count of '{}' in '{}' must be a natural number",
            ingredient, name
        )));
    }

    let slot = recipe.entry(ingredient).or_insert(0);
    *slot = slot
        .checked_add(count)
        .ok_or_else(|| ShopError::validation(format!("ingredient count overflow in '{}'", name)))?;
    Ok(())
}

fn rename_ingredient(name: &str, recipe: &Recipe, old: &str, new: &str) -> Result<Recipe> {
    let mut renamed = Recipe::new();
    for (ingredient, count) in recipe {
        let key = if ingredient == old { new } else { ingredient.as_str() };
        add_count(&mut renamed, name, key.to_string(), *count)?;
    }
    Ok(renamed)
}

fn cycle_from(path: &[String], back_to: &str) -> ShopError {
    let mut cycle = path.to_vec();
    cycle.push(back_to.to_string());
    ShopError::Cycle(cycle)
}
