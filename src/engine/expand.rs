//! Ingredient expansion and build ordering
//!
//! Expanding an item walks its recipe tree, scaling each ingredient's count
//! by the quantity of its parent, and sums contributions that end at the same
//! name. Items missing from the graph are defined on the spot through the
//! caller's [`Definer`], which may block on a human.

use std::collections::{BTreeMap, HashMap};

use super::define::{Cause, Definer};
use super::error::{Result, ShopError};
use super::graph::{Entry, RecipeGraph};
use super::name::normalize;

/// Item name -> total count
pub type ShoppingList = BTreeMap<String, u64>;

/// Items to craft with their counts, prerequisites first
pub type BuildOrder = Vec<(String, u64)>;

/// Which visited items an expansion keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Only basic ingredients (the shopping list)
    BasicOnly,
    /// Every item below the target, intermediates included
    All,
}

impl RecipeGraph {
    /// Expand `quantity` units of `item` into the items needed to make it.
    ///
    /// A basic item expands to itself. A composite item expands to its
    /// ingredients (the item itself is not listed). With
    /// [`Expansion::BasicOnly`] intermediate composites are left out.
    pub fn expand(
        &mut self,
        item: &str,
        quantity: u64,
        mode: Expansion,
        definer: &mut dyn Definer,
    ) -> Result<ShoppingList> {
        check_quantity(quantity)?;
        let item = normalize(item)?;

        let mut list = ShoppingList::new();
        self.accumulate(&item, quantity, mode, true, definer, &mut Vec::new(), &mut list)?;
        Ok(list)
    }

    /// Basic ingredients needed for `quantity` units of `item`
    pub fn shopping_list(
        &mut self,
        item: &str,
        quantity: u64,
        definer: &mut dyn Definer,
    ) -> Result<ShoppingList> {
        self.expand(item, quantity, Expansion::BasicOnly, definer)
    }

    /// The crafting steps for `quantity` units of `item`: every composite
    /// item in its tree plus the item itself, sorted by crafting distance.
    ///
    /// Ties keep name order.
    pub fn build_order(
        &mut self,
        item: &str,
        quantity: u64,
        definer: &mut dyn Definer,
    ) -> Result<BuildOrder> {
        let item = normalize(item)?;
        let expanded = self.expand(&item, quantity, Expansion::All, definer)?;

        let mut steps: BuildOrder = expanded
            .into_iter()
            .filter(|(name, _)| matches!(self.lookup(name), Some(Entry::Composite(_))))
            .collect();
        steps.push((item, quantity));

        self.sort_by_distance(steps)
    }

    /// Stable sort of steps by ascending crafting distance
    pub fn sort_by_distance(&self, steps: BuildOrder) -> Result<BuildOrder> {
        let mut memo = HashMap::new();
        let mut keyed = Vec::with_capacity(steps.len());
        for (name, count) in steps {
            let distance = self.distance_memo(&name, &mut memo, &mut Vec::new())?;
            keyed.push((distance, name, count));
        }

        keyed.sort_by_key(|(distance, _, _)| *distance);
        Ok(keyed.into_iter().map(|(_, name, count)| (name, count)).collect())
    }

    #[allow(clippy::too_many_arguments)]
    fn accumulate(
        &mut self,
        item: &str,
        quantity: u64,
        mode: Expansion,
        is_target: bool,
        definer: &mut dyn Definer,
        path: &mut Vec<String>,
        list: &mut ShoppingList,
    ) -> Result<()> {
        if let Some(pos) = path.iter().position(|p| p == item) {
            let mut cycle = path[pos..].to_vec();
            cycle.push(item.to_string());
            return Err(ShopError::Cycle(cycle));
        }

        if self.lookup(item).is_none() {
            self.define_staged(item, &Cause::Undefined, definer, &mut path.clone())?;
        }

        let recipe = match self.lookup(item) {
            Some(Entry::Composite(recipe)) if recipe.is_empty() => {
                return Err(ShopError::validation(format!(
                    "recipe for '{}' lists no ingredients",
                    item
                )));
            }
            Some(Entry::Composite(recipe)) => recipe.clone(),
            Some(Entry::Basic) => return add_to(list, item, quantity),
            None => return Err(ShopError::NotFound(item.to_string())),
        };

        if !is_target && mode == Expansion::All {
            add_to(list, item, quantity)?;
        }

        path.push(item.to_string());
        for (ingredient, per_unit) in recipe {
            let needed = per_unit.checked_mul(quantity).ok_or_else(|| {
                ShopError::validation(format!("quantity of '{}' overflows", ingredient))
            })?;
            self.accumulate(&ingredient, needed, mode, false, definer, path, list)?;
        }
        path.pop();

        Ok(())
    }
}

/// Quantities are natural numbers
pub fn check_quantity(quantity: u64) -> Result<()> {
    if quantity == 0 {
        return Err(ShopError::validation("quantity must be a natural number"));
    }
    Ok(())
}

/// Add `count` to `name` in `list`, checking for overflow
pub(crate) fn add_to(list: &mut ShoppingList, name: &str, count: u64) -> Result<()> {
    let slot = list.entry(name.to_string()).or_insert(0);
    *slot = slot
        .checked_add(count)
        .ok_or_else(|| ShopError::validation(format!("total count of '{}' overflows", name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::define::{Scripted, Undefined};

    fn composite(ingredients: &[(&str, u64)]) -> Entry {
        Entry::Composite(
            ingredients
                .iter()
                .map(|(name, count)| (name.to_string(), *count))
                .collect(),
        )
    }

    fn sword_graph() -> RecipeGraph {
        RecipeGraph::from_entries([
            ("sword", composite(&[("blade", 1), ("handle", 1)])),
            ("blade", composite(&[("iron", 2)])),
            ("handle", composite(&[("wood", 1)])),
            ("iron", Entry::Basic),
            ("wood", Entry::Basic),
        ])
        .unwrap()
    }

    fn list(items: &[(&str, u64)]) -> ShoppingList {
        items.iter().map(|(n, c)| (n.to_string(), *c)).collect()
    }

    #[test]
    fn test_basic_expands_to_itself() {
        let mut graph = sword_graph();
        for n in [1, 7, 1000] {
            let expanded = graph.shopping_list("iron", n, &mut Undefined).unwrap();
            assert_eq!(expanded, list(&[("iron", n)]));
        }
    }

    #[test]
    fn test_sword_shopping_list() {
        let mut graph = sword_graph();
        let expanded = graph.shopping_list("sword", 2, &mut Undefined).unwrap();
        assert_eq!(expanded, list(&[("iron", 4), ("wood", 2)]));
    }

    #[test]
    fn test_expand_all_keeps_intermediates() {
        let mut graph = sword_graph();
        let expanded = graph
            .expand("sword", 3, Expansion::All, &mut Undefined)
            .unwrap();
        assert_eq!(
            expanded,
            list(&[("blade", 3), ("handle", 3), ("iron", 6), ("wood", 3)])
        );
    }

    #[test]
    fn test_shared_ingredients_sum() {
        let mut graph = sword_graph();
        graph
            .insert("shield", composite(&[("iron", 5), ("handle", 2)]))
            .unwrap();
        graph
            .insert("kit", composite(&[("sword", 1), ("shield", 1)]))
            .unwrap();

        let expanded = graph.shopping_list("kit", 1, &mut Undefined).unwrap();
        assert_eq!(expanded, list(&[("iron", 7), ("wood", 3)]));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut graph = sword_graph();
        assert!(matches!(
            graph.shopping_list("sword", 0, &mut Undefined),
            Err(ShopError::Validation(_))
        ));
    }

    #[test]
    fn test_overflow_rejected() {
        let mut graph = sword_graph();
        assert!(matches!(
            graph.shopping_list("sword", u64::MAX, &mut Undefined),
            Err(ShopError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_recipe_rejected() {
        let mut graph = sword_graph();
        graph.insert("nothing", Entry::Composite(Default::default())).unwrap();
        graph
            .insert("box", composite(&[("nothing", 1), ("wood", 2)]))
            .unwrap();

        for item in ["nothing", "box"] {
            let err = graph.shopping_list(item, 1, &mut Undefined).unwrap_err();
            assert!(matches!(err, ShopError::Validation(_)));
            assert!(err.to_string().contains("nothing"));
        }
        assert!(matches!(
            graph.build_order("box", 1, &mut Undefined),
            Err(ShopError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_item_is_defined() {
        let mut graph = sword_graph();
        let mut definer = Scripted::new()
            .composite("shield", &[("plank", 3), ("iron", 1)])
            .basic("plank");

        let expanded = graph.shopping_list("Shield", 2, &mut definer).unwrap();

        assert_eq!(expanded, list(&[("iron", 2), ("plank", 6)]));
        assert_eq!(definer.asked(), ["shield", "plank"]);
        assert!(graph.contains("shield"));
        assert!(graph.contains("plank"));
    }

    #[test]
    fn test_dangling_ingredient_is_defined() {
        let mut graph = RecipeGraph::new();
        graph.insert("bread", composite(&[("flour", 2)])).unwrap();
        let mut definer = Scripted::new().basic("flour");

        let expanded = graph.shopping_list("bread", 1, &mut definer).unwrap();
        assert_eq!(expanded, list(&[("flour", 2)]));
        assert_eq!(graph.get("flour"), Some(&Entry::Basic));
    }

    #[test]
    fn test_missing_item_without_definer_fails() {
        let mut graph = sword_graph();
        let before = graph.clone();
        assert!(matches!(
            graph.shopping_list("shield", 1, &mut Undefined),
            Err(ShopError::NotFound(name)) if name == "shield"
        ));
        assert_eq!(graph, before);
    }

    #[test]
    fn test_sword_build_order() {
        let mut graph = sword_graph();
        let order = graph.build_order("sword", 1, &mut Undefined).unwrap();
        assert_eq!(
            order,
            vec![
                ("blade".to_string(), 1),
                ("handle".to_string(), 1),
                ("sword".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_build_order_scales_counts() {
        let mut graph = sword_graph();
        let order = graph.build_order("sword", 4, &mut Undefined).unwrap();
        assert_eq!(
            order,
            vec![
                ("blade".to_string(), 4),
                ("handle".to_string(), 4),
                ("sword".to_string(), 4),
            ]
        );
    }

    #[test]
    fn test_build_order_of_basic_item() {
        let mut graph = sword_graph();
        let order = graph.build_order("wood", 3, &mut Undefined).unwrap();
        assert_eq!(order, vec![("wood".to_string(), 3)]);
    }

    #[test]
    fn test_build_order_respects_distance() {
        let mut graph = sword_graph();
        graph
            .insert("ingot", composite(&[("iron", 1)]))
            .unwrap();
        graph
            .insert("armor", composite(&[("ingot", 4), ("sword", 1), ("handle", 1)]))
            .unwrap();

        let order = graph.build_order("armor", 1, &mut Undefined).unwrap();
        let distances: Vec<u32> = order
            .iter()
            .map(|(name, _)| graph.distance(name).unwrap())
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(order.last().unwrap().0, "armor");
        let handle = order.iter().find(|(n, _)| n == "handle").unwrap();
        assert_eq!(handle.1, 2);
    }

    #[test]
    fn test_repeated_calls_identical() {
        let mut graph = sword_graph();
        let first = graph.build_order("sword", 2, &mut Undefined).unwrap();
        let second = graph.build_order("sword", 2, &mut Undefined).unwrap();
        assert_eq!(first, second);

        let first = graph.shopping_list("sword", 2, &mut Undefined).unwrap();
        let second = graph.shopping_list("sword", 2, &mut Undefined).unwrap();
        assert_eq!(first, second);
    }
}
