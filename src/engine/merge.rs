//! Combining results for several requested items
//!
//! One `make` invocation may ask for several items. Their shopping lists are
//! summed per ingredient; their build orders are unioned by name (summing
//! counts) and re-sorted by crafting distance so shared intermediates appear
//! once, before everything that needs them.

use std::collections::HashMap;

use super::define::Definer;
use super::error::{Result, ShopError};
use super::expand::{add_to, BuildOrder, ShoppingList};
use super::graph::RecipeGraph;
use super::request::Request;

/// Everything needed to make a set of requested items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Basic ingredients to gather
    pub shopping: ShoppingList,
    /// Items to craft, prerequisites first
    pub order: BuildOrder,
}

/// Sum shopping lists per ingredient
pub fn join_shopping_lists(
    lists: impl IntoIterator<Item = ShoppingList>,
) -> Result<ShoppingList> {
    let mut joined = ShoppingList::new();
    for list in lists {
        for (name, count) in list {
            add_to(&mut joined, &name, count)?;
        }
    }
    Ok(joined)
}

/// Union build orders by item name and re-sort by crafting distance.
///
/// Items keep the position of their first appearance among equal distances.
pub fn join_build_orders(
    graph: &RecipeGraph,
    orders: impl IntoIterator<Item = BuildOrder>,
) -> Result<BuildOrder> {
    let mut joined: BuildOrder = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for order in orders {
        for (name, count) in order {
            match index.get(&name) {
                Some(&i) => {
                    let slot = &mut joined[i].1;
                    *slot = slot.checked_add(count).ok_or_else(|| {
                        ShopError::validation(format!("total count of '{}' overflows", name))
                    })?;
                }
                None => {
                    index.insert(name.clone(), joined.len());
                    joined.push((name, count));
                }
            }
        }
    }

    graph.sort_by_distance(joined)
}

/// Shopping list and build order for every request, merged.
///
/// Undefined items are defined through `definer` as they are met, so the
/// graph may grow.
pub fn plan(
    graph: &mut RecipeGraph,
    requests: &[Request],
    definer: &mut dyn Definer,
) -> Result<Plan> {
    let mut lists = Vec::with_capacity(requests.len());
    let mut orders = Vec::with_capacity(requests.len());

    for request in requests {
        lists.push(graph.shopping_list(&request.name, request.count, definer)?);
        orders.push(graph.build_order(&request.name, request.count, definer)?);
    }

    Ok(Plan {
        shopping: join_shopping_lists(lists)?,
        order: join_build_orders(graph, orders)?,
    })
}
