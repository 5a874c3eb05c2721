//! Shopping lists and build orders for crafting recipes
//!
//! A recipe store maps every item either to nothing (a basic ingredient) or
//! to the ingredients needed for one unit of it. Given items to make, the
//! engine works out which basic ingredients to gather and in what order the
//! intermediate items have to be crafted.
//!
//! # Example Store
//!
//! ```yaml
//! iron: ~
//! wood: ~
//! blade: {iron: 2}
//! handle: {wood: 1}
//! sword: {blade: 1, handle: 1}
//! ```
//!
//! `shopper make 2 sword` prints:
//!
//! ```text
//! Get:
//!       4 iron(s)
//!       2 wood(s)
//! Craft:
//!       0: 2 blade(s)
//!       1: 2 handle(s)
//!       2: 2 sword(s)
//! ```
//!
//! # Undefined Items
//!
//! When an expansion reaches an item the store does not know, it asks a
//! [`Definer`] for a definition and keeps going. The `shopper` binary asks on
//! the terminal ([`Prompter`]); library callers can pass [`Undefined`] to
//! treat unknown items as errors, or [`Scripted`] for canned answers.
//!
//! ```
//! use recipe_shopper::{Entry, RecipeGraph, Undefined};
//!
//! let mut graph = RecipeGraph::new();
//! graph.insert("iron", Entry::Basic).unwrap();
//! graph
//!     .insert("blade", Entry::Composite([("iron".to_string(), 2)].into()))
//!     .unwrap();
//!
//! let list = graph.shopping_list("blade", 3, &mut Undefined).unwrap();
//! assert_eq!(list.get("iron"), Some(&6));
//! ```

mod engine;

pub use engine::config::{self, Config};
pub use engine::define::{Cause, Definer, Definition, Scripted, Undefined};
pub use engine::error::{Result, ShopError};
pub use engine::expand::{BuildOrder, Expansion, ShoppingList};
pub use engine::graph::{Entry, Recipe, RecipeGraph};
pub use engine::merge::{self, join_build_orders, join_shopping_lists, plan, Plan};
pub use engine::name::normalize;
pub use engine::output;
pub use engine::prompt::Prompter;
pub use engine::request::{self, parse_ingredient_line, parse_make_args, Request};
pub use engine::store;
