//! Colored output and shopping-list rendering
//!
//! Uses owo-colors for terminal colors. Status lines go through the small
//! helpers below; the shopping list itself is plain text so it can be piped.

use owo_colors::OwoColorize;

use super::expand::{BuildOrder, ShoppingList};
use super::graph::Entry;
use super::merge::Plan;

/// Print an action header (blue, bold)
/// Example: "==> Adding sword"
pub fn action(message: &str) {
    println!("{} {}", "==>".blue().bold(), message.bold());
}

/// Print a detail line (dimmed, to stderr so piped output stays clean)
/// Example: "     recipe store: ./materials.json"
pub fn detail(message: &str) {
    eprintln!("     {}", message.dimmed());
}

/// Print a success message (green)
/// Example: "==> sword added"
pub fn success(message: &str) {
    println!("{} {}", "==>".green().bold(), message.green());
}

/// Print an info message (cyan)
pub fn info(message: &str) {
    println!("{} {}", "::".cyan(), message);
}

/// Print a warning message (yellow)
pub fn warning(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
}

/// Print an error message (red)
pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message.red());
}

/// Render the shopping list and, if given, the build order.
///
/// ```text
/// Get:
///       4 iron(s)
///       2 wood(s)
/// Craft:
///       0: 2 blade(s)
///       1: 2 handle(s)
///       2: 2 sword(s)
/// ```
pub fn render_shopping_list(shopping: &ShoppingList, order: Option<&BuildOrder>) -> String {
    let mut lines = vec!["Get:".to_string()];
    lines.extend(
        shopping
            .iter()
            .map(|(name, count)| format!("\t{:>3} {}(s)", count, name)),
    );

    if let Some(order) = order {
        lines.push("Craft:".to_string());
        lines.extend(
            order
                .iter()
                .enumerate()
                .map(|(index, (name, count))| format!("\t{:>3}: {} {}(s)", index, count, name)),
        );
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Print a full plan
pub fn print_plan(plan: &Plan) {
    print!("{}", render_shopping_list(&plan.shopping, Some(&plan.order)));
}

/// Render one item's entry and crafting distance
pub fn render_info(name: &str, entry: &Entry, distance: u32) -> String {
    let mut out = String::new();
    match entry {
        Entry::Basic => out.push_str(&format!("{}: basic ingredient\n", name)),
        Entry::Composite(recipe) => {
            out.push_str(&format!("{}: crafted from\n", name));
            for (ingredient, count) in recipe {
                out.push_str(&format!("\t{:>3} {}(s)\n", count, ingredient));
            }
        }
    }
    out.push_str(&format!("crafting distance: {}\n", distance));
    out
}
