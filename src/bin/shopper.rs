//! Shopper CLI - shopping lists for crafting recipes
//!
//! Usage:
//!   shopper make [N] <item> [[N] <item> ...]   Shopping list and build order
//!   shopper add <item>                         Define a new recipe
//!   shopper rename <old> <new>                 Rename an item everywhere
//!   shopper del <item>                         (not supported)
//!   shopper info <item>                        Show an item's recipe
//!
//! The recipe store is written back after every successful command. A failed
//! command leaves it untouched.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recipe_shopper::{
    output, parse_make_args, plan, store, Config, Definer, Prompter, RecipeGraph, ShopError,
    Undefined,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shopper")]
#[command(about = "Shopping lists and build orders for crafting recipes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Recipe store (read as YAML, written as JSON)
    #[arg(long, global = true, env = "SHOPPER_DATA")]
    data: Option<PathBuf>,

    /// Treat undefined items as errors instead of asking for them
    #[arg(long, global = true)]
    no_prompt: bool,

    /// Show extra detail
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the shopping list and build order for items
    Make {
        /// Count for items not preceded by a number
        #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        count: u64,

        /// Items to make, each optionally preceded by a count
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Add a recipe, defining any unknown ingredients along the way
    Add {
        /// Item name
        item: String,
    },

    /// Rename an item and every recipe that uses it
    Rename {
        /// Current name
        old: String,

        /// New name
        new: String,
    },

    /// Delete a recipe
    Del {
        /// Item name
        item: String,
    },

    /// Show an item's recipe and crafting distance
    Info {
        /// Item name
        item: String,
    },
}

fn main() {
    if let Err(e) = run() {
        output::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?.with_overrides(cli.data, cli.no_prompt);
    if cli.verbose {
        output::detail(&format!("recipe store: {}", config.data.display()));
    }

    let mut graph = store::load(&config.data)
        .with_context(|| format!("Failed to load recipe store: {}", config.data.display()))?;

    let mut definer: Box<dyn Definer> = if config.prompt {
        Box::new(Prompter::stdio())
    } else {
        Box::new(Undefined)
    };

    match cli.command {
        Commands::Make { count, items } => {
            let requests = parse_make_args(&items, count)?;
            let plan = plan(&mut graph, &requests, definer.as_mut())?;
            if cli.verbose {
                for (name, _) in &plan.order {
                    output::detail(&format!("{}: distance {}", name, graph.distance(name)?));
                }
            }
            output::print_plan(&plan);
        }

        Commands::Add { item } => {
            output::action(&format!("Adding {}", item));
            match graph.add_recipe(&item, definer.as_mut()) {
                Ok(()) => output::success(&format!("{} added", item)),
                Err(ShopError::AlreadyExists(name)) => {
                    output::warning(&format!("Recipe already exists in database: {}", name));
                }
                Err(e) => return Err(e).with_context(|| format!("Failed to add {}", item)),
            }
        }

        Commands::Rename { old, new } => {
            graph
                .rename_recipe(&old, &new)
                .with_context(|| format!("Failed to rename {} to {}", old, new))?;
            output::success(&format!("Renamed {} to {}", old, new));
        }

        Commands::Del { item } => {
            graph
                .delete_recipe(&item)
                .with_context(|| format!("Failed to delete {}", item))?;
        }

        Commands::Info { item } => {
            show_info(&graph, &item)?;
        }
    }

    store::save(&config.data, &graph)
        .with_context(|| format!("Failed to write recipe store: {}", config.data.display()))?;
    output::info(&format!("Wrote {}", config.data.display()));

    Ok(())
}

/// Print an item's recipe and crafting distance
fn show_info(graph: &RecipeGraph, item: &str) -> Result<()> {
    let entry = graph.entry(item)?;
    let distance = graph
        .distance(item)
        .with_context(|| format!("Failed to compute crafting distance of {}", item))?;
    let name = recipe_shopper::normalize(item)?;
    print!("{}", output::render_info(&name, entry, distance));
    Ok(())
}
