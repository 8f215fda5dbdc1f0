mod display;
mod shell;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pantry_core::ai::{create_client_from_env, expand_home, AiCache, AiClient};
use pantry_core::{
    load_image, parse_difficulty_filter, CookingTime, DietaryPreference, FileStore,
    PreferenceStore, Session,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub type CliSession = Session<Box<dyn AiClient>, FileStore>;

#[derive(Parser)]
#[command(name = "pantry")]
#[command(about = "Recipe ideas from the ingredients you have", long_about = None)]
struct Cli {
    /// Directory for saved favorites, ratings and wishlist (default: ~/.pantry)
    #[arg(long, global = true, env = "PANTRY_DATA_DIR")]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate recipes from typed ingredients or a photo
    Generate {
        /// Comma-separated ingredients
        #[arg(long, required_unless_present = "image", conflicts_with = "image")]
        ingredients: Option<String>,
        /// Photo of the ingredients (JPEG, PNG, GIF or WebP)
        #[arg(long)]
        image: Option<PathBuf>,
        /// Dietary preference id (repeatable), e.g. vegan
        #[arg(long = "diet", value_name = "ID")]
        dietary: Vec<DietaryPreference>,
        /// Cooking time id: any, under-30, 30-60, over-60
        #[arg(long, default_value = "any")]
        time: CookingTime,
        /// Easy, Medium, Hard or Any
        #[arg(long, default_value = "Any")]
        difficulty: String,
        /// Print recipes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show saved favorite recipes
    Wishlist {
        /// Print recipes as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the available filter options
    Catalog,
    /// Inspect or clear the model response cache
    Cache {
        /// Cache directory
        #[arg(long, env = "PANTRY_AI_CACHE_DIR")]
        dir: String,
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Interactive session: generate, rate, favorite and get suggestions
    Shell,
}

#[derive(Subcommand)]
enum CacheAction {
    /// Count cached responses
    Stats,
    /// Delete all cached responses
    Clear,
}

fn init_logging() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .as_deref()
        .map(expand_home)
        .unwrap_or_else(FileStore::default_dir);

    match cli.command {
        Commands::Generate {
            ingredients,
            image,
            dietary,
            time,
            difficulty,
            json,
        } => {
            let mut session = open_session(&data_dir)?;
            if let Some(path) = image {
                let image = load_image(&path)
                    .with_context(|| format!("Failed to load image {}", path.display()))?;
                session.attach_image(image);
            }
            if let Some(text) = ingredients {
                session.set_ingredients(text);
            }
            for preference in dietary {
                if !session.filters().dietary().contains(&preference) {
                    session.toggle_dietary(preference);
                }
            }
            session.set_cooking_time(time);
            session.set_difficulty(parse_difficulty_filter(&difficulty)?);

            let progress = display::spawn_progress(session.state_handle());
            let result = session.generate().await;
            progress.abort();
            result?;

            if json {
                println!("{}", serde_json::to_string_pretty(session.recipes())?);
            } else {
                for recipe in session.recipes() {
                    display::print_recipe(recipe, &session.preference(&recipe.id));
                }
            }
        }
        Commands::Wishlist { json } => {
            let store = PreferenceStore::open(FileStore::new(&data_dir));
            if json {
                println!("{}", serde_json::to_string_pretty(store.wishlist())?);
            } else {
                println!("Wishlist ({}):", store.wishlist().len());
                display::print_recipe_list(store.wishlist(), |id| store.get(id));
            }
        }
        Commands::Catalog => display::print_catalog(),
        Commands::Cache { dir, action } => {
            let cache = AiCache::new(expand_home(&dir));
            match action {
                CacheAction::Stats => {
                    println!("Cached responses: {}", cache.stats().cached_responses);
                }
                CacheAction::Clear => {
                    cache.clear().context("Failed to clear cache")?;
                    println!("Cache cleared");
                }
            }
        }
        Commands::Shell => {
            let mut session = open_session(&data_dir)?;
            shell::run(&mut session).await?;
        }
    }

    Ok(())
}

fn open_session(data_dir: &Path) -> Result<CliSession> {
    let client = create_client_from_env().context("Failed to configure the model client")?;
    tracing::debug!(data_dir = %data_dir.display(), "Opening preference store");
    let store = PreferenceStore::open(FileStore::new(data_dir));
    Ok(Session::new(client, store))
}
