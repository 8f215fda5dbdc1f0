//! Interactive session over stdin.

use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use pantry_core::{
    load_image, parse_difficulty_filter, ActiveView, CookingTime, DietaryPreference, Rating,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::display;
use crate::CliSession;

const HELP: &str = "\
Commands:
  ingredients <text>     Set the ingredients
  image <path>           Attach a photo to identify on the next generate
  clear-image            Detach the photo
  diet <id>              Toggle a dietary preference
  time <id>              Set the cooking time
  difficulty <level>     Set the difficulty (Easy, Medium, Hard, Any)
  filters                Show the current filters
  generate               Generate recipes
  suggest                Suggest recipes like the ones you liked
  all | wishlist         Switch the displayed list
  list                   Show the displayed list
  show <n|id>            Show a recipe in full
  close                  Close the shown recipe
  fav [n|id]             Toggle a favorite (default: the shown recipe)
  rate <n|id> <1-5>      Rate a recipe
  catalog                Show the filter options
  help                   Show this help
  quit                   Leave the shell";

enum Flow {
    Continue,
    Quit,
}

pub async fn run(session: &mut CliSession) -> Result<()> {
    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("pantry> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((line, ""));

        match execute(session, command, rest).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => eprintln!("Error: {:#}", e),
        }
    }

    Ok(())
}

async fn execute(session: &mut CliSession, command: &str, rest: &str) -> Result<Flow> {
    match command {
        "ingredients" => {
            session.set_ingredients(rest);
        }
        "image" => {
            let image = load_image(Path::new(rest))
                .with_context(|| format!("Failed to load image {}", rest))?;
            session.attach_image(image);
            println!("Photo attached ({})", session.image().map_or("", |i| i.mime_type.as_str()));
        }
        "clear-image" => session.clear_image(),
        "diet" => {
            let preference: DietaryPreference = rest.parse()?;
            let on = session.toggle_dietary(preference);
            println!("{} {}", preference.label(), if on { "on" } else { "off" });
        }
        "time" => {
            let time: CookingTime = rest.parse()?;
            session.set_cooking_time(time);
        }
        "difficulty" => session.set_difficulty(parse_difficulty_filter(rest)?),
        "filters" => display::print_filters(session.filters()),
        "generate" => {
            let progress = display::spawn_progress(session.state_handle());
            let result = session.generate().await;
            progress.abort();
            report(session, result);
        }
        "suggest" => {
            let progress = display::spawn_progress(session.state_handle());
            let result = session.suggest().await;
            progress.abort();
            report(session, result);
        }
        "all" => {
            session.set_view(ActiveView::All);
            list(session);
        }
        "wishlist" => {
            session.set_view(ActiveView::Wishlist);
            list(session);
        }
        "list" => list(session),
        "show" => {
            let id = resolve(session, rest)?;
            if !session.select(&id) {
                bail!("No recipe {} in the list", id);
            }
            if let Some(recipe) = session.selected() {
                display::print_recipe(recipe, &session.preference(&recipe.id));
            }
        }
        "close" => session.deselect(),
        "fav" => {
            let id = match rest {
                "" => session
                    .selected()
                    .map(|r| r.id.clone())
                    .ok_or_else(|| anyhow!("Which recipe? Give a number from the list or an id"))?,
                target => resolve(session, target)?,
            };
            match session.toggle_favorite(&id)? {
                Some(true) => println!("Added to wishlist"),
                Some(false) => println!("Removed from wishlist"),
                None => bail!("No recipe {}", id),
            }
        }
        "rate" => {
            let (target, stars) = rest
                .rsplit_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("Usage: rate <n|id> <1-5>"))?;
            let stars: u8 = stars.parse().context("Rating must be a number")?;
            let rating = Rating::new(stars)
                .ok_or_else(|| anyhow!("Rating must be between {} and {}", Rating::MIN, Rating::MAX))?;
            let id = resolve(session, target.trim())?;
            session.set_rating(&id, rating)?;
            println!("Rated {}/5 ({} liked)", rating, session.liked_recipe_count());
        }
        "catalog" => display::print_catalog(),
        "help" => println!("{}", HELP),
        "quit" | "exit" => return Ok(Flow::Quit),
        other => bail!("Unknown command: {} (try `help`)", other),
    }

    Ok(Flow::Continue)
}

fn report(session: &CliSession, result: Result<(), pantry_core::SessionError>) {
    if let Err(e) = result {
        tracing::debug!(error = ?e, "Cycle failed");
        eprintln!("{}", e);
        return;
    }
    list(session);
    if session.can_suggest() {
        println!("({} liked, `suggest` for more like them)", session.liked_recipe_count());
    }
}

fn list(session: &CliSession) {
    let title = match session.view() {
        ActiveView::All => "Recipes",
        ActiveView::Wishlist => "Wishlist",
    };
    println!("{}:", title);
    display::print_recipe_list(session.displayed_recipes(), |id| session.preference(id));
}

/// A 1-based position in the displayed list, or a recipe id.
fn resolve(session: &CliSession, target: &str) -> Result<String> {
    if target.is_empty() {
        bail!("Which recipe? Give a number from the list or an id");
    }
    let displayed = session.displayed_recipes();
    if let Ok(n) = target.parse::<usize>() {
        return displayed
            .get(n.wrapping_sub(1))
            .map(|r| r.id.clone())
            .ok_or_else(|| anyhow!("No recipe #{} in the list", n));
    }
    Ok(target.to_string())
}
