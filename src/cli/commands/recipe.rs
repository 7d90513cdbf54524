use clap::Subcommand;
use serde_json::json;

use crate::cli::config::CliContext;
use crate::cli::utils::*;

#[derive(Subcommand)]
pub enum RecipeCommands {
    #[command(about = "List recipes, optionally filtered by name on the server")]
    List {
        #[arg(long, help = "Name to search for")]
        name: Option<String>,
    },

    #[command(about = "Add a recipe")]
    Add {
        #[arg(help = "Recipe name")]
        name: String,
        #[arg(help = "Recipe instructions")]
        instructions: String,
    },

    #[command(about = "Replace the instructions of the recipe with this name")]
    Update {
        #[arg(help = "Recipe name")]
        name: String,
        #[arg(help = "New instructions")]
        instructions: String,
    },

    #[command(about = "Delete the recipe with this name (admin only)")]
    Delete {
        #[arg(help = "Recipe name")]
        name: String,
    },
}

pub async fn handle(cmd: RecipeCommands, ctx: &CliContext) -> anyhow::Result<()> {
    let output_format = &ctx.output_format;
    let mut page = ctx.recipe_page();

    let notice = match cmd {
        RecipeCommands::List { name: Some(name) } => page.search(&name).await,
        RecipeCommands::List { name: None } => page.load().await,
        RecipeCommands::Add { name, instructions } => page.add(&name, &instructions).await,
        RecipeCommands::Update { name, instructions } => page.update(&name, &instructions).await,
        RecipeCommands::Delete { name } => page.delete(&name).await,
    };

    if notice.is_success() {
        output_rows(output_format, page.view().surface().lines(), "No recipes found");
    }

    let snapshot = page.recipes().mirror().snapshot();
    report(
        output_format,
        notice,
        Some(json!({
            "recipes": snapshot.items,
            "filter": snapshot.filter,
            "admin": page.show_admin_link(),
        })),
    )
}
