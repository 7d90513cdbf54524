use clap::Subcommand;
use serde_json::json;

use crate::cli::config::CliContext;
use crate::cli::utils::*;

#[derive(Subcommand)]
pub enum IngredientCommands {
    #[command(about = "List ingredients, optionally filtered by term on the server")]
    List {
        #[arg(long, help = "Search term")]
        term: Option<String>,
    },

    #[command(about = "Add an ingredient")]
    Add {
        #[arg(help = "Ingredient name")]
        name: String,
    },

    #[command(about = "Delete the ingredient with this name (admin only)")]
    Delete {
        #[arg(help = "Ingredient name")]
        name: String,
    },
}

pub async fn handle(cmd: IngredientCommands, ctx: &CliContext) -> anyhow::Result<()> {
    let output_format = &ctx.output_format;
    let mut page = ctx.ingredient_page();

    let notice = match cmd {
        IngredientCommands::List { term: Some(term) } => page.search(&term).await,
        IngredientCommands::List { term: None } => page.load().await,
        IngredientCommands::Add { name } => page.add(&name).await,
        IngredientCommands::Delete { name } => page.delete(&name).await,
    };

    if notice.is_success() {
        output_rows(output_format, page.view().surface().lines(), "No ingredients found");
    }

    let snapshot = page.ingredients().mirror().snapshot();
    report(
        output_format,
        notice,
        Some(json!({
            "ingredients": snapshot.items,
            "filter": snapshot.filter,
        })),
    )
}
