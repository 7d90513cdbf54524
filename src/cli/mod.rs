pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "recipes")]
#[command(about = "Recipes CLI - Command-line client for the Recipe Management API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        default_value = "default",
        help = "Named session to use; each name behaves like its own browser tab"
    )]
    pub session: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Login, registration and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "List, add, update and delete recipes")]
    Recipe {
        #[command(subcommand)]
        cmd: commands::recipe::RecipeCommands,
    },

    #[command(about = "List, add and delete ingredients")]
    Ingredient {
        #[command(subcommand)]
        cmd: commands::ingredient::IngredientCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = config::CliContext::from_cli(&cli)?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &ctx).await,
        Commands::Recipe { cmd } => commands::recipe::handle(cmd, &ctx).await,
        Commands::Ingredient { cmd } => commands::ingredient::handle(cmd, &ctx).await,
    }
}
