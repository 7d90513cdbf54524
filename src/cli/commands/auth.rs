use std::io::BufRead;

use clap::Subcommand;
use serde_json::{json, Value};

use crate::auth::{Page, RegistrationForm};
use crate::cli::config::CliContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::error::ClientError;
use crate::models::Recipe;
use crate::pages::Notice;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout from server and clear the session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Register new user")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
        #[arg(long, help = "Password again, must match")]
        repeat_password: String,
    },
}

fn read_password() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Login wording: 401 is a bad password, any other status or an unreadable
/// body is an unknown issue, and a transport failure is a login error
pub fn login_failure(err: ClientError) -> Notice {
    let message = match &err {
        ClientError::ValidationFailed(_) => "Fields cannot be empty.",
        ClientError::ClientRejected(401) => "Incorrect Login!",
        ClientError::ClientRejected(_)
        | ClientError::ServerRejected(_)
        | ClientError::UnexpectedStatus(_)
        | ClientError::Decode(_) => "Unknown Issue!",
        _ => "Login Error",
    };
    Notice::error(message, err)
}

pub fn register_failure(err: ClientError) -> Notice {
    match err {
        ClientError::ValidationFailed(_) => Notice::error(err.to_string(), err),
        ClientError::ClientRejected(409) => Notice::error("That username or email already exists", err),
        _ => Notice::error("Error processing registration", err),
    }
}

/// JSON summary of the recipe list loaded after a login redirect
fn redirect_summary(notice: &Notice, items: Vec<Recipe>) -> Value {
    if notice.is_success() {
        json!({ "success": true, "message": notice.message, "items": items })
    } else {
        json!({
            "success": false,
            "error": notice.message,
            "error_code": notice.error.as_ref().map(|e| e.error_code()),
        })
    }
}

pub async fn handle(cmd: AuthCommands, ctx: &CliContext) -> anyhow::Result<()> {
    let output_format = &ctx.output_format;

    match cmd {
        AuthCommands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => read_password()?,
            };

            let navigation = match ctx.auth().login(&username, &password).await {
                Ok(navigation) => navigation,
                Err(e) => return report(output_format, login_failure(e), None),
            };

            let logged_in = format!("Logged in as {}", username);
            let is_admin = ctx.session().is_admin();
            if navigation.page != Page::Recipes {
                return output_success(output_format, &logged_in, Some(json!({ "is_admin": is_admin })));
            }
            if *output_format == OutputFormat::Text {
                output_success(output_format, &logged_in, None)?;
            }

            // Follow the redirect to the recipe list. The session is already
            // stored, so a failed load is reported but does not fail the login.
            tokio::time::sleep(navigation.after).await;
            let mut page = ctx.recipe_page();
            let notice = page.load().await;
            match output_format {
                OutputFormat::Text if notice.is_success() => {
                    output_rows(output_format, page.view().surface().lines(), "No recipes yet");
                }
                OutputFormat::Text => eprintln!("Warning: {}", notice.message),
                OutputFormat::Json => {
                    let recipes = redirect_summary(&notice, page.recipes().mirror().items());
                    output_success(
                        output_format,
                        &logged_in,
                        Some(json!({ "is_admin": is_admin, "recipes": recipes })),
                    )?;
                }
            }
            Ok(())
        }
        AuthCommands::Logout => {
            let mut page = ctx.recipe_page();
            let (notice, _) = page.logout().await;
            report(output_format, notice, None)
        }
        AuthCommands::Status => {
            let session = ctx.session();
            let authenticated = session.is_authenticated();
            let is_admin = session.is_admin();
            let message = match (authenticated, is_admin) {
                (false, _) => "Not logged in".to_string(),
                (true, true) => "Logged in (admin)".to_string(),
                (true, false) => "Logged in".to_string(),
            };

            output_success(
                output_format,
                &message,
                Some(json!({
                    "authenticated": authenticated,
                    "is_admin": is_admin,
                    "session_file": ctx.storage.path().display().to_string(),
                    "server": ctx.client.base_url().as_str(),
                })),
            )
        }
        AuthCommands::Register {
            username,
            email,
            password,
            repeat_password,
        } => {
            let form = RegistrationForm {
                username,
                email,
                password,
                repeat_password,
            };

            match ctx.auth().register(&form).await {
                Ok(_) => report(
                    output_format,
                    Notice::success(format!("Registered {}, you can now log in", form.username)),
                    None,
                ),
                Err(e) => report(output_format, register_failure(e), None),
            }
        }
    }
}
