use crate::auth::{AuthController, Navigation};
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::models::{NewRecipe, Recipe, RecipeUpdate};
use crate::render::{DisplayModel, ListView, Surface};
use crate::sync::{EntitySynchronizer, ResolvePolicy};

use super::{failure, stale, FailureText, Notice};

const RETRIEVE_FAILED: &str = "Failed to retrieve recipes";

pub struct RecipePage<S: Surface> {
    recipes: EntitySynchronizer<Recipe>,
    auth: AuthController,
    view: ListView<S>,
}

impl<S: Surface> RecipePage<S> {
    pub fn new(client: ApiClient, policy: ResolvePolicy, auth: AuthController, surface: S) -> Self {
        Self {
            recipes: EntitySynchronizer::new(client, policy),
            auth,
            view: ListView::new(surface),
        }
    }

    pub fn recipes(&self) -> &EntitySynchronizer<Recipe> {
        &self.recipes
    }

    pub fn view(&self) -> &ListView<S> {
        &self.view
    }

    pub fn show_logout(&self) -> bool {
        self.recipes.session().is_authenticated()
    }

    pub fn show_admin_link(&self) -> bool {
        self.recipes.session().is_admin()
    }

    fn redraw(&mut self) -> DisplayModel {
        self.view.render_mirror(self.recipes.mirror())
    }

    /// Fetch the full list and draw it
    pub async fn load(&mut self) -> Notice {
        match self.recipes.refresh().await {
            Ok(items) => {
                self.redraw();
                Notice::success(format!("{} recipes", items.len()))
            }
            Err(e) => failure::<Recipe>(
                e,
                FailureText {
                    invalid: RETRIEVE_FAILED,
                    rejected: RETRIEVE_FAILED,
                    transport: "Failed to get recipes",
                },
            ),
        }
    }

    pub async fn search(&mut self, term: &str) -> Notice {
        match self.recipes.list(Some(term)).await {
            Ok(items) => {
                self.redraw();
                Notice::success(format!("{} recipes match '{}'", items.len(), term))
            }
            Err(e) => failure::<Recipe>(
                e,
                FailureText {
                    invalid: "Failed to search for recipes",
                    rejected: "Failed to search for recipes",
                    transport: "Failed to search for recipes",
                },
            ),
        }
    }

    pub async fn add(&mut self, name: &str, instructions: &str) -> Notice {
        let fields = NewRecipe {
            name: name.to_string(),
            instructions: instructions.to_string(),
        };
        match self.recipes.create(&fields).await {
            Ok(()) => {
                self.redraw();
                Notice::success(format!("Recipe '{}' added", name.trim()))
            }
            Err(e @ ClientError::RefreshFailed(_)) => {
                stale(&format!("Recipe '{}' added", name.trim()), RETRIEVE_FAILED, e)
            }
            Err(e) => failure::<Recipe>(
                e,
                FailureText {
                    invalid: "Fields must all be filled",
                    rejected: "Failed to add recipe",
                    transport: "Error adding recipe",
                },
            ),
        }
    }

    pub async fn update(&mut self, name: &str, instructions: &str) -> Notice {
        let fields = RecipeUpdate {
            instructions: instructions.to_string(),
        };
        match self.recipes.update_by_name(name, &fields).await {
            Ok(()) => {
                self.redraw();
                Notice::success(format!("Recipe '{}' updated", name.trim()))
            }
            Err(e @ ClientError::RefreshFailed(_)) => {
                stale(&format!("Recipe '{}' updated", name.trim()), RETRIEVE_FAILED, e)
            }
            Err(e) => failure::<Recipe>(
                e,
                FailureText {
                    invalid: "Fields must all be filled",
                    rejected: "Failed to update recipe",
                    transport: "Error updating recipe",
                },
            ),
        }
    }

    pub async fn delete(&mut self, name: &str) -> Notice {
        match self.recipes.delete_by_name(name).await {
            Ok(()) => {
                self.redraw();
                Notice::success(format!("Recipe '{}' deleted", name.trim()))
            }
            Err(e @ ClientError::RefreshFailed(_)) => {
                stale(&format!("Recipe '{}' deleted", name.trim()), RETRIEVE_FAILED, e)
            }
            Err(e) => failure::<Recipe>(
                e,
                FailureText {
                    invalid: "Fields must all be filled",
                    rejected: "Unexpected error encountered",
                    transport: "Failed to delete recipe",
                },
            ),
        }
    }

    /// Log out; the navigation is only returned when the server accepted it
    pub async fn logout(&mut self) -> (Notice, Option<Navigation>) {
        match self.auth.logout().await {
            Ok(navigation) => (Notice::success("Logged out"), Some(navigation)),
            Err(e) => (
                failure::<Recipe>(
                    e,
                    FailureText {
                        invalid: "Error attempting logout",
                        rejected: "Error attempting logout",
                        transport: "Error attempting logout",
                    },
                ),
                None,
            ),
        }
    }
}
