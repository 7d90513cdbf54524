use crate::error::ClientError;
use crate::http::ApiClient;
use crate::models::{Ingredient, NewIngredient};
use crate::render::{DisplayModel, ListView, Surface};
use crate::sync::{EntitySynchronizer, ResolvePolicy};

use super::{failure, stale, FailureText, Notice};

const RETRIEVE_FAILED: &str = "Error getting ingredients";

pub struct IngredientPage<S: Surface> {
    ingredients: EntitySynchronizer<Ingredient>,
    view: ListView<S>,
}

impl<S: Surface> IngredientPage<S> {
    pub fn new(client: ApiClient, policy: ResolvePolicy, surface: S) -> Self {
        Self {
            ingredients: EntitySynchronizer::new(client, policy),
            view: ListView::new(surface),
        }
    }

    pub fn ingredients(&self) -> &EntitySynchronizer<Ingredient> {
        &self.ingredients
    }

    pub fn view(&self) -> &ListView<S> {
        &self.view
    }

    pub fn show_admin_link(&self) -> bool {
        self.ingredients.session().is_admin()
    }

    fn redraw(&mut self) -> DisplayModel {
        self.view.render_mirror(self.ingredients.mirror())
    }

    pub async fn load(&mut self) -> Notice {
        self.list(None).await
    }

    pub async fn search(&mut self, term: &str) -> Notice {
        self.list(Some(term)).await
    }

    async fn list(&mut self, term: Option<&str>) -> Notice {
        match self.ingredients.list(term).await {
            Ok(items) => {
                self.redraw();
                Notice::success(format!("{} ingredients", items.len()))
            }
            Err(e) => failure::<Ingredient>(
                e,
                FailureText {
                    invalid: RETRIEVE_FAILED,
                    rejected: RETRIEVE_FAILED,
                    transport: RETRIEVE_FAILED,
                },
            ),
        }
    }

    pub async fn add(&mut self, name: &str) -> Notice {
        let fields = NewIngredient {
            name: name.to_string(),
        };
        match self.ingredients.create(&fields).await {
            Ok(()) => {
                self.redraw();
                Notice::success(format!("Ingredient '{}' added", name.trim()))
            }
            Err(e @ ClientError::RefreshFailed(_)) => {
                stale(&format!("Ingredient '{}' added", name.trim()), RETRIEVE_FAILED, e)
            }
            Err(e) => failure::<Ingredient>(
                e,
                FailureText {
                    invalid: "Fields must all be filled",
                    rejected: "Unexpected Error!",
                    transport: "Error processing request",
                },
            ),
        }
    }

    pub async fn delete(&mut self, name: &str) -> Notice {
        match self.ingredients.delete_by_name(name).await {
            Ok(()) => {
                self.redraw();
                Notice::success(format!("Ingredient '{}' deleted", name.trim()))
            }
            Err(e @ ClientError::RefreshFailed(_)) => {
                stale(&format!("Ingredient '{}' deleted", name.trim()), RETRIEVE_FAILED, e)
            }
            Err(e) => {
                let rejected = match e.status() {
                    Some(status) => format!("Failed to delete ingredient. {}", status),
                    None => "Failed to delete ingredient".to_string(),
                };
                failure::<Ingredient>(
                    e,
                    FailureText {
                        invalid: "Empty Field Error",
                        rejected: &rejected,
                        transport: "Error processing delete request",
                    },
                )
            }
        }
    }
}
