/// Entities served by the recipe backend and the field sets sent to it
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ClientError, Result};

/// Server-assigned identifier. Never constructed from user input; only
/// discovered by listing a collection. The backend may send numbers or
/// strings, both are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityId(String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => EntityId(n.to_string()),
            RawId::Text(s) => EntityId(s),
        })
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: EntityId,
    pub name: String,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRecipe {
    pub name: String,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeUpdate {
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIngredient {
    pub name: String,
}

/// Trim `value` and reject it if nothing is left
pub fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Field sets that can be checked before any request is issued
pub trait Validate: Sized {
    /// Normalized copy of the fields, or `ValidationFailed`
    fn validated(&self) -> Result<Self>;
}

impl Validate for NewRecipe {
    fn validated(&self) -> Result<Self> {
        Ok(Self {
            name: required("name", &self.name)?,
            instructions: required("instructions", &self.instructions)?,
        })
    }
}

impl Validate for RecipeUpdate {
    fn validated(&self) -> Result<Self> {
        Ok(Self {
            instructions: required("instructions", &self.instructions)?,
        })
    }
}

impl Validate for NewIngredient {
    fn validated(&self) -> Result<Self> {
        Ok(Self {
            name: required("name", &self.name)?,
        })
    }
}

/// A backend collection addressed as `/<collection>` and `/<collection>/{id}`
pub trait Resource: Clone + Send + Sync + serde::de::DeserializeOwned + 'static {
    /// Human label used in messages
    const LABEL: &'static str;
    const COLLECTION: &'static str;
    /// Query parameter the server filters the collection by
    const FILTER_PARAM: &'static str;

    type Create: Validate + Serialize + Send + Sync;

    fn id(&self) -> &EntityId;
    fn name(&self) -> &str;

    fn collection_path() -> String {
        format!("/{}", Self::COLLECTION)
    }

    fn item_path(id: &EntityId) -> String {
        format!("/{}/{}", Self::COLLECTION, id)
    }
}

/// Resources the backend can modify in place
pub trait Updatable: Resource {
    type Update: Validate + Serialize + Send + Sync;
}

impl Resource for Recipe {
    const LABEL: &'static str = "Recipe";
    const COLLECTION: &'static str = "recipes";
    const FILTER_PARAM: &'static str = "name";

    type Create = NewRecipe;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Updatable for Recipe {
    type Update = RecipeUpdate;
}

impl Resource for Ingredient {
    const LABEL: &'static str = "Ingredient";
    const COLLECTION: &'static str = "ingredients";
    const FILTER_PARAM: &'static str = "term";

    type Create = NewIngredient;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
