use serde::{Deserialize, Serialize};

/// Recipe record stored in redb
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeRecord {
    /// Owning profile id
    pub profile_id: u64,
    pub title: String,
    pub instructions: String,
    pub equipment: String,
    pub ingredients: String,
    /// When the recipe was created (Unix timestamp)
    pub created_at: i64,
    /// When the recipe was last updated (Unix timestamp)
    pub updated_at: i64,
}

/// Recipe model for API responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    pub id: u64,
    pub user_profile: u64,
    pub title: String,
    pub instructions: String,
    pub equipment: String,
    pub ingredients: String,
}

impl RecipeRecord {
    pub fn to_recipe(&self, id: u64) -> Recipe {
        Recipe {
            id,
            user_profile: self.profile_id,
            title: self.title.clone(),
            instructions: self.instructions.clone(),
            equipment: self.equipment.clone(),
            ingredients: self.ingredients.clone(),
        }
    }
}

/// Validated recipe content for create and full update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub profile_id: u64,
    pub title: String,
    pub instructions: String,
    pub equipment: String,
    pub ingredients: String,
}

/// Partial recipe update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    pub profile_id: Option<u64>,
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub equipment: Option<String>,
    pub ingredients: Option<String>,
}

impl From<NewRecipe> for RecipeChanges {
    fn from(recipe: NewRecipe) -> Self {
        Self {
            profile_id: Some(recipe.profile_id),
            title: Some(recipe.title),
            instructions: Some(recipe.instructions),
            equipment: Some(recipe.equipment),
            ingredients: Some(recipe.ingredients),
        }
    }
}

impl RecipeChanges {
    pub fn apply(self, record: &mut RecipeRecord, now: i64) {
        if let Some(profile_id) = self.profile_id {
            record.profile_id = profile_id;
        }
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(instructions) = self.instructions {
            record.instructions = instructions;
        }
        if let Some(equipment) = self.equipment {
            record.equipment = equipment;
        }
        if let Some(ingredients) = self.ingredients {
            record.ingredients = ingredients;
        }
        record.updated_at = now;
    }
}
