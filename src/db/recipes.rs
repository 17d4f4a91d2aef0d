//! Recipe store.

use redb::{Database, ReadableDatabase, ReadableTable, WriteTransaction};

use crate::db::{RECIPE_SEQUENCE, decode, encode, favorites, next_id, profiles, tables};
use crate::error::{AppError, Result};
use crate::models::{NewRecipe, Recipe, RecipeChanges, RecipeRecord};

/// All recipes, ordered by id ascending
pub fn list(db: &Database) -> Result<Vec<Recipe>> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(tables::RECIPES)?;

    let mut recipes = Vec::new();
    for entry in table.iter()? {
        let (id, bytes) = entry?;
        let record: RecipeRecord = decode(bytes.value())?;
        recipes.push(record.to_recipe(id.value()));
    }
    Ok(recipes)
}

pub fn find(db: &Database, recipe_id: u64) -> Result<Option<Recipe>> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(tables::RECIPES)?;
    let record = table
        .get(recipe_id)?
        .map(|bytes| decode::<RecipeRecord>(bytes.value()))
        .transpose()?;
    Ok(record.map(|record| record.to_recipe(recipe_id)))
}

pub fn get(db: &Database, recipe_id: u64) -> Result<Recipe> {
    find(db, recipe_id)?.ok_or(AppError::RecipeNotFound)
}

/// Create a recipe owned by `new.profile_id`, which must exist
pub fn create(db: &Database, new: NewRecipe, now: i64) -> Result<Recipe> {
    let write_txn = db.begin_write()?;
    let (recipe_id, record) = {
        require_profile(&write_txn, new.profile_id)?;

        let recipe_id = next_id(&write_txn, RECIPE_SEQUENCE)?;
        let record = RecipeRecord {
            profile_id: new.profile_id,
            title: new.title,
            instructions: new.instructions,
            equipment: new.equipment,
            ingredients: new.ingredients,
            created_at: now,
            updated_at: now,
        };

        let mut recipes = write_txn.open_table(tables::RECIPES)?;
        recipes.insert(recipe_id, encode(&record)?.as_slice())?;

        let mut index = write_txn.open_table(tables::PROFILE_RECIPES)?;
        index.insert((record.profile_id, recipe_id), now)?;

        (recipe_id, record)
    };
    write_txn.commit()?;

    tracing::info!(
        "Recipe {} created for profile {}",
        recipe_id,
        record.profile_id
    );
    Ok(record.to_recipe(recipe_id))
}

/// Apply changes to a recipe
///
/// When `owner` is given, the recipe must belong to that profile and may not
/// be reassigned to another one.
pub fn update(
    db: &Database,
    recipe_id: u64,
    changes: RecipeChanges,
    owner: Option<u64>,
    now: i64,
) -> Result<Recipe> {
    let write_txn = db.begin_write()?;
    let record = {
        let mut recipes = write_txn.open_table(tables::RECIPES)?;
        let mut record: RecipeRecord = match recipes.get(recipe_id)? {
            Some(bytes) => decode(bytes.value())?,
            None => return Err(AppError::RecipeNotFound),
        };
        check_owner(recipe_id, record.profile_id, owner)?;

        let previous_owner = record.profile_id;
        if let Some(new_owner) = changes.profile_id
            && new_owner != previous_owner
        {
            check_owner(recipe_id, new_owner, owner)?;
            require_profile(&write_txn, new_owner)?;

            let mut index = write_txn.open_table(tables::PROFILE_RECIPES)?;
            index.remove((previous_owner, recipe_id))?;
            index.insert((new_owner, recipe_id), record.created_at)?;
        }

        changes.apply(&mut record, now);
        recipes.insert(recipe_id, encode(&record)?.as_slice())?;
        record
    };
    write_txn.commit()?;

    tracing::info!("Recipe {} updated", recipe_id);
    Ok(record.to_recipe(recipe_id))
}

/// Delete a recipe and every favorite pointing at it
pub fn delete(db: &Database, recipe_id: u64, owner: Option<u64>) -> Result<()> {
    let write_txn = db.begin_write()?;
    {
        let mut recipes = write_txn.open_table(tables::RECIPES)?;
        let record: RecipeRecord = match recipes.get(recipe_id)? {
            Some(bytes) => decode(bytes.value())?,
            None => return Err(AppError::RecipeNotFound),
        };
        check_owner(recipe_id, record.profile_id, owner)?;
        recipes.remove(recipe_id)?;
        drop(recipes);

        let mut index = write_txn.open_table(tables::PROFILE_RECIPES)?;
        index.remove((record.profile_id, recipe_id))?;
        drop(index);

        favorites::remove_for_recipe(&write_txn, recipe_id)?;
    }
    write_txn.commit()?;

    tracing::info!("Recipe {} deleted", recipe_id);
    Ok(())
}

pub(crate) fn exists_in(txn: &WriteTransaction, recipe_id: u64) -> Result<bool> {
    let recipes = txn.open_table(tables::RECIPES)?;
    Ok(recipes.get(recipe_id)?.is_some())
}

/// Remove every recipe of a profile (and their favorites); returns the removed ids
pub(crate) fn remove_for_profile(txn: &WriteTransaction, profile_id: u64) -> Result<Vec<u64>> {
    let recipe_ids = {
        let mut index = txn.open_table(tables::PROFILE_RECIPES)?;
        let ids = index
            .range((profile_id, 0)..=(profile_id, u64::MAX))?
            .map(|entry| entry.map(|(key, _)| key.value().1))
            .collect::<std::result::Result<Vec<u64>, _>>()?;
        for recipe_id in &ids {
            index.remove((profile_id, *recipe_id))?;
        }
        ids
    };

    {
        let mut recipes = txn.open_table(tables::RECIPES)?;
        for recipe_id in &recipe_ids {
            recipes.remove(*recipe_id)?;
        }
    }

    for recipe_id in &recipe_ids {
        favorites::remove_for_recipe(txn, *recipe_id)?;
    }

    Ok(recipe_ids)
}

fn require_profile(txn: &WriteTransaction, profile_id: u64) -> Result<()> {
    if !profiles::exists_in(txn, profile_id)? {
        return Err(AppError::InvalidInput(format!(
            "Profile {} does not exist",
            profile_id
        )));
    }
    Ok(())
}

fn check_owner(recipe_id: u64, profile_id: u64, owner: Option<u64>) -> Result<()> {
    if let Some(owner) = owner
        && owner != profile_id
    {
        tracing::warn!(
            "Account {} attempted to modify recipe {} of profile {}",
            owner,
            recipe_id,
            profile_id
        );
        return Err(AppError::Forbidden);
    }
    Ok(())
}
