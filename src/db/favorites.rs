//! Favorite index: (account, recipe) bookmarks with idempotent add/remove.
//!
//! Every pair is stored twice, keyed `(account, recipe)` in [`tables::FAVORITES`]
//! and `(recipe, account)` in [`tables::RECIPE_FAVORITES`], so that deleting
//! either side can find its favorites with a range scan. Both tables are
//! always written in the same transaction.
//!
//! redb admits a single write transaction at a time, so the existence check
//! and the insert in [`add`] cannot interleave with another `add` for the same
//! pair: concurrent duplicates serialize and exactly one of them creates the row.

use redb::{Database, ReadableDatabase, ReadableTable, WriteTransaction};

use crate::db::{decode, recipes, tables};
use crate::error::{AppError, Result};
use crate::models::{Favorite, Recipe, RecipeRecord};

/// Get-or-create the favorite for `(account_id, recipe_id)`
///
/// Returns the favorite and whether this call created it.
pub fn add(db: &Database, account_id: u64, recipe_id: u64, now: i64) -> Result<(Favorite, bool)> {
    let write_txn = db.begin_write()?;
    let (favorite, created) = {
        if !recipes::exists_in(&write_txn, recipe_id)? {
            return Err(AppError::RecipeNotFound);
        }

        let mut by_account = write_txn.open_table(tables::FAVORITES)?;
        let existing = by_account
            .get((account_id, recipe_id))?
            .map(|created_at| created_at.value());

        match existing {
            Some(created_at) => (
                Favorite {
                    account_id,
                    recipe_id,
                    created_at,
                },
                false,
            ),
            None => {
                by_account.insert((account_id, recipe_id), now)?;
                let mut by_recipe = write_txn.open_table(tables::RECIPE_FAVORITES)?;
                by_recipe.insert((recipe_id, account_id), now)?;
                (
                    Favorite {
                        account_id,
                        recipe_id,
                        created_at: now,
                    },
                    true,
                )
            }
        }
    };

    // Nothing to persist for an existing favorite
    if created {
        write_txn.commit()?;
        tracing::info!("Account {} favorited recipe {}", account_id, recipe_id);
    } else {
        write_txn.abort()?;
    }

    Ok((favorite, created))
}

/// Remove the favorite for `(account_id, recipe_id)`
///
/// Fails with [`AppError::RecipeNotFound`] if the recipe is gone and
/// [`AppError::NotInFavorites`] if the pair was never favorited.
pub fn remove(db: &Database, account_id: u64, recipe_id: u64) -> Result<()> {
    let write_txn = db.begin_write()?;
    {
        if !recipes::exists_in(&write_txn, recipe_id)? {
            return Err(AppError::RecipeNotFound);
        }

        let mut by_account = write_txn.open_table(tables::FAVORITES)?;
        if by_account.remove((account_id, recipe_id))?.is_none() {
            return Err(AppError::NotInFavorites);
        }

        let mut by_recipe = write_txn.open_table(tables::RECIPE_FAVORITES)?;
        by_recipe.remove((recipe_id, account_id))?;
    }
    write_txn.commit()?;

    tracing::info!("Account {} unfavorited recipe {}", account_id, recipe_id);
    Ok(())
}

pub fn is_favorited(db: &Database, account_id: u64, recipe_id: u64) -> Result<bool> {
    let read_txn = db.begin_read()?;
    let by_account = read_txn.open_table(tables::FAVORITES)?;
    Ok(by_account.get((account_id, recipe_id))?.is_some())
}

/// Recipes favorited by an account, ordered by recipe id
pub fn list_recipes(db: &Database, account_id: u64) -> Result<Vec<Recipe>> {
    let read_txn = db.begin_read()?;
    let by_account = read_txn.open_table(tables::FAVORITES)?;
    let recipes_table = read_txn.open_table(tables::RECIPES)?;

    let mut recipes = Vec::new();
    for entry in by_account.range((account_id, 0)..=(account_id, u64::MAX))? {
        let (key, _) = entry?;
        let (_, recipe_id) = key.value();
        // Both sides are deleted together, a dangling pair is a broken invariant
        let Some(bytes) = recipes_table.get(recipe_id)? else {
            tracing::error!(
                "Favorite ({}, {}) points at a missing recipe",
                account_id,
                recipe_id
            );
            continue;
        };
        let record: RecipeRecord = decode(bytes.value())?;
        recipes.push(record.to_recipe(recipe_id));
    }
    Ok(recipes)
}

/// Number of accounts that favorited a recipe
pub fn count_for_recipe(db: &Database, recipe_id: u64) -> Result<usize> {
    let read_txn = db.begin_read()?;
    let by_recipe = read_txn.open_table(tables::RECIPE_FAVORITES)?;
    let count = by_recipe
        .range((recipe_id, 0)..=(recipe_id, u64::MAX))?
        .count();
    Ok(count)
}

/// Drop every favorite made by an account
pub(crate) fn remove_for_account(txn: &WriteTransaction, account_id: u64) -> Result<usize> {
    let mut by_account = txn.open_table(tables::FAVORITES)?;
    let mut by_recipe = txn.open_table(tables::RECIPE_FAVORITES)?;

    let recipe_ids = by_account
        .range((account_id, 0)..=(account_id, u64::MAX))?
        .map(|entry| entry.map(|(key, _)| key.value().1))
        .collect::<std::result::Result<Vec<u64>, _>>()?;

    for recipe_id in &recipe_ids {
        by_account.remove((account_id, *recipe_id))?;
        by_recipe.remove((*recipe_id, account_id))?;
    }
    Ok(recipe_ids.len())
}

/// Drop every favorite pointing at a recipe
pub(crate) fn remove_for_recipe(txn: &WriteTransaction, recipe_id: u64) -> Result<usize> {
    let mut by_account = txn.open_table(tables::FAVORITES)?;
    let mut by_recipe = txn.open_table(tables::RECIPE_FAVORITES)?;

    let account_ids = by_recipe
        .range((recipe_id, 0)..=(recipe_id, u64::MAX))?
        .map(|entry| entry.map(|(key, _)| key.value().1))
        .collect::<std::result::Result<Vec<u64>, _>>()?;

    for account_id in &account_ids {
        by_recipe.remove((recipe_id, *account_id))?;
        by_account.remove((*account_id, recipe_id))?;
    }
    Ok(account_ids.len())
}
