//! Profile store. A profile shares its id with the owning account.

use redb::{Database, ReadableDatabase, ReadableTable, WriteTransaction};

use crate::constants::ERR_PROFILE_EXISTS;
use crate::db::{decode, encode, recipes, tables};
use crate::error::{AppError, Result};
use crate::models::{Profile, ProfileChanges, ProfileRecord};

pub fn find(db: &Database, profile_id: u64) -> Result<Option<Profile>> {
    let read_txn = db.begin_read()?;
    let profiles = read_txn.open_table(tables::PROFILES)?;
    let record = profiles
        .get(profile_id)?
        .map(|bytes| decode::<ProfileRecord>(bytes.value()))
        .transpose()?;
    Ok(record.map(|record| record.into_profile(profile_id)))
}

pub fn get(db: &Database, profile_id: u64) -> Result<Profile> {
    find(db, profile_id)?.ok_or(AppError::ProfileNotFound)
}

/// Profiles visible in the listing: only the requester's own
pub fn list_own(db: &Database, account_id: u64) -> Result<Vec<Profile>> {
    Ok(find(db, account_id)?.into_iter().collect())
}

/// Create the profile of an account that has none
pub fn create(db: &Database, account_id: u64, record: ProfileRecord) -> Result<Profile> {
    let write_txn = db.begin_write()?;
    {
        let accounts = write_txn.open_table(tables::ACCOUNTS)?;
        if accounts.get(account_id)?.is_none() {
            return Err(AppError::NotAuthenticated);
        }

        let mut profiles = write_txn.open_table(tables::PROFILES)?;
        if profiles.get(account_id)?.is_some() {
            return Err(AppError::InvalidInput(ERR_PROFILE_EXISTS.to_string()));
        }
        profiles.insert(account_id, encode(&record)?.as_slice())?;
    }
    write_txn.commit()?;

    tracing::info!("Profile {} created", account_id);
    Ok(record.into_profile(account_id))
}

/// Apply changes to a profile
///
/// When `owner` is given, only that account may modify the profile.
pub fn update(
    db: &Database,
    profile_id: u64,
    changes: ProfileChanges,
    owner: Option<u64>,
) -> Result<Profile> {
    let write_txn = db.begin_write()?;
    let record = {
        let mut profiles = write_txn.open_table(tables::PROFILES)?;
        let mut record: ProfileRecord = match profiles.get(profile_id)? {
            Some(bytes) => decode(bytes.value())?,
            None => return Err(AppError::ProfileNotFound),
        };
        check_owner(profile_id, owner)?;

        changes.apply(&mut record);
        profiles.insert(profile_id, encode(&record)?.as_slice())?;
        record
    };
    write_txn.commit()?;

    tracing::info!("Profile {} updated", profile_id);
    Ok(record.into_profile(profile_id))
}

/// Delete a profile together with its recipes
///
/// The account itself survives and may create a new profile.
pub fn delete(db: &Database, profile_id: u64, owner: Option<u64>) -> Result<()> {
    let write_txn = db.begin_write()?;
    {
        if !exists_in(&write_txn, profile_id)? {
            return Err(AppError::ProfileNotFound);
        }
        check_owner(profile_id, owner)?;
        remove_in(&write_txn, profile_id)?;
    }
    write_txn.commit()?;

    tracing::info!("Profile {} deleted", profile_id);
    Ok(())
}

pub(crate) fn exists_in(txn: &WriteTransaction, profile_id: u64) -> Result<bool> {
    let profiles = txn.open_table(tables::PROFILES)?;
    Ok(profiles.get(profile_id)?.is_some())
}

/// Remove a profile and cascade to its recipes; returns whether it existed
pub(crate) fn remove_in(txn: &WriteTransaction, profile_id: u64) -> Result<bool> {
    let existed = {
        let mut profiles = txn.open_table(tables::PROFILES)?;
        profiles.remove(profile_id)?.is_some()
    };

    let removed = recipes::remove_for_profile(txn, profile_id)?;
    if !removed.is_empty() {
        tracing::info!(
            "Removed {} recipes of profile {}",
            removed.len(),
            profile_id
        );
    }

    Ok(existed)
}

fn check_owner(profile_id: u64, owner: Option<u64>) -> Result<()> {
    if let Some(owner) = owner
        && owner != profile_id
    {
        tracing::warn!(
            "Account {} attempted to modify profile {}",
            owner,
            profile_id
        );
        return Err(AppError::Forbidden);
    }
    Ok(())
}
