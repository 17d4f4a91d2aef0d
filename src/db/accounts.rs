//! Identity store: accounts and their unique email index.

use redb::{Database, ReadableDatabase, ReadableTable};

use crate::db::{ACCOUNT_SEQUENCE, decode, encode, favorites, next_id, profiles, sessions, tables};
use crate::error::{AppError, Result};
use crate::models::account::email_index_key;
use crate::models::{AccountRecord, Profile, ProfileRecord};
use crate::security::verify_password;

/// Create an account together with its profile in one write transaction
///
/// The email check and the insert share the transaction, so two concurrent
/// registrations for the same address cannot both succeed.
pub fn create_with_profile(
    db: &Database,
    email: &str,
    password_hash: String,
    profile: ProfileRecord,
    now: i64,
) -> Result<Profile> {
    let email_key = email_index_key(email);

    let write_txn = db.begin_write()?;
    let account_id = {
        let mut emails = write_txn.open_table(tables::ACCOUNT_EMAILS)?;
        if emails.get(email_key.as_str())?.is_some() {
            tracing::info!("Registration rejected: email already in use");
            return Err(AppError::EmailTaken);
        }

        let account_id = next_id(&write_txn, ACCOUNT_SEQUENCE)?;
        emails.insert(email_key.as_str(), account_id)?;

        let record = AccountRecord {
            email: email.to_string(),
            password_hash,
            created_at: now,
        };
        let mut accounts = write_txn.open_table(tables::ACCOUNTS)?;
        accounts.insert(account_id, encode(&record)?.as_slice())?;

        let mut profiles = write_txn.open_table(tables::PROFILES)?;
        profiles.insert(account_id, encode(&profile)?.as_slice())?;

        account_id
    };
    write_txn.commit()?;

    tracing::info!("New account registered: {}", account_id);
    Ok(profile.into_profile(account_id))
}

/// Look up an account by email (case-insensitive)
pub fn find_by_email(db: &Database, email: &str) -> Result<Option<(u64, AccountRecord)>> {
    let read_txn = db.begin_read()?;
    let emails = read_txn.open_table(tables::ACCOUNT_EMAILS)?;
    let Some(account_id) = emails.get(email_index_key(email).as_str())?.map(|id| id.value())
    else {
        return Ok(None);
    };

    let accounts = read_txn.open_table(tables::ACCOUNTS)?;
    let record = accounts
        .get(account_id)?
        .map(|bytes| decode::<AccountRecord>(bytes.value()))
        .transpose()?;

    Ok(record.map(|record| (account_id, record)))
}

pub fn get(db: &Database, account_id: u64) -> Result<Option<AccountRecord>> {
    let read_txn = db.begin_read()?;
    let accounts = read_txn.open_table(tables::ACCOUNTS)?;
    let record = accounts
        .get(account_id)?
        .map(|bytes| decode(bytes.value()))
        .transpose()?;
    Ok(record)
}

/// Check credentials; unknown email and wrong password are indistinguishable
pub fn authenticate(db: &Database, email: &str, password: &str) -> Result<(u64, AccountRecord)> {
    let Some((account_id, record)) = find_by_email(db, email)? else {
        tracing::warn!("Login attempt for unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &record.password_hash)? {
        tracing::warn!("Login attempt with wrong password for account {}", account_id);
        return Err(AppError::InvalidCredentials);
    }

    Ok((account_id, record))
}

/// Delete an account and everything hanging off it
///
/// Removes, in one transaction:
/// - Account record and email index entry
/// - Profile, its recipes and the favorites on those recipes
/// - Favorites made by the account
/// - All sessions of the account
pub fn delete(db: &Database, account_id: u64) -> Result<()> {
    let write_txn = db.begin_write()?;
    {
        let mut accounts = write_txn.open_table(tables::ACCOUNTS)?;
        let record: AccountRecord = match accounts.remove(account_id)? {
            Some(bytes) => decode(bytes.value())?,
            None => {
                tracing::warn!("Delete attempt for non-existent account {}", account_id);
                return Err(AppError::NotAuthenticated);
            }
        };
        drop(accounts);

        let mut emails = write_txn.open_table(tables::ACCOUNT_EMAILS)?;
        emails.remove(email_index_key(&record.email).as_str())?;
        drop(emails);

        profiles::remove_in(&write_txn, account_id)?;
        favorites::remove_for_account(&write_txn, account_id)?;
        sessions::remove_for_account(&write_txn, account_id)?;
    }
    write_txn.commit()?;

    tracing::info!("Account {} and all associated data deleted", account_id);
    Ok(())
}
