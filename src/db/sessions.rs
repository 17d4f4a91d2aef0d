//! Server-side sessions, keyed by the peppered hash of the cookie token.

use redb::{Database, ReadableDatabase, ReadableTable, WriteTransaction};

use crate::db::{decode, encode, tables};
use crate::error::Result;
use crate::models::SessionRecord;

/// Store a new session, removing `previous` in the same transaction
pub fn start(
    db: &Database,
    key: &str,
    record: &SessionRecord,
    previous: Option<&str>,
) -> Result<()> {
    let write_txn = db.begin_write()?;
    {
        let mut sessions = write_txn.open_table(tables::SESSIONS)?;
        if let Some(previous) = previous {
            sessions.remove(previous)?;
        }
        sessions.insert(key, encode(record)?.as_slice())?;
    }
    write_txn.commit()?;

    tracing::info!("Session started for account {}", record.account_id);
    Ok(())
}

/// Look up a live session; missing and expired sessions both yield `None`
pub fn resolve(db: &Database, key: &str, now: i64) -> Result<Option<SessionRecord>> {
    let read_txn = db.begin_read()?;
    let sessions = read_txn.open_table(tables::SESSIONS)?;
    let record = sessions
        .get(key)?
        .map(|bytes| decode::<SessionRecord>(bytes.value()))
        .transpose()?;

    Ok(record.filter(|record| !record.is_expired(now)))
}

/// Remove a session; returns whether it existed
pub fn end(db: &Database, key: &str) -> Result<bool> {
    let write_txn = db.begin_write()?;
    let existed = {
        let mut sessions = write_txn.open_table(tables::SESSIONS)?;
        sessions.remove(key)?.is_some()
    };
    write_txn.commit()?;
    Ok(existed)
}

/// Remove every expired session; returns how many were removed
pub fn purge_expired(db: &Database, now: i64) -> Result<usize> {
    let write_txn = db.begin_write()?;
    let removed = remove_where(&write_txn, |record| record.is_expired(now))?;
    write_txn.commit()?;

    if removed > 0 {
        tracing::info!("Purged {} expired sessions", removed);
    }
    Ok(removed)
}

pub(crate) fn remove_for_account(txn: &WriteTransaction, account_id: u64) -> Result<usize> {
    remove_where(txn, |record| record.account_id == account_id)
}

fn remove_where(
    txn: &WriteTransaction,
    predicate: impl Fn(&SessionRecord) -> bool,
) -> Result<usize> {
    let mut sessions = txn.open_table(tables::SESSIONS)?;

    let mut doomed = Vec::new();
    for entry in sessions.iter()? {
        let (key, bytes) = entry?;
        let record: SessionRecord = decode(bytes.value())?;
        if predicate(&record) {
            doomed.push(key.value().to_string());
        }
    }

    for key in &doomed {
        sessions.remove(key.as_str())?;
    }
    Ok(doomed.len())
}
