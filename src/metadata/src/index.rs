use rocksdb::Transaction;
use rocksdb::TransactionDB;

use crate::error::MetadataError;
use crate::Result;

pub fn check_insert_constraints(
    tx: &Transaction<TransactionDB>,
    keys: &[Vec<u8>],
    what: impl Fn(&[u8]) -> String,
) -> Result<()> {
    for key in keys.iter() {
        if tx.get_for_update(key, true)?.is_some() {
            return Err(MetadataError::AlreadyExists(what(key)));
        }
    }
    Ok(())
}

pub fn insert_index(tx: &Transaction<TransactionDB>, keys: &[Vec<u8>]) -> Result<()> {
    for key in keys.iter() {
        tx.put(key, b"")?;
    }
    Ok(())
}

/// Replaces `prev_keys` with `keys`, touching only the entries that differ.
pub fn update_index(
    tx: &Transaction<TransactionDB>,
    keys: &[Vec<u8>],
    prev_keys: &[Vec<u8>],
) -> Result<()> {
    for key in prev_keys.iter().filter(|k| !keys.contains(k)) {
        tx.delete(key)?;
    }
    for key in keys.iter().filter(|k| !prev_keys.contains(k)) {
        tx.put(key, b"")?;
    }

    Ok(())
}

pub fn delete_index(tx: &Transaction<TransactionDB>, keys: &[Vec<u8>]) -> Result<()> {
    for key in keys.iter() {
        tx.delete(key)?;
    }
    Ok(())
}
