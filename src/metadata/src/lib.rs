pub mod error;
pub mod index;
pub mod metadata;
pub mod pull_requests;
pub mod rocksdb;
pub mod teams;
pub mod users;

use bincode::deserialize;
pub use error::Result;
use ::rocksdb::Transaction;
use ::rocksdb::TransactionDB;
use serde::de::DeserializeOwned;

pub use crate::metadata::ListResponse;
pub use crate::metadata::MetadataProvider;
pub use crate::metadata::ResponseMetadata;

pub fn make_data_value_key(ns: &[u8], id: &str) -> Vec<u8> {
    [ns, b"/data/", id.as_bytes()].concat()
}

pub fn make_data_key(ns: &[u8]) -> Vec<u8> {
    [ns, b"/data/"].concat()
}

/// Index keys embed the length of `key` so that a prefix scan over one key
/// never bleeds into a longer key sharing the same leading bytes.
pub fn make_index_key(ns: &[u8], idx_name: &[u8], key: &str) -> Vec<u8> {
    [
        ns,
        b"/idx/",
        idx_name,
        b"/",
        (key.len() as u32).to_le_bytes().as_ref(),
        key.as_bytes(),
    ]
    .concat()
}

pub fn make_index_value_key(ns: &[u8], idx_name: &[u8], key: &str, value: &str) -> Vec<u8> {
    [make_index_key(ns, idx_name, key).as_slice(), value.as_bytes()].concat()
}

pub fn list_data<T>(tx: &Transaction<TransactionDB>, ns: &[u8]) -> Result<Vec<T>>
where T: DeserializeOwned {
    let prefix = make_data_key(ns);

    let mut list = vec![];
    for kv in tx.prefix_iterator(prefix.clone()) {
        let (key, value) = kv?;
        if !key.starts_with(&prefix) {
            break;
        }
        list.push(deserialize(&value)?);
    }

    Ok(list)
}

/// Returns the suffixes of every key stored under `prefix`.
pub fn list_key_suffixes(tx: &Transaction<TransactionDB>, prefix: &[u8]) -> Result<Vec<String>> {
    let mut list = vec![];
    for kv in tx.prefix_iterator(prefix) {
        let (key, _) = kv?;
        if !key.starts_with(prefix) {
            break;
        }
        list.push(String::from_utf8(key[prefix.len()..].to_vec())?);
    }

    Ok(list)
}
