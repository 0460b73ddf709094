use std::path::Path;

use rocksdb::Options;
use rocksdb::TransactionDB;
use rocksdb::TransactionDBOptions;

use crate::Result;

pub fn new<P: AsRef<Path>>(path: P) -> Result<TransactionDB> {
    let mut opts = Options::default();
    opts.create_if_missing(true);

    let txopts = TransactionDBOptions::default();

    Ok(TransactionDB::open(&opts, &txopts, path)?)
}
