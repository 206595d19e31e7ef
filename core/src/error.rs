use thiserror::Error;

use crate::index::DocId;

/// Errors raised by the index and query engines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// A corpus line that does not split into exactly title, url and body.
    #[error("malformed record at line {line}: expected 3 fields, found {fields}")]
    MalformedRecord { line: usize, fields: usize },

    /// A document id with no entry in the forward index.
    #[error("document id {doc_id} out of range (index holds {len} documents)")]
    OutOfRange { doc_id: DocId, len: usize },
}

pub type Result<T> = std::result::Result<T, IndexError>;
