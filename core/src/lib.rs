pub mod corpus;
pub mod error;
pub mod index;
pub mod record;
pub mod search;
pub mod tokenizer;

pub use error::IndexError;
pub use index::{BuildReport, DocId, Document, Index, IndexBuilder, Posting, Weight};
pub use record::Record;
pub use search::{generate_snippet, QueryEngine, SearchHit};
pub use tokenizer::{StandardTokenizer, Tokenizer};
