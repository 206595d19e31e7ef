use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::{IndexError, Result};
use crate::record::Record;
use crate::tokenizer::Tokenizer;

pub type DocId = u32;
pub type Weight = u32;

/// Occurrences in the title count this many times more than body occurrences.
pub const TITLE_BOOST: Weight = 10;

/// Forward index entry. `id` equals its position in the forward index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub url: String,
    pub body: String,
}

/// One (document, weight) entry of a term's postings list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: Weight, // TITLE_BOOST * title count + body count
}

/// A corpus line skipped during the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub line: usize,
    pub error: IndexError,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildTimings {
    pub forward: Duration,
    pub inverted: Duration,
}

/// Summary of a finished build.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub documents: usize,
    pub terms: usize,
    pub postings: usize,
    pub skipped: Vec<SkippedRecord>,
    pub timings: BuildTimings,
    pub elapsed: Duration,
}

#[derive(Default)]
struct TermCount {
    title: Weight,
    body: Weight,
}

/// Single-writer phase of the index. Consumed by [`IndexBuilder::finish`].
pub struct IndexBuilder<'t, T: Tokenizer + ?Sized> {
    tokenizer: &'t T,
    docs: Vec<Document>,
    postings: HashMap<String, Vec<Posting>>,
    skipped: Vec<SkippedRecord>,
    timings: BuildTimings,
    started: Instant,
}

impl<'t, T: Tokenizer + ?Sized> IndexBuilder<'t, T> {
    pub fn new(tokenizer: &'t T) -> Self {
        Self {
            tokenizer,
            docs: Vec::new(),
            postings: HashMap::new(),
            skipped: Vec::new(),
            timings: BuildTimings::default(),
            started: Instant::now(),
        }
    }

    /// Parse and index one raw corpus line.
    ///
    /// Blank lines are ignored. A malformed line is logged and recorded in the
    /// report; the builder stays usable. Returns the id of the new document.
    pub fn add_record(&mut self, line_no: usize, raw: &str) -> Option<DocId> {
        if raw.trim().is_empty() {
            return None;
        }
        match Record::parse(line_no, raw) {
            Ok(record) => Some(self.add_document(record.title, record.url, record.body)),
            Err(error) => {
                tracing::warn!(line = line_no, %error, "skipping malformed corpus record");
                self.skipped.push(SkippedRecord { line: line_no, error });
                None
            }
        }
    }

    pub fn add_document(&mut self, title: String, url: String, body: String) -> DocId {
        let t0 = Instant::now();
        let doc_id = self.docs.len() as DocId;
        self.docs.push(Document { id: doc_id, title, url, body });
        let t1 = Instant::now();
        self.index_terms(doc_id);
        self.timings.forward += t1 - t0;
        self.timings.inverted += t1.elapsed();
        doc_id
    }

    fn index_terms(&mut self, doc_id: DocId) {
        let doc = &self.docs[doc_id as usize];
        let mut counts: HashMap<String, TermCount> = HashMap::new();
        for term in self.tokenizer.tokenize(&doc.title) {
            counts.entry(term).or_default().title += 1;
        }
        for term in self.tokenizer.tokenize(&doc.body) {
            counts.entry(term).or_default().body += 1;
        }
        for (term, count) in counts {
            let weight = TITLE_BOOST * count.title + count.body;
            self.postings.entry(term).or_default().push(Posting { doc_id, weight });
        }
    }

    /// Freeze into a read-only index.
    pub fn finish(self) -> (Index, BuildReport) {
        let report = BuildReport {
            documents: self.docs.len(),
            terms: self.postings.len(),
            postings: self.postings.values().map(Vec::len).sum(),
            skipped: self.skipped,
            timings: self.timings,
            elapsed: self.started.elapsed(),
        };
        tracing::info!(
            documents = report.documents,
            terms = report.terms,
            postings = report.postings,
            skipped = report.skipped.len(),
            forward_ms = report.timings.forward.as_millis() as u64,
            inverted_ms = report.timings.inverted.as_millis() as u64,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "index build complete"
        );
        (Index { docs: self.docs, postings: self.postings }, report)
    }
}

/// Forward and inverted index. Immutable once built; share behind an `Arc`.
#[derive(Debug, Default)]
pub struct Index {
    docs: Vec<Document>,
    postings: HashMap<String, Vec<Posting>>,
}

impl Index {
    /// Build from raw corpus lines. Lines are numbered from 1 in the report.
    pub fn build<T, I, S>(tokenizer: &T, corpus: I) -> (Index, BuildReport)
    where
        T: Tokenizer + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = IndexBuilder::new(tokenizer);
        for (i, line) in corpus.into_iter().enumerate() {
            builder.add_record(i + 1, line.as_ref());
        }
        builder.finish()
    }

    pub fn lookup_document(&self, id: DocId) -> Result<&Document> {
        self.docs
            .get(id as usize)
            .ok_or(IndexError::OutOfRange { doc_id: id, len: self.docs.len() })
    }

    /// Postings for `term` in document build order; empty if the term is unknown.
    pub fn lookup_postings(&self, term: &str) -> &[Posting] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn num_docs(&self) -> usize { self.docs.len() }

    pub fn num_terms(&self) -> usize { self.postings.len() }
}
