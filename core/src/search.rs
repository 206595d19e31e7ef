use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::sync::Arc;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::index::{Index, Posting};
use crate::tokenizer::Tokenizer;

/// Characters kept before the first match.
pub const SNIPPET_LEAD: usize = 60;
/// Maximum snippet length in characters, before the marker.
pub const SNIPPET_WIDTH: usize = 160;
pub const TRUNCATION_MARKER: &str = "...";

/// One displayable search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub title: String,
    pub show_url: String,
    pub click_url: String,
    #[serde(rename = "desc")]
    pub description: String,
}

/// Answers free-text queries against a built [`Index`].
pub struct QueryEngine<T: Tokenizer> {
    index: Arc<Index>,
    tokenizer: T,
}

impl<T: Tokenizer> QueryEngine<T> {
    pub fn new(index: Arc<Index>, tokenizer: T) -> Self {
        Self { index, tokenizer }
    }

    pub fn index(&self) -> &Index { &self.index }

    /// Ranked hits for `query`, highest weight first.
    ///
    /// Every matching (term, document) pair becomes its own hit, so a document
    /// matching two query terms appears twice. Equal weights keep gather order:
    /// query term order first, then document build order.
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let terms = self.tokenizer.tokenize(query);
        let mut gathered: Vec<(&str, &Posting)> = Vec::new();
        for term in &terms {
            gathered.extend(self.index.lookup_postings(term).iter().map(|p| (term.as_str(), p)));
        }
        // stable
        gathered.sort_by_key(|(_, p)| Reverse(p.weight));

        let mut hits = Vec::with_capacity(gathered.len());
        for (term, posting) in gathered {
            let doc = self.index.lookup_document(posting.doc_id)?;
            hits.push(SearchHit {
                title: doc.title.clone(),
                show_url: doc.url.clone(),
                click_url: doc.url.clone(),
                description: generate_snippet(&doc.body, term),
            });
        }
        tracing::debug!(query, terms = terms.len(), hits = hits.len(), "search");
        Ok(hits)
    }
}

/// Excerpt of `body` around the first occurrence of `term`.
///
/// The body is matched in the tokenizer's normal form (NFKC, lowercase), so any
/// term produced from the body is found again. The window is cut from the
/// original text: it starts up to [`SNIPPET_LEAD`] characters before the match
/// and spans at most [`SNIPPET_WIDTH`] characters, followed by
/// [`TRUNCATION_MARKER`] when the body continues past the window. Returns an
/// empty string when the body does not contain the term.
pub fn generate_snippet(body: &str, term: &str) -> String {
    let chars: Vec<char> = body.chars().collect();
    let Some(pos) = find_normalized(body, term) else {
        return String::new();
    };
    let start = pos.saturating_sub(SNIPPET_LEAD);
    if start + SNIPPET_WIDTH >= chars.len() {
        return chars[start..].iter().collect();
    }
    let mut snippet: String = chars[start..start + SNIPPET_WIDTH].iter().collect();
    snippet.push_str(TRUNCATION_MARKER);
    snippet
}

// Original char index of the first match of `term` in the normalized body.
fn find_normalized(body: &str, term: &str) -> Option<usize> {
    let (needle, _) = normalize(term);
    let (hay, origin) = normalize(body);
    if needle.is_empty() || needle.len() > hay.len() {
        return None;
    }
    (0..=hay.len() - needle.len())
        .find(|&i| hay[i..i + needle.len()] == needle[..])
        .map(|i| origin[i])
}

// NFKC + lowercase, one base char plus its combining marks at a time so that
// composition still applies. Each output char records the original char index
// of the cluster it came from.
fn normalize(text: &str) -> (Vec<char>, Vec<usize>) {
    let mut out = Vec::with_capacity(text.len());
    let mut origin = Vec::with_capacity(text.len());
    let mut cluster = String::new();
    let mut cluster_start = 0;
    for (i, c) in text.chars().enumerate() {
        if !cluster.is_empty() && !is_combining_mark(c) {
            push_cluster(&cluster, cluster_start, &mut out, &mut origin);
            cluster.clear();
        }
        if cluster.is_empty() {
            cluster_start = i;
        }
        cluster.push(c);
    }
    push_cluster(&cluster, cluster_start, &mut out, &mut origin);
    (out, origin)
}

fn push_cluster(cluster: &str, start: usize, out: &mut Vec<char>, origin: &mut Vec<usize>) {
    for c in cluster.nfkc().flat_map(char::to_lowercase) {
        // final sigma lowercases differently depending on position
        out.push(if c == 'ς' { 'σ' } else { c });
        origin.push(start);
    }
}
