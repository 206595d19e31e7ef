use anyhow::{anyhow, Result};
use scraper::Html;
use search_core::corpus::write_corpus;
use search_core::Record;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DEFAULT_BASE_URL: &str = "https://docs.oracle.com/javase/8/docs/api";

/// Turns a local tree of HTML documents into corpus records whose URLs point
/// at the published copy under `base_url`.
pub struct Extractor {
    root: PathBuf,
    base_url: String,
}

#[derive(Debug, Default)]
pub struct ExtractStats {
    pub written: usize,
    pub failed: usize,
}

impl Extractor {
    pub fn new<P: AsRef<Path>>(root: P, base_url: &str) -> Self {
        Self { root: root.as_ref().to_path_buf(), base_url: base_url.trim_end_matches('/').to_string() }
    }

    /// All `.html` files below the root, sorted so document ids are reproducible.
    pub fn enumerate(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("html"))
            .collect();
        files.sort();
        files
    }

    pub fn convert(&self, file: &Path) -> Result<Record> {
        let html = fs::read_to_string(file)?;
        Ok(Record::new(convert_title(file), self.convert_url(file)?, convert_content(&html)))
    }

    fn convert_url(&self, file: &Path) -> Result<String> {
        let rel = file
            .strip_prefix(&self.root)
            .map_err(|_| anyhow!("{} is outside {}", file.display(), self.root.display()))?;
        let parts: Vec<String> = rel.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
        Ok(format!("{}/{}", self.base_url, parts.join("/")))
    }

    /// Convert every document and write the corpus file. Unreadable documents are skipped.
    pub fn run<P: AsRef<Path>>(&self, output: P) -> Result<ExtractStats> {
        let files = self.enumerate();
        tracing::info!(root = %self.root.display(), files = files.len(), "extracting documents");
        let mut stats = ExtractStats::default();
        let mut records = Vec::with_capacity(files.len());
        for file in &files {
            tracing::debug!(file = %file.display(), "converting");
            match self.convert(file) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(file = %file.display(), error = %e, "skipping document");
                    stats.failed += 1;
                }
            }
        }
        stats.written = write_corpus(output, records)?;
        Ok(stats)
    }
}

/// File name without the `.html` suffix.
fn convert_title(file: &Path) -> String {
    file.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Text content with markup removed and line breaks turned into spaces.
fn convert_content(html: &str) -> String {
    let doc = Html::parse_document(html);
    doc.root_element()
        .text()
        .flat_map(|t| t.chars())
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}
