use anyhow::{Context, Result};
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::index::{BuildReport, IndexBuilder, Index};
use crate::record::Record;
use crate::tokenizer::Tokenizer;

/// Read every line of a corpus file. Lines are returned raw; parsing happens in the build.
pub fn read_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening corpus {}", path.display()))?;
    let lines = BufReader::new(f).lines().collect::<std::io::Result<Vec<_>>>()?;
    Ok(lines)
}

/// Write records one per line, creating parent directories as needed.
pub fn write_corpus<P, I>(path: P, records: I) -> Result<usize>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = Record>,
{
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir)?;
    }
    let mut out = BufWriter::new(File::create(path).with_context(|| format!("creating corpus {}", path.display()))?);
    let mut written = 0usize;
    for record in records {
        out.write_all(record.to_line().as_bytes())?;
        out.write_all(b"\n")?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

/// Build an index from a corpus file, streaming lines into the builder.
pub fn build_from_file<P, T>(path: P, tokenizer: &T) -> Result<(Index, BuildReport)>
where
    P: AsRef<Path>,
    T: Tokenizer + ?Sized,
{
    let path = path.as_ref();
    tracing::info!(corpus = %path.display(), "building index");
    let f = File::open(path).with_context(|| format!("opening corpus {}", path.display()))?;
    let mut builder = IndexBuilder::new(tokenizer);
    for (i, line) in BufReader::new(f).lines().enumerate() {
        builder.add_record(i + 1, &line?);
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::StandardTokenizer;
    use tempfile::tempdir;

    #[test]
    fn write_then_build() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/raw_data.txt");
        let records = vec![
            Record::new("HashMap", "https://docs/HashMap.html", "Hash table based map"),
            Record::new("TreeMap", "https://docs/TreeMap.html", "Red black tree map"),
        ];
        assert_eq!(write_corpus(&path, records).unwrap(), 2);
        assert_eq!(read_corpus(&path).unwrap().len(), 2);

        let (index, report) = build_from_file(&path, &StandardTokenizer::new()).unwrap();
        assert_eq!(report.documents, 2);
        assert!(report.skipped.is_empty());
        assert_eq!(index.lookup_document(1).unwrap().title, "TreeMap");
        assert_eq!(index.lookup_postings("map").len(), 2);
    }

    #[test]
    fn blank_lines_match_in_memory_build() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw_data.txt");
        let body = format!("{}\n\nnot a record\n{}\n", Record::new("A", "u", "x").to_line(), Record::new("B", "u", "y").to_line());
        std::fs::write(&path, &body).unwrap();

        let tokenizer = StandardTokenizer::new();
        let (from_file, file_report) = build_from_file(&path, &tokenizer).unwrap();
        let (in_memory, memory_report) = Index::build(&tokenizer, body.lines());
        assert_eq!(from_file.num_docs(), 2);
        assert_eq!(in_memory.num_docs(), 2);
        assert_eq!(file_report.skipped, memory_report.skipped);
        assert_eq!(file_report.skipped[0].line, 3);
    }

    #[test]
    fn missing_corpus_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(build_from_file(dir.path().join("absent.txt"), &StandardTokenizer::new()).is_err());
    }
}
