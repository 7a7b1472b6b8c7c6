use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::record::ProductRecord;

/// Catalog input: a `.jsonl` file, a `.json` file holding an object or an
/// array of objects, or a directory searched recursively for both.
///
/// Every call to [`CatalogSource::scan`] re-reads the files from the start,
/// so each build pass gets its own iteration.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    files: Vec<PathBuf>,
}

impl CatalogSource {
    pub fn open<P: AsRef<Path>>(input: P) -> Result<Self> {
        let input = input.as_ref();
        let mut files = Vec::new();
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
                let p = entry.path();
                if p.is_file() && is_catalog_file(p) {
                    files.push(p.to_path_buf());
                }
            }
        } else if input.is_file() {
            files.push(input.to_path_buf());
        } else {
            anyhow::bail!("input not found: {}", input.display());
        }
        tracing::debug!(files = files.len(), input = %input.display(), "catalog source opened");
        Ok(Self { files })
    }

    pub fn files(&self) -> &[PathBuf] { &self.files }

    /// Feed every readable record to `f` in file order, then line order.
    /// Lines that fail to parse are logged and skipped.
    pub fn scan<F: FnMut(ProductRecord)>(&self, mut f: F) -> Result<()> {
        for file in &self.files {
            if file.extension().and_then(|s| s.to_str()) == Some("json") {
                scan_json(file, &mut f)?;
            } else {
                scan_jsonl(file, &mut f)?;
            }
        }
        Ok(())
    }

    /// Read the whole catalog into memory.
    pub fn load(&self) -> Result<Vec<ProductRecord>> {
        let mut records = Vec::new();
        self.scan(|r| records.push(r))?;
        Ok(records)
    }
}

fn is_catalog_file(p: &Path) -> bool {
    matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl"))
}

fn scan_jsonl<F: FnMut(ProductRecord)>(file: &Path, f: &mut F) -> Result<()> {
    let mut reader = BufReader::new(File::open(file).with_context(|| format!("opening {}", file.display()))?);
    let mut buf = Vec::new();
    let mut lineno = 0usize;
    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).with_context(|| format!("reading {}", file.display()))?;
        if n == 0 { break; }
        lineno += 1;
        if buf.iter().all(u8::is_ascii_whitespace) { continue; }
        // invalid UTF-8 surfaces here as a parse error, same as malformed JSON
        match serde_json::from_slice::<ProductRecord>(&buf) {
            Ok(record) => f(record),
            Err(err) => tracing::warn!(file = %file.display(), line = lineno, %err, "skipping unparseable record"),
        }
    }
    Ok(())
}

fn scan_json<F: FnMut(ProductRecord)>(file: &Path, f: &mut F) -> Result<()> {
    let reader = BufReader::new(File::open(file).with_context(|| format!("opening {}", file.display()))?);
    let json: serde_json::Value = serde_json::from_reader(reader).with_context(|| format!("parsing {}", file.display()))?;
    let values = match json {
        serde_json::Value::Array(arr) => arr,
        v @ serde_json::Value::Object(_) => vec![v],
        _ => Vec::new(),
    };
    for (i, v) in values.into_iter().enumerate() {
        match serde_json::from_value::<ProductRecord>(v) {
            Ok(record) => f(record),
            Err(err) => tracing::warn!(file = %file.display(), entry = i, %err, "skipping unparseable record"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn skips_bad_lines_and_keeps_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("products.jsonl");
        fs::write(&path, "{\"title\":\"one\"}\nnot json\n\n{\"title\":\"two\"}\n").unwrap();
        let titles: Vec<_> = CatalogSource::open(&path).unwrap().load().unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["one", "two"]);
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("products.jsonl");
        let mut bytes = b"{\"title\":\"chair\"}\n".to_vec();
        bytes.extend_from_slice(b"{\"title\":\"caf\xe9\"}\r\n");
        bytes.extend_from_slice(b"{\"title\":\"desk\"}");
        fs::write(&path, bytes).unwrap();
        let titles: Vec<_> = CatalogSource::open(&path).unwrap().load().unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["chair", "desk"]);
    }

    #[test]
    fn walks_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("a.jsonl"), "{\"title\":\"a\"}\n").unwrap();
        fs::write(dir.path().join("nested/b.json"), "[{\"title\":\"b\"},{\"title\":\"c\"}]").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let source = CatalogSource::open(dir.path()).unwrap();
        assert_eq!(source.files().len(), 2);
        let titles: Vec<_> = source.load().unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(CatalogSource::open(dir.path().join("nope.jsonl")).is_err());
    }
}
