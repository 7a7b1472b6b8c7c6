use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::builder::BuildStats;
use crate::index::{FeatureIndex, PositionalIndex, ReviewIndex};

pub const TITLE_INDEX: &str = "title_index";
pub const DESCRIPTION_INDEX: &str = "description_index";
pub const FEATURE_INDEX: &str = "feature_index";
pub const REVIEW_INDEX: &str = "review_index";

pub const META_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexFormat {
    /// Pretty-printed JSON, four-space indent.
    #[default]
    Json,
    Bincode,
}

impl IndexFormat {
    fn extension(self) -> &'static str {
        match self {
            IndexFormat::Json => "json",
            IndexFormat::Bincode => "bin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSummary {
    #[serde(flatten)]
    pub stats: BuildStats,
    /// Top-level keys in the saved index.
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub version: u32,
    pub created_at: String,
    pub format: IndexFormat,
    pub indexes: BTreeMap<String, IndexSummary>,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn index(&self, name: &str, format: IndexFormat) -> PathBuf {
        self.root.join(format!("{name}.{}", format.extension()))
    }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

/// Writes finished indexes under their logical names.
pub struct IndexStore {
    paths: IndexPaths,
    format: IndexFormat,
}

impl IndexStore {
    pub fn new<P: AsRef<Path>>(root: P, format: IndexFormat) -> Self {
        Self { paths: IndexPaths::new(root), format }
    }

    pub fn paths(&self) -> &IndexPaths { &self.paths }

    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        create_dir_all(&self.paths.root)
            .with_context(|| format!("creating {}", self.paths.root.display()))?;
        let path = self.paths.index(name, self.format);
        let mut f = BufWriter::new(File::create(&path).with_context(|| format!("creating {}", path.display()))?);
        match self.format {
            IndexFormat::Json => {
                let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
                let mut ser = serde_json::Serializer::with_formatter(&mut f, formatter);
                value.serialize(&mut ser).with_context(|| format!("writing {}", path.display()))?;
            }
            IndexFormat::Bincode => {
                bincode::serialize_into(&mut f, value).with_context(|| format!("writing {}", path.display()))?;
            }
        }
        f.flush()?;
        tracing::debug!(index = name, path = %path.display(), "index saved");
        Ok(())
    }

    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.paths.index(name, self.format);
        let mut f = BufReader::new(File::open(&path).with_context(|| format!("opening {}", path.display()))?);
        let value = match self.format {
            IndexFormat::Json => serde_json::from_reader(f)?,
            IndexFormat::Bincode => {
                let mut buf = Vec::new();
                f.read_to_end(&mut buf)?;
                bincode::deserialize(&buf)?
            }
        };
        Ok(value)
    }

    pub fn load_title_index(&self) -> Result<PositionalIndex> { self.load(TITLE_INDEX) }

    pub fn load_description_index(&self) -> Result<PositionalIndex> { self.load(DESCRIPTION_INDEX) }

    pub fn load_feature_index(&self) -> Result<FeatureIndex> { self.load(FEATURE_INDEX) }

    pub fn load_review_index(&self) -> Result<ReviewIndex> { self.load(REVIEW_INDEX) }

    pub fn save_meta(&self, meta: &MetaFile) -> Result<()> {
        create_dir_all(&self.paths.root)
            .with_context(|| format!("creating {}", self.paths.root.display()))?;
        let path = self.paths.meta();
        let f = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(f, meta).with_context(|| format!("writing {}", path.display()))
    }

    pub fn load_meta(&self) -> Result<MetaFile> {
        let path = self.paths.meta();
        let f = BufReader::new(File::open(&path).with_context(|| format!("opening {}", path.display()))?);
        serde_json::from_reader(f).with_context(|| format!("parsing {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn json_uses_four_space_indent() {
        let dir = tempdir().unwrap();
        let store = IndexStore::new(dir.path(), IndexFormat::Json);
        let mut idx = PositionalIndex::new();
        idx.insert("lamp", "1", 0);
        store.save(TITLE_INDEX, &idx).unwrap();
        let text = std::fs::read_to_string(dir.path().join("title_index.json")).unwrap();
        assert!(text.starts_with("{\n    \"lamp\": {\n        \"1\": ["));
        assert_eq!(store.load_title_index().unwrap(), idx);
    }

    #[test]
    fn meta_round_trip() {
        let dir = tempdir().unwrap();
        let store = IndexStore::new(dir.path(), IndexFormat::Bincode);
        let mut indexes = BTreeMap::new();
        indexes.insert("review".to_string(), IndexSummary { stats: BuildStats { records: 3, indexed: 2, skipped: 1 }, size: 2 });
        let meta = MetaFile { version: META_VERSION, created_at: "2024-01-01T00:00:00Z".into(), format: IndexFormat::Bincode, indexes };
        store.save_meta(&meta).unwrap();
        assert_eq!(store.load_meta().unwrap(), meta);
    }
}
