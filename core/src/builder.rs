use anyhow::Result;
use std::borrow::Borrow;

use crate::identity::extract_product_info;
use crate::persist::IndexStore;
use crate::record::ProductRecord;
use crate::source::CatalogSource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BuildStats {
    pub records: usize,
    pub indexed: usize,
    pub skipped: usize,
}

impl BuildStats {
    fn record(&mut self, indexed: bool) {
        self.records += 1;
        if indexed { self.indexed += 1 } else { self.skipped += 1 }
    }
}

/// A single-pass index builder over catalog records.
///
/// Records are folded in input order; a record whose URL carries no product
/// id contributes nothing. The index is considered final once the pass that
/// fed it returns.
pub trait IndexBuilder {
    /// Label used in logs and in the build metadata.
    fn name(&self) -> &'static str;

    /// Fold one record whose identity has already been resolved.
    fn index_record(&mut self, product_id: &str, record: &ProductRecord);

    /// Hand the finished index to the store.
    fn save(&self, store: &IndexStore) -> Result<()>;

    /// Number of top-level keys in the built index.
    fn size(&self) -> usize;

    /// Resolve identity and fold; returns whether the record was indexed.
    fn ingest(&mut self, record: &ProductRecord) -> bool {
        match extract_product_info(&record.url).product_id() {
            Some(id) => {
                self.index_record(id, record);
                true
            }
            None => false,
        }
    }

    fn build_from_stream<I, R>(&mut self, records: I) -> BuildStats
    where
        Self: Sized,
        I: IntoIterator<Item = R>,
        R: Borrow<ProductRecord>,
    {
        let mut stats = BuildStats::default();
        for record in records {
            stats.record(self.ingest(record.borrow()));
        }
        tracing::info!(index = self.name(), records = stats.records, indexed = stats.indexed, skipped = stats.skipped, "build pass complete");
        stats
    }

    /// Stream the source once; only I/O failures abort the pass.
    fn build_from_source(&mut self, source: &CatalogSource) -> Result<BuildStats>
    where
        Self: Sized,
    {
        let mut stats = BuildStats::default();
        source.scan(|record| stats.record(self.ingest(&record)))?;
        tracing::info!(index = self.name(), records = stats.records, indexed = stats.indexed, skipped = stats.skipped, "build pass complete");
        Ok(stats)
    }
}
