use anyhow::Result;
use std::collections::BTreeMap;

use crate::builder::IndexBuilder;
use crate::index::FeatureIndex;
use crate::persist::{IndexStore, FEATURE_INDEX};
use crate::record::ProductRecord;
use crate::tokenizer::Tokenizer;

#[derive(Debug, Default)]
pub struct FeatureIndexBuilder {
    tokenizer: Tokenizer,
    feature_index: FeatureIndex,
}

impl FeatureIndexBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn with_tokenizer(tokenizer: Tokenizer) -> Self {
        Self { tokenizer, ..Self::default() }
    }

    /// Null and empty values are ignored.
    pub fn index_features(&mut self, product_id: &str, features: &BTreeMap<String, Option<String>>) {
        for (key, value) in features {
            let Some(value) = value.as_deref().filter(|v| !v.is_empty()) else { continue };
            for token in self.tokenizer.tokenize(value) {
                self.feature_index.insert(key, &token, product_id);
            }
        }
    }

    pub fn feature_index(&self) -> &FeatureIndex { &self.feature_index }
}

impl IndexBuilder for FeatureIndexBuilder {
    fn name(&self) -> &'static str { "feature" }

    fn index_record(&mut self, product_id: &str, record: &ProductRecord) {
        self.index_features(product_id, &record.product_features);
    }

    fn save(&self, store: &IndexStore) -> Result<()> {
        store.save(FEATURE_INDEX, &self.feature_index)
    }

    fn size(&self) -> usize { self.feature_index.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(pairs: &[(&str, Option<&str>)]) -> BTreeMap<String, Option<String>> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.map(str::to_string))).collect()
    }

    #[test]
    fn tokenizes_each_value() {
        let mut b = FeatureIndexBuilder::new();
        b.index_features("7", &features(&[("brand", Some("Acme Corp")), ("origin", Some("Made in France"))]));
        assert!(b.feature_index().products("brand", "acme").unwrap().contains("7"));
        assert!(b.feature_index().products("brand", "corp").unwrap().contains("7"));
        assert!(b.feature_index().products("origin", "france").unwrap().contains("7"));
        assert!(b.feature_index().products("origin", "in").is_none());
    }

    #[test]
    fn empty_values_contribute_nothing() {
        let mut b = FeatureIndexBuilder::new();
        b.index_features("1", &features(&[("brand", Some("")), ("color", None), ("size", Some("the"))]));
        // "the" is a stop word, so no key is created for "size" either
        assert!(b.feature_index().is_empty());
    }

    #[test]
    fn products_accumulate_under_shared_tokens() {
        let mut b = FeatureIndexBuilder::new();
        b.index_features("1", &features(&[("brand", Some("Acme"))]));
        b.index_features("2", &features(&[("brand", Some("ACME!"))]));
        let ids: Vec<_> = b.feature_index().products("brand", "acme").unwrap().iter().cloned().collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
