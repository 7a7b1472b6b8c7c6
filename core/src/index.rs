use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::record::Rating;

pub type ProductId = String;
pub type Token = String;
pub type Position = usize;

/// token -> product -> positions of the token within that product's field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionalIndex {
    postings: BTreeMap<Token, BTreeMap<ProductId, BTreeSet<Position>>>,
}

impl PositionalIndex {
    pub fn new() -> Self { Self::default() }

    /// Returns false when the position was already recorded.
    pub fn insert(&mut self, token: &str, product_id: &str, position: Position) -> bool {
        let docs = self.postings.entry(token.to_string()).or_insert_with(BTreeMap::new);
        let positions = docs.entry(product_id.to_string()).or_insert_with(BTreeSet::new);
        positions.insert(position)
    }

    pub fn documents(&self, token: &str) -> Option<&BTreeMap<ProductId, BTreeSet<Position>>> {
        self.postings.get(token)
    }

    pub fn positions(&self, token: &str, product_id: &str) -> Option<&BTreeSet<Position>> {
        self.postings.get(token)?.get(product_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Token, &BTreeMap<ProductId, BTreeSet<Position>>)> {
        self.postings.iter()
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }
}

/// feature key -> token -> products whose value under that key contains the token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureIndex {
    features: BTreeMap<String, BTreeMap<Token, BTreeSet<ProductId>>>,
}

impl FeatureIndex {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, key: &str, token: &str, product_id: &str) -> bool {
        let tokens = self.features.entry(key.to_string()).or_insert_with(BTreeMap::new);
        let products = tokens.entry(token.to_string()).or_insert_with(BTreeSet::new);
        products.insert(product_id.to_string())
    }

    pub fn tokens(&self, key: &str) -> Option<&BTreeMap<Token, BTreeSet<ProductId>>> {
        self.features.get(key)
    }

    pub fn products(&self, key: &str, token: &str) -> Option<&BTreeSet<ProductId>> {
        self.features.get(key)?.get(token)
    }

    /// Number of distinct feature keys.
    pub fn len(&self) -> usize { self.features.len() }

    pub fn is_empty(&self) -> bool { self.features.is_empty() }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub total_reviews: usize,
    /// Sum of numeric ratings over `total_reviews`, not over the numeric count.
    pub avg_rating: f64,
    pub latest_rating: Rating,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewIndex {
    stats: BTreeMap<ProductId, ReviewStats>,
}

impl ReviewIndex {
    pub fn new() -> Self { Self::default() }

    /// Replaces any previous entry for the product.
    pub fn insert(&mut self, product_id: &str, stats: ReviewStats) {
        self.stats.insert(product_id.to_string(), stats);
    }

    pub fn get(&self, product_id: &str) -> Option<&ReviewStats> {
        self.stats.get(product_id)
    }

    /// 0.0 for products without an entry.
    pub fn avg_rating(&self, product_id: &str) -> f64 {
        self.get(product_id).map_or(0.0, |s| s.avg_rating)
    }

    pub fn latest_rating(&self, product_id: &str) -> Option<Rating> {
        self.get(product_id).map(|s| s.latest_rating)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProductId, &ReviewStats)> {
        self.stats.iter()
    }

    pub fn len(&self) -> usize { self.stats.len() }

    pub fn is_empty(&self) -> bool { self.stats.is_empty() }
}
