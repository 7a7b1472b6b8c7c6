use anyhow::Result;

use crate::builder::IndexBuilder;
use crate::index::{ReviewIndex, ReviewStats};
use crate::persist::{IndexStore, REVIEW_INDEX};
use crate::record::{ProductRecord, Review};

/// Per-product review counts and rating aggregates.
///
/// `avg_rating` divides the sum of numeric ratings by the total number of
/// review entries, so unrated or malformed entries pull the average down.
#[derive(Debug, Default)]
pub struct ReviewIndexBuilder {
    review_index: ReviewIndex,
}

impl ReviewIndexBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn index_reviews(&mut self, product_id: &str, reviews: &[Review]) {
        if let Some(stats) = review_stats(reviews) {
            self.review_index.insert(product_id, stats);
        }
    }

    pub fn review_index(&self) -> &ReviewIndex { &self.review_index }
}

/// `None` when no entry carries a numeric rating (including an empty list).
pub fn review_stats(reviews: &[Review]) -> Option<ReviewStats> {
    let total_reviews = reviews.len();
    let ratings: Vec<_> = reviews.iter().filter_map(|r| r.rating).collect();
    let latest_rating = *ratings.last()?;
    let sum: f64 = ratings.iter().map(|r| r.as_f64()).sum();
    Some(ReviewStats {
        total_reviews,
        avg_rating: round2(sum / total_reviews as f64),
        latest_rating,
    })
}

/// Rounds on the exact binary value, as decimal formatting does.
fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

impl IndexBuilder for ReviewIndexBuilder {
    fn name(&self) -> &'static str { "review" }

    fn index_record(&mut self, product_id: &str, record: &ProductRecord) {
        self.index_reviews(product_id, &record.product_reviews);
    }

    fn save(&self, store: &IndexStore) -> Result<()> {
        store.save(REVIEW_INDEX, &self.review_index)
    }

    fn size(&self) -> usize { self.review_index.len() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Rating;

    #[test]
    fn malformed_ratings_count_but_do_not_score() {
        let reviews = vec![Review::rated(Rating::Integer(4)), Review::default(), Review::rated(Rating::Integer(2))];
        let stats = review_stats(&reviews).unwrap();
        assert_eq!(stats.total_reviews, 3);
        assert_eq!(stats.avg_rating, 2.0);
        assert_eq!(stats.latest_rating, Rating::Integer(2));
    }

    #[test]
    fn latest_is_last_numeric_entry() {
        let reviews = vec![Review::rated(Rating::Float(3.5)), Review::default()];
        let stats = review_stats(&reviews).unwrap();
        assert_eq!(stats.latest_rating, Rating::Float(3.5));
        assert_eq!(stats.avg_rating, 1.75);
    }

    #[test]
    fn average_is_rounded_to_two_decimals() {
        let reviews = vec![Review::rated(Rating::Integer(5)), Review::rated(Rating::Integer(4)), Review::rated(Rating::Integer(4))];
        assert_eq!(review_stats(&reviews).unwrap().avg_rating, 4.33);
    }

    #[test]
    fn no_entry_without_numeric_ratings() {
        let mut b = ReviewIndexBuilder::new();
        b.index_reviews("1", &[]);
        b.index_reviews("2", &[Review::default(), Review::default()]);
        assert!(b.review_index().is_empty());
        assert_eq!(b.review_index().avg_rating("2"), 0.0);
    }
}
