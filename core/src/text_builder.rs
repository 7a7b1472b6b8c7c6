use anyhow::Result;

use crate::builder::IndexBuilder;
use crate::index::PositionalIndex;
use crate::persist::{IndexStore, DESCRIPTION_INDEX, TITLE_INDEX};
use crate::record::ProductRecord;
use crate::tokenizer::Tokenizer;

/// Positional indexes over product titles and descriptions.
#[derive(Debug, Default)]
pub struct TextIndexBuilder {
    tokenizer: Tokenizer,
    title_index: PositionalIndex,
    description_index: PositionalIndex,
}

impl TextIndexBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn with_tokenizer(tokenizer: Tokenizer) -> Self {
        Self { tokenizer, ..Self::default() }
    }

    /// Positions are ordinals within each field's own token sequence, so the
    /// title and description of one product are numbered independently.
    pub fn index_document(&mut self, product_id: &str, title: &str, description: &str) {
        for (pos, token) in self.tokenizer.positions(title) {
            self.title_index.insert(&token, product_id, pos);
        }
        for (pos, token) in self.tokenizer.positions(description) {
            self.description_index.insert(&token, product_id, pos);
        }
    }

    pub fn title_index(&self) -> &PositionalIndex { &self.title_index }

    pub fn description_index(&self) -> &PositionalIndex { &self.description_index }
}

impl IndexBuilder for TextIndexBuilder {
    fn name(&self) -> &'static str { "text" }

    fn index_record(&mut self, product_id: &str, record: &ProductRecord) {
        self.index_document(product_id, &record.title, &record.description);
    }

    fn save(&self, store: &IndexStore) -> Result<()> {
        store.save(TITLE_INDEX, &self.title_index)?;
        store.save(DESCRIPTION_INDEX, &self.description_index)
    }

    fn size(&self) -> usize { self.title_index.len() + self.description_index.len() }
}
