use catalog_core::tokenizer::Tokenizer;
use criterion::{criterion_group, criterion_main, Criterion};

const DESCRIPTION: &str = "Stainless-steel water bottle with a double-wall vacuum \
    insulation. Keeps drinks cold for 24 hours and hot for 12! Leak-proof lid, \
    BPA-free, dishwasher safe; fits in most cup holders. Made in Portugal by Acme Corp.";

fn bench_tokenize(c: &mut Criterion) {
    let tokenizer = Tokenizer::new();
    let text = DESCRIPTION.repeat(64);
    c.bench_function("tokenize_description", |b| b.iter(|| tokenizer.tokenize(&text)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
