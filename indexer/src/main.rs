use anyhow::Result;
use catalog_core::persist::{IndexFormat, IndexStore, IndexSummary, MetaFile, META_VERSION};
use catalog_core::source::CatalogSource;
use catalog_core::tokenizer::Tokenizer;
use catalog_core::{BuildStats, FeatureIndexBuilder, IndexBuilder, ReviewIndexBuilder, TextIndexBuilder};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use std::collections::BTreeMap;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build title, description, feature and review indexes from a product catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the indexes from a JSONL/JSON file or a directory of them
    Build {
        /// Input path (file or directory)
        #[arg(long, default_value = "data/products.jsonl")]
        input: String,
        /// Output directory for the index files
        #[arg(long, default_value = "data")]
        output: String,
        /// On-disk encoding of the indexes
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Restrict the build to these indexes (comma-separated)
        #[arg(long, value_enum, value_delimiter = ',')]
        only: Vec<Target>,
        /// Run the build passes concurrently, one per index
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Bincode,
}

impl From<Format> for IndexFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Json => IndexFormat::Json,
            Format::Bincode => IndexFormat::Bincode,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    /// title_index and description_index
    Title,
    Features,
    Reviews,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, format, only, parallel } => {
            let targets = if only.is_empty() { vec![Target::Title, Target::Features, Target::Reviews] } else { only };
            build_indexes(&input, &output, format.into(), &targets, parallel)
        }
    }
}

fn build_indexes(input: &str, output: &str, format: IndexFormat, targets: &[Target], parallel: bool) -> Result<()> {
    let source = CatalogSource::open(input)?;
    let store = IndexStore::new(output, format);
    tracing::info!(input, files = source.files().len(), output = %store.paths().root.display(), parallel, "starting index build");

    let tokenizer = Tokenizer::new();
    let want = |t: Target| targets.contains(&t);
    let (text, (features, reviews)) = if parallel {
        rayon::join(
            || run_pass(want(Target::Title), TextIndexBuilder::with_tokenizer(tokenizer.clone()), &source, &store),
            || {
                rayon::join(
                    || run_pass(want(Target::Features), FeatureIndexBuilder::with_tokenizer(tokenizer.clone()), &source, &store),
                    || run_pass(want(Target::Reviews), ReviewIndexBuilder::new(), &source, &store),
                )
            },
        )
    } else {
        (
            run_pass(want(Target::Title), TextIndexBuilder::with_tokenizer(tokenizer.clone()), &source, &store),
            (
                run_pass(want(Target::Features), FeatureIndexBuilder::with_tokenizer(tokenizer.clone()), &source, &store),
                run_pass(want(Target::Reviews), ReviewIndexBuilder::new(), &source, &store),
            ),
        )
    };

    let mut indexes = BTreeMap::new();
    for (name, summary) in [text?, features?, reviews?].into_iter().flatten() {
        indexes.insert(name.to_string(), summary);
    }

    let meta = MetaFile {
        version: META_VERSION,
        created_at: time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339).unwrap_or_else(|_| "".into()),
        format,
        indexes,
    };
    store.save_meta(&meta)?;

    tracing::info!(output, "index build complete");
    Ok(())
}

/// Build one index with its own pass over the source, then persist it.
fn run_pass<B: IndexBuilder>(enabled: bool, mut builder: B, source: &CatalogSource, store: &IndexStore) -> Result<Option<(&'static str, IndexSummary)>> {
    if !enabled {
        return Ok(None);
    }
    let stats: BuildStats = builder.build_from_source(source)?;
    builder.save(store)?;
    tracing::info!(index = builder.name(), size = builder.size(), "index saved");
    Ok(Some((builder.name(), IndexSummary { stats, size: builder.size() })))
}
