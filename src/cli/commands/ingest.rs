//! Ingest command: chunk, embed, and index a document.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use crate::adapters::store::SqliteVectorStore;
use crate::cli::output::progress::{create_progress_bar, ProgressBarExt};
use crate::domain::models::{Chunk, Config};
use crate::domain::ports::{EmbeddingInput, VectorStore};
use crate::infrastructure::setup::build_embedder;

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Target collection, e.g. policy_documents
    #[arg(short, long)]
    pub collection: String,

    /// Path to a UTF-8 text document
    #[arg(short, long)]
    pub file: PathBuf,

    /// Source document identifier used in citations
    #[arg(short, long)]
    pub source_id: String,
}

pub async fn execute(config: Config, args: IngestArgs, json_mode: bool) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let paragraphs = split_paragraphs(&text);
    if paragraphs.is_empty() {
        bail!("{} contains no indexable text", args.file.display());
    }

    let embedder = build_embedder(&config.embedding)?;
    let store =
        SqliteVectorStore::connect(&config.store.path, config.store.max_connections).await?;

    let bar = (!json_mode).then(|| create_progress_bar(paragraphs.len() as u64));
    if let Some(bar) = &bar {
        bar.set_message(format!("Indexing into {}", args.collection));
    }

    let mut indexed = 0usize;
    let batch_size = embedder.max_batch_size().max(1);
    for batch in paragraphs.chunks(batch_size) {
        let inputs: Vec<EmbeddingInput> = batch
            .iter()
            .enumerate()
            .map(|(offset, text)| EmbeddingInput {
                id: format!("{}-{}", args.source_id, indexed + offset),
                text: (*text).to_string(),
            })
            .collect();

        let outputs = embedder.embed_batch(&inputs).await;
        for (input, output) in inputs.iter().zip(outputs) {
            let vector = match output.result {
                Ok(vector) => vector,
                Err(err) => {
                    if let Some(bar) = &bar {
                        bar.finish_error(format!("Embedding failed for chunk {}", output.id));
                    }
                    bail!("Embedding failed for chunk {}: {err}", output.id);
                }
            };

            let chunk = Chunk::new(&output.id, &input.text, &args.source_id, &args.collection);
            store.upsert(&chunk, &vector).await?;
            indexed += 1;
            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }
    }

    if let Some(bar) = bar {
        bar.finish_success(format!("Indexed {indexed} chunks into {}", args.collection));
    }
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "collection": args.collection,
                "source_id": args.source_id,
                "chunks_indexed": indexed,
            }))?
        );
    }

    Ok(())
}

/// Split on blank lines, dropping whitespace-only fragments.
fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .collect()
}
