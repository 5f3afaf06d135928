//! Ingest command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::dataset::load_talks;
use crate::services::Services;
use anyhow::Result;
use tracing::info;

/// Run the ingest command.
pub async fn run_ingest(
    csv: &str,
    limit: Option<usize>,
    batch_size: Option<usize>,
    memory: bool,
    mut settings: Settings,
) -> Result<()> {
    if let Some(size) = batch_size {
        settings.ingest.batch_size = size;
    }

    let path = Settings::expand_path(csv);
    let talks = load_talks(&path, limit)?;
    if talks.is_empty() {
        Output::warning(&format!("No talks found in {}", path.display()));
        return Ok(());
    }
    info!("Loaded {} talks from {}", talks.len(), path.display());

    let services = if memory {
        Services::in_memory(&settings)?
    } else {
        Services::connect(&settings).await?
    };
    let pipeline = services.ingest_pipeline(&settings)?;

    Output::header("Ingesting talks");
    Output::kv("Source", &path.display().to_string());
    Output::kv("Talks", &talks.len().to_string());
    Output::kv(
        "Chunking",
        &format!(
            "{} chars, {} overlap",
            settings.chunking.chunk_chars, settings.chunking.overlap_chars
        ),
    );
    println!();

    let pb = Output::progress_bar(talks.len() as u64, "talks");
    let result = pipeline
        .ingest_with_progress(&talks, |talk, report| {
            pb.set_message(format!("{} ({} chunks indexed)", talk.title, report.chunks_indexed));
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            Output::error(&format!("Ingestion aborted: {}", e));
            return Err(e.into());
        }
    };

    Output::success(&format!(
        "Indexed {} of {} chunks from {} talks in {} batches",
        report.chunks_indexed, report.chunks_total, report.talks, report.batches
    ));
    if report.chunks_skipped > 0 {
        Output::warning(&format!(
            "{} chunks skipped after embedding failures (run with -v for details)",
            report.chunks_skipped
        ));
    }
    if memory {
        Output::info("In-memory index is discarded when this process exits.");
    }

    Ok(())
}
