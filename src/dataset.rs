//! Talk dataset loading.
//!
//! The source dataset is a CSV export with one row per talk. Only the
//! `talk_id`, `title`, `speaker_1` and `transcript` columns are read.

use crate::error::{Result, TalkRagError};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const REQUIRED_COLUMNS: [&str; 4] = ["talk_id", "title", "speaker_1", "transcript"];

/// A source document: one talk and its full transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Talk {
    pub talk_id: String,
    pub title: String,
    pub speaker: String,
    pub transcript: String,
}

impl Talk {
    pub fn new(
        talk_id: impl Into<String>,
        title: impl Into<String>,
        speaker: impl Into<String>,
        transcript: impl Into<String>,
    ) -> Self {
        Self {
            talk_id: talk_id.into(),
            title: title.into(),
            speaker: speaker.into(),
            transcript: transcript.into(),
        }
    }
}

#[derive(Deserialize)]
struct TalkRow {
    talk_id: String,
    title: String,
    speaker_1: String,
    transcript: String,
}

/// Load talks from a CSV file, keeping at most `limit` rows when given.
pub fn load_talks(path: &Path, limit: Option<usize>) -> Result<Vec<Talk>> {
    info!("Loading talks from {}", path.display());
    let file = std::fs::File::open(path).map_err(|e| {
        TalkRagError::Dataset(format!("Cannot open {}: {}", path.display(), e))
    })?;
    read_talks(file, limit)
}

/// Parse talks from any CSV reader.
pub fn read_talks<R: Read>(reader: R, limit: Option<usize>) -> Result<Vec<Talk>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(TalkRagError::Dataset(format!(
                "Missing required column '{}'",
                column
            )));
        }
    }

    let mut talks = Vec::new();
    for (row_number, record) in csv_reader.deserialize::<TalkRow>().enumerate() {
        if limit.is_some_and(|max| talks.len() >= max) {
            break;
        }
        let row = record.map_err(|e| {
            TalkRagError::Dataset(format!("Row {}: {}", row_number + 1, e))
        })?;
        talks.push(Talk {
            talk_id: row.talk_id.trim().to_string(),
            title: row.title,
            speaker: row.speaker_1,
            transcript: row.transcript,
        });
    }

    debug!("Loaded {} talks", talks.len());
    Ok(talks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "talk_id,title,speaker_1,views,transcript\n\
        1,Averting the climate crisis,Al Gore,3523392,\
        \"Thank you so much, Chris.\nIt's truly a great honor.\"\n\
        92,The best stats you've ever seen,Hans Rosling,14501685,\
        \"About 10 years ago, I took on the task\"\n\
        7,Simplicity sells,David Pogue,1920832,\n";

    #[test]
    fn test_reads_required_columns() {
        let talks = read_talks(SAMPLE.as_bytes(), None).unwrap();
        assert_eq!(talks.len(), 3);
        assert_eq!(talks[0].talk_id, "1");
        assert_eq!(talks[0].speaker, "Al Gore");
        assert!(talks[0].transcript.contains('\n'));
        assert_eq!(talks[1].title, "The best stats you've ever seen");
        assert_eq!(talks[2].transcript, "");
    }

    #[test]
    fn test_limit_keeps_first_rows() {
        let talks = read_talks(SAMPLE.as_bytes(), Some(2)).unwrap();
        assert_eq!(talks.len(), 2);
        assert_eq!(talks[1].talk_id, "92");
    }

    #[test]
    fn test_missing_column_is_reported() {
        let data = "talk_id,title,transcript\n1,T,hello\n";
        let err = read_talks(data.as_bytes(), None).unwrap_err();
        assert!(err.to_string().contains("speaker_1"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talks.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let talks = load_talks(&path, Some(1)).unwrap();
        assert_eq!(talks, vec![Talk::new(
            "1",
            "Averting the climate crisis",
            "Al Gore",
            "Thank you so much, Chris.\nIt's truly a great honor.",
        )]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_talks(Path::new("/nonexistent/talks.csv"), None).unwrap_err();
        assert!(matches!(err, TalkRagError::Dataset(_)));
    }
}
