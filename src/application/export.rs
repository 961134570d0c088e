//! Export orchestration: fetch the topic listing, then every document in
//! listing order, rendering each one to an HTML file and closing the run
//! with a manifest of what was written.

use std::path::PathBuf;

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{info, warn};

use crate::application::error::AppError;
use crate::application::render::RenderService;
use crate::domain::document::Document;
use crate::infra::api::{ApiClient, Topic};

pub const TOPICS_FILE: &str = "topics.json";
pub const MANIFEST_FILE: &str = "documents.json";

/// One manifest row per exported document.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub id: String,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// The `documents.json` payload.
#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub documents: Vec<ManifestEntry>,
}

/// Totals reported after a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub exported: u32,
    pub skipped: u32,
}

/// Drives one export run. Everything the service touches is handed in, so a
/// run carries no process-wide state.
pub struct ExportService<'a> {
    client: &'a ApiClient,
    renderer: &'a dyn RenderService,
    out_dir: PathBuf,
}

impl<'a> ExportService<'a> {
    pub fn new(
        client: &'a ApiClient,
        renderer: &'a dyn RenderService,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            renderer,
            out_dir: out_dir.into(),
        }
    }

    /// Runs the whole export sequentially: topics first, then one document
    /// at a time in listing order, then the manifest.
    pub async fn run(&self) -> Result<ExportSummary, AppError> {
        let listing = self.client.topics().await?;
        self.write_json(TOPICS_FILE, &listing).await?;

        let topics: Vec<Topic> = serde_json::from_value(listing)?;
        info!(topics = topics.len(), "topic listing fetched");

        let mut summary = ExportSummary::default();
        let mut entries = Vec::new();
        for topic in &topics {
            match self.export_document(&topic.id).await? {
                Some(entry) => {
                    summary.exported += 1;
                    entries.push(entry);
                }
                None => summary.skipped += 1,
            }
        }

        let manifest = ExportManifest {
            exported_at: timestamp()?,
            documents: entries,
        };
        self.write_json(MANIFEST_FILE, &manifest).await?;

        info!(
            exported = summary.exported,
            skipped = summary.skipped,
            "export finished"
        );
        Ok(summary)
    }

    /// Fetch, render, and write one document. `None` means the document was
    /// skipped: an unparseable payload or an id unsafe as a file name.
    async fn export_document(&self, topic_id: &str) -> Result<Option<ManifestEntry>, AppError> {
        let envelope = self.client.document(topic_id).await?;

        if !is_safe_file_stem(&envelope.id) {
            warn!(id = %envelope.id, "document id is not a safe file name, skipping");
            return Ok(None);
        }

        let document: Document = match serde_json::from_str(&envelope.content) {
            Ok(document) => document,
            Err(err) => {
                warn!(id = %envelope.id, error = %err, "document payload failed to parse, skipping");
                return Ok(None);
            }
        };

        let output = self.renderer.render(&document);
        let file = format!("{}.html", envelope.id);
        let path = self.out_dir.join(&file);
        tokio::fs::write(&path, &output.html)
            .await
            .map_err(|source| AppError::write(&path, source))?;

        info!(
            id = %envelope.id,
            file = %file,
            blocks = output.stats.blocks,
            skipped_blocks = output.stats.skipped_blocks,
            dangling = output.stats.dangling_references,
            "document rendered"
        );

        Ok(Some(ManifestEntry {
            id: envelope.id,
            file,
            title: envelope.title,
        }))
    }

    async fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<(), AppError> {
        let path = self.out_dir.join(name);
        let encoded = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(&path, encoded)
            .await
            .map_err(|source| AppError::write(&path, source))?;
        info!(path = %path.display(), "written");
        Ok(())
    }
}

/// A document id must stay inside the output directory once suffixed with
/// `.html`.
fn is_safe_file_stem(id: &str) -> bool {
    !id.is_empty() && id != ".." && !id.contains(['/', '\\'])
}

fn timestamp() -> Result<String, AppError> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}
