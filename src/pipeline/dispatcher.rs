use chrono::Local;
use rusqlite::Connection;

use super::card::{render_card, render_raw_document};
use super::decompose::{Decomposer, DecomposeError};
use super::slug::title_slug;
use crate::db::{repository, DatabaseError};
use crate::models::{ArchiveLink, IntelRecord, RawSubmission};
use crate::vault::DocVault;
use thiserror::Error;

/// Vault folder for inbound raw material.
pub const INBOX_FOLDER: &str = "00_Inbox";

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Classification failed: {0}")]
    Classification(#[from] DecomposeError),
}

/// One record as it left the pipeline: the enriched record plus the outcome
/// of its collection write.
///
/// Vault failures are already folded into the record's link sentinels: a
/// broken hyperlink is a cosmetic defect. A failed collection write is real
/// data loss, so it travels separately and loudly.
#[derive(Debug)]
pub struct DispatchedRecord {
    pub record: IntelRecord,
    pub stream_write: Result<(), DatabaseError>,
}

impl DispatchedRecord {
    pub fn is_persisted(&self) -> bool {
        self.stream_write.is_ok()
    }
}

/// The single entry point of the triage pipeline: decompose, archive raw
/// once, archive one card per record, route each record into its category
/// collection.
pub struct Dispatcher {
    decomposer: Decomposer,
    vault: Box<dyn DocVault + Send + Sync>,
    conn: Connection,
}

impl Dispatcher {
    pub fn new(
        decomposer: Decomposer,
        vault: Box<dyn DocVault + Send + Sync>,
        conn: Connection,
    ) -> Self {
        Self {
            decomposer,
            vault,
            conn,
        }
    }

    /// Dispatch one inbound text.
    ///
    /// An empty decomposition returns an empty list with zero store writes.
    /// `Err` only when classification itself failed hard (no candidate model
    /// answered); everything downstream degrades per record instead of
    /// aborting the dispatch.
    pub fn dispatch(
        &self,
        raw_text: &str,
        source_url: &str,
    ) -> Result<Vec<DispatchedRecord>, DispatchError> {
        let drafts = self.decomposer.decompose(raw_text)?;
        if drafts.is_empty() {
            tracing::info!("Nothing to dispatch");
            return Ok(Vec::new());
        }

        let now = Local::now();
        let today = now.date_naive();
        let stamp = now.format("%H%M%S");
        let submission = RawSubmission::new(raw_text, source_url, now.naive_local());

        // One raw archive per dispatch, shared by every derived record
        let raw_title = drafts[0].title.clone();
        let raw_name = format!(
            "{}_{}_{}.md",
            today.format("%Y-%m-%d"),
            title_slug(&raw_title),
            stamp
        );
        let raw_doc = render_raw_document(&raw_title, &submission);
        let raw_doc_link =
            ArchiveLink::from_publish(self.vault.publish(INBOX_FOLDER, &raw_name, &raw_doc));
        if !raw_doc_link.is_url() {
            tracing::warn!("Raw submission archival failed, records will carry the error sentinel");
        }

        let mut dispatched = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let mut record = IntelRecord::from_draft(draft, today, source_url);
            record.raw_doc_link = raw_doc_link.clone();

            // Card render happens before card_link exists: the card links
            // back to the raw doc, never to itself
            let card = render_card(&record);
            let card_name = format!(
                "{}_{}_{}.md",
                today.format("%Y-%m-%d"),
                title_slug(&record.title),
                stamp
            );
            record.card_link = ArchiveLink::from_publish(self.vault.publish(
                record.category.card_folder(),
                &card_name,
                &card,
            ));
            if !record.card_link.is_url() {
                tracing::warn!(title = %record.title, "Card archival failed");
            }

            let collection = record.category.collection();
            let stream_write = repository::insert_record(&self.conn, collection, &record);
            match &stream_write {
                Ok(()) => {
                    tracing::info!(collection, title = %record.title, "Record dispatched")
                }
                Err(e) => {
                    tracing::error!(collection, title = %record.title, error = %e,
                        "Collection write failed, record not persisted")
                }
            }

            dispatched.push(DispatchedRecord {
                record,
                stream_write,
            });
        }

        Ok(dispatched)
    }
}
