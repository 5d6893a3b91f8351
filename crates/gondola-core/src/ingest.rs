//! Ingestion and verification workflow.
//!
//! An audit starts from a vendor spreadsheet (or a pre-extracted item
//! batch), its items then get checked on the shop floor one by one, and
//! the audit is finally marked completed.

use std::path::Path;

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::error::GondolaError;
use crate::model::{
    Audit, AuditDetail, AuditItem, AuditStats, AuditStatus, NewItem, VerifyOutcome,
};
use crate::parsing;
use crate::store::AuditStore;

/// Campaign metadata supplied alongside the spreadsheet.
#[derive(Debug, Clone)]
pub struct IngestMeta {
    pub title: String,
    pub reference_date: NaiveDate,
    pub requested_by: String,
    pub store_id: Option<String>,
    pub notes: Option<String>,
}

/// Ingest a spreadsheet file from disk into a new audit.
pub async fn ingest_file(
    store: &AuditStore,
    path: &Path,
    meta: &IngestMeta,
) -> Result<AuditDetail, GondolaError> {
    let bytes = std::fs::read(path)?;
    ingest_bytes(store, &bytes, meta).await
}

/// Ingest raw spreadsheet bytes into a new audit.
///
/// Decodes, strips the vendor preamble, extracts qualifying product
/// rows and persists the audit with all its items in one transaction.
pub async fn ingest_bytes(
    store: &AuditStore,
    bytes: &[u8],
    meta: &IngestMeta,
) -> Result<AuditDetail, GondolaError> {
    let text = parsing::decode::decode_lossy(bytes);
    let items = parsing::items_from_text(&text)?;
    info!(
        items = items.len(),
        title = %meta.title,
        requested_by = %meta.requested_by,
        "extracted qualifying products"
    );
    ingest_items(store, items, meta).await
}

/// Create an audit from already-extracted items.
pub async fn ingest_items(
    store: &AuditStore,
    items: Vec<NewItem>,
    meta: &IngestMeta,
) -> Result<AuditDetail, GondolaError> {
    let audit = store
        .create_audit_with_items(
            &meta.title,
            meta.reference_date,
            meta.notes.as_deref(),
            meta.store_id.as_deref(),
            &items,
        )
        .await?;
    info!(audit_id = audit.id, "audit created");
    audit_detail_for(store, audit).await
}

/// Record a shelf check on an item. Re-verifying overwrites the
/// previous result, the last check on the floor wins.
pub async fn verify_item(
    store: &AuditStore,
    item_id: i64,
    outcome: VerifyOutcome,
    verified_by: &str,
    note: Option<&str>,
) -> Result<AuditItem, GondolaError> {
    let updated = store
        .update_item_verification(item_id, outcome.into(), Utc::now(), verified_by, note)
        .await?;
    if !updated {
        return Err(GondolaError::NotFound {
            what: "item",
            id: item_id,
        });
    }
    store.item(item_id).await?.ok_or(GondolaError::NotFound {
        what: "item",
        id: item_id,
    })
}

/// Mark an audit completed. Pending items stay pending, completion is a
/// bookkeeping state, not a validation gate.
pub async fn complete_audit(store: &AuditStore, audit_id: i64) -> Result<Audit, GondolaError> {
    let updated = store
        .set_audit_status(audit_id, AuditStatus::Completed)
        .await?;
    if !updated {
        return Err(GondolaError::NotFound {
            what: "audit",
            id: audit_id,
        });
    }
    store.audit(audit_id).await?.ok_or(GondolaError::NotFound {
        what: "audit",
        id: audit_id,
    })
}

/// Fetch an audit with its items and derived counters.
pub async fn audit_detail(store: &AuditStore, audit_id: i64) -> Result<AuditDetail, GondolaError> {
    let audit = store.audit(audit_id).await?.ok_or(GondolaError::NotFound {
        what: "audit",
        id: audit_id,
    })?;
    audit_detail_for(store, audit).await
}

async fn audit_detail_for(store: &AuditStore, audit: Audit) -> Result<AuditDetail, GondolaError> {
    let items = store.items_for_audit(audit.id).await?;
    let stats = AuditStats::from_items(&items);
    Ok(AuditDetail {
        audit,
        stats,
        items,
    })
}
