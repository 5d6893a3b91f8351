//! Flat data contract for audit reports.
//!
//! Items are pre-partitioned by status so renderers (terminal table,
//! JSON export, a front-end) never re-derive state.

use chrono::{DateTime, Utc};

use crate::error::GondolaError;
use crate::model::{Audit, AuditItem, AuditStats, ItemStatus};
use crate::store::AuditStore;

#[derive(Debug, Clone, serde::Serialize)]
pub struct ReportData {
    pub audit: Audit,
    pub generated_at: DateTime<Utc>,
    pub stats: AuditStats,
    pub pending: Vec<AuditItem>,
    pub correct: Vec<AuditItem>,
    pub divergent: Vec<AuditItem>,
}

impl ReportData {
    /// Partition items into the report shape. Items keep their incoming
    /// order inside each bucket.
    pub fn build(audit: Audit, items: Vec<AuditItem>, generated_at: DateTime<Utc>) -> ReportData {
        let stats = AuditStats::from_items(&items);
        let mut pending = Vec::new();
        let mut correct = Vec::new();
        let mut divergent = Vec::new();
        for item in items {
            match item.status {
                ItemStatus::Pending => pending.push(item),
                ItemStatus::Correct => correct.push(item),
                ItemStatus::Divergent => divergent.push(item),
            }
        }
        ReportData {
            audit,
            generated_at,
            stats,
            pending,
            correct,
            divergent,
        }
    }
}

/// Build the report for one audit.
pub async fn for_audit(store: &AuditStore, audit_id: i64) -> Result<ReportData, GondolaError> {
    let audit = store.audit(audit_id).await?.ok_or(GondolaError::NotFound {
        what: "audit",
        id: audit_id,
    })?;
    let items = store.items_for_audit(audit_id).await?;
    Ok(ReportData::build(audit, items, Utc::now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AuditStatus;
    use rust_decimal::Decimal;

    fn sample_audit() -> Audit {
        Audit {
            id: 1,
            title: "weekly check".into(),
            reference_date: "2026-03-02".parse().unwrap(),
            status: AuditStatus::InProgress,
            notes: None,
            store_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_item(description: &str, status: ItemStatus) -> AuditItem {
        AuditItem {
            id: 0,
            audit_id: 1,
            barcode: None,
            description: description.into(),
            label_code: None,
            section: None,
            list_price: Decimal::ZERO,
            promo_price: Decimal::ZERO,
            margin_text: None,
            status,
            verified_at: None,
            verified_by: None,
            note: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_items_partition_into_buckets() {
        let items = vec![
            sample_item("a", ItemStatus::Pending),
            sample_item("b", ItemStatus::Correct),
            sample_item("c", ItemStatus::Divergent),
            sample_item("d", ItemStatus::Correct),
        ];
        let report = ReportData::build(sample_audit(), items, Utc::now());
        assert_eq!(report.pending.len(), 1);
        assert_eq!(report.correct.len(), 2);
        assert_eq!(report.divergent.len(), 1);
        assert_eq!(report.stats.total_items, 4);
        // 2 correct of 4 items
        assert_eq!(report.stats.conformity_pct, 50);
        // order inside a bucket is preserved
        assert_eq!(report.correct[0].description, "b");
        assert_eq!(report.correct[1].description, "d");
    }
}
