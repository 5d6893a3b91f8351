use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    InProgress,
    Completed,
    Cancelled,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::InProgress => "in_progress",
            AuditStatus::Completed => "completed",
            AuditStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<AuditStatus> {
        match s.trim().to_lowercase().as_str() {
            "in_progress" | "in-progress" | "open" => Some(AuditStatus::InProgress),
            "completed" | "done" => Some(AuditStatus::Completed),
            "cancelled" | "canceled" => Some(AuditStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Correct,
    Divergent,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Correct => "correct",
            ItemStatus::Divergent => "divergent",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<ItemStatus> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(ItemStatus::Pending),
            "correct" | "ok" => Some(ItemStatus::Correct),
            "divergent" | "divergence" => Some(ItemStatus::Divergent),
            _ => None,
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a shelf check. Only verified states, `Pending` is not a valid
/// outcome of a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Correct,
    Divergent,
}

impl VerifyOutcome {
    pub fn from_str_loose(s: &str) -> Option<VerifyOutcome> {
        match ItemStatus::from_str_loose(s)? {
            ItemStatus::Correct => Some(VerifyOutcome::Correct),
            ItemStatus::Divergent => Some(VerifyOutcome::Divergent),
            ItemStatus::Pending => None,
        }
    }
}

impl From<VerifyOutcome> for ItemStatus {
    fn from(v: VerifyOutcome) -> ItemStatus {
        match v {
            VerifyOutcome::Correct => ItemStatus::Correct,
            VerifyOutcome::Divergent => ItemStatus::Divergent,
        }
    }
}

/// One audit campaign, usually a single store visit on a given date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Audit {
    pub id: i64,
    pub title: String,
    pub reference_date: NaiveDate,
    pub status: AuditStatus,
    pub notes: Option<String>,
    pub store_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One product line extracted from the vendor spreadsheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditItem {
    pub id: i64,
    pub audit_id: i64,
    pub barcode: Option<String>,
    pub description: String,
    pub label_code: Option<String>,
    pub section: Option<String>,
    pub list_price: Decimal,
    pub promo_price: Decimal,
    pub margin_text: Option<String>,
    pub status: ItemStatus,
    pub verified_at: Option<DateTime<Utc>>,
    pub verified_by: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Item data as extracted from a row, before persistence assigns it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub barcode: Option<String>,
    pub description: String,
    pub label_code: Option<String>,
    pub section: Option<String>,
    pub list_price: Decimal,
    pub promo_price: Decimal,
    pub margin_text: Option<String>,
}

/// Progress counters derived from item statuses, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStats {
    pub total_items: u64,
    pub pending: u64,
    pub correct: u64,
    pub divergent: u64,
    /// Share of all items found correct, rounded to whole percent. Zero
    /// for an empty audit.
    pub conformity_pct: u64,
}

impl AuditStats {
    pub fn from_counts(pending: u64, correct: u64, divergent: u64) -> AuditStats {
        let total_items = pending + correct + divergent;
        let conformity_pct = if total_items == 0 {
            0
        } else {
            (correct as f64 / total_items as f64 * 100.0).round() as u64
        };
        AuditStats {
            total_items,
            pending,
            correct,
            divergent,
            conformity_pct,
        }
    }

    pub fn from_items(items: &[AuditItem]) -> AuditStats {
        let mut pending = 0;
        let mut correct = 0;
        let mut divergent = 0;
        for item in items {
            match item.status {
                ItemStatus::Pending => pending += 1,
                ItemStatus::Correct => correct += 1,
                ItemStatus::Divergent => divergent += 1,
            }
        }
        AuditStats::from_counts(pending, correct, divergent)
    }
}

/// An audit with its items and derived counters, as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditDetail {
    pub audit: Audit,
    pub stats: AuditStats,
    pub items: Vec<AuditItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_status_round_trips_loose() {
        assert_eq!(
            AuditStatus::from_str_loose("In_Progress"),
            Some(AuditStatus::InProgress)
        );
        assert_eq!(
            AuditStatus::from_str_loose("completed"),
            Some(AuditStatus::Completed)
        );
        assert_eq!(AuditStatus::from_str_loose("bogus"), None);
    }

    #[test]
    fn test_verify_outcome_rejects_pending() {
        assert_eq!(VerifyOutcome::from_str_loose("pending"), None);
        assert_eq!(
            VerifyOutcome::from_str_loose("divergent"),
            Some(VerifyOutcome::Divergent)
        );
    }

    #[test]
    fn test_stats_empty_audit_gives_zero_conformity() {
        let stats = AuditStats::from_counts(0, 0, 0);
        assert_eq!(stats.total_items, 0);
        assert_eq!(stats.conformity_pct, 0);
    }

    #[test]
    fn test_stats_conformity_is_correct_over_total() {
        let stats = AuditStats::from_counts(10, 0, 0);
        assert_eq!(stats.conformity_pct, 0);
        // pending items count against conformity
        let stats = AuditStats::from_counts(6, 3, 1);
        assert_eq!(stats.total_items, 10);
        assert_eq!(stats.conformity_pct, 30);
        let stats = AuditStats::from_counts(2, 3, 1);
        assert_eq!(stats.conformity_pct, 50);
    }

    #[test]
    fn test_stats_conformity_rounds_to_nearest() {
        // 2 of 3 is 66.67, rounds up
        let stats = AuditStats::from_counts(0, 2, 1);
        assert_eq!(stats.conformity_pct, 67);
        // 1 of 3 is 33.33, rounds down
        let stats = AuditStats::from_counts(0, 1, 2);
        assert_eq!(stats.conformity_pct, 33);
    }
}
