//! Cross-audit aggregation over a date range.
//!
//! Pulls every audit whose reference date falls in the range, partitions
//! their items by verification status and derives the management view:
//! divergent products grouped by description, section rankings, a
//! weekday histogram and ERP discount totals.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::erp::{DiscountAggregate, ErpSource};
use crate::error::GondolaError;
use crate::model::{Audit, AuditItem, ItemStatus};
use crate::store::AuditStore;

/// Histogram labels in calendar order, Monday first.
const WEEKDAY_LABELS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

#[derive(Debug, Clone)]
pub struct AggregateQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Exact match on item description.
    pub product: Option<String>,
    /// Exact match on the verifying user.
    pub auditor: Option<String>,
    /// Accepted but not applied, audit data carries no supplier.
    pub supplier: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub audits: u64,
    pub items: u64,
    pub verified: u64,
    pub correct: u64,
    pub divergent: u64,
    /// correct / verified, zero when nothing was verified.
    pub conformity_rate: f64,
    /// divergent / verified, zero when nothing was verified.
    pub divergence_rate: f64,
    /// Accumulated list price of all divergent items.
    pub divergent_value: Decimal,
}

/// A divergent product, grouped by description. The first occurrence
/// seen supplies the representative values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductGroup {
    pub description: String,
    pub barcode: Option<String>,
    pub section: Option<String>,
    pub list_price: Decimal,
    pub promo_price: Decimal,
    pub margin_text: Option<String>,
    pub occurrences: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionRank {
    pub section: String,
    pub divergences: u64,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayBucket {
    pub weekday: &'static str,
    pub divergent: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    pub totals: Totals,
    pub products: Vec<ProductGroup>,
    pub sections_by_count: Vec<SectionRank>,
    pub sections_by_value: Vec<SectionRank>,
    pub weekdays: Vec<WeekdayBucket>,
    pub discounts: DiscountAggregate,
}

/// Run the aggregation for a date range.
///
/// An empty range (no audits) returns the zero-shaped result without
/// touching the ERP source. A failing ERP source degrades to zeroed
/// discounts with a warning, it never fails the aggregation.
pub async fn aggregate<E: ErpSource>(
    store: &AuditStore,
    erp: &E,
    query: &AggregateQuery,
) -> Result<AggregateResult, GondolaError> {
    if query.supplier.is_some() {
        warn!("supplier filter is not supported by audit data and is ignored");
    }

    let audits = store.audits_in_range(query.from, query.to).await?;
    if audits.is_empty() {
        return Ok(AggregateResult::default());
    }

    let ids: Vec<i64> = audits.iter().map(|a| a.id).collect();
    let items = store
        .items_for_audits(&ids, query.product.as_deref(), query.auditor.as_deref())
        .await?;

    let discounts = match erp.discount_totals(query.from, query.to).await {
        Ok(discounts) => discounts,
        Err(e) => {
            warn!(
                source = erp.source_name(),
                error = %e,
                "discount source failed, reporting zeroed discounts"
            );
            DiscountAggregate::default()
        }
    };

    Ok(assemble(&audits, &items, discounts))
}

fn assemble(audits: &[Audit], items: &[AuditItem], discounts: DiscountAggregate) -> AggregateResult {
    let date_by_audit: HashMap<i64, NaiveDate> =
        audits.iter().map(|a| (a.id, a.reference_date)).collect();

    let mut correct = 0u64;
    let mut divergent_items: Vec<&AuditItem> = Vec::new();
    for item in items {
        match item.status {
            ItemStatus::Pending => {}
            ItemStatus::Correct => correct += 1,
            ItemStatus::Divergent => divergent_items.push(item),
        }
    }
    let divergent = divergent_items.len() as u64;
    let verified = correct + divergent;
    let divergent_value = divergent_items
        .iter()
        .map(|i| i.list_price)
        .sum::<Decimal>();

    let totals = Totals {
        audits: audits.len() as u64,
        items: items.len() as u64,
        verified,
        correct,
        divergent,
        conformity_rate: rate(correct, verified),
        divergence_rate: rate(divergent, verified),
        divergent_value,
    };

    AggregateResult {
        totals,
        products: group_products(&divergent_items),
        sections_by_count: rank_sections(&divergent_items, true),
        sections_by_value: rank_sections(&divergent_items, false),
        weekdays: weekday_histogram(&divergent_items, &date_by_audit),
        discounts,
    }
}

fn rate(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Group divergent items by description. First occurrence supplies the
/// representative values, later ones only bump the count. Sorted by
/// occurrence count, descending and stable.
fn group_products(items: &[&AuditItem]) -> Vec<ProductGroup> {
    let mut groups: Vec<ProductGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for item in items {
        match index.get(item.description.as_str()) {
            Some(&i) => groups[i].occurrences += 1,
            None => {
                index.insert(item.description.as_str(), groups.len());
                groups.push(ProductGroup {
                    description: item.description.clone(),
                    barcode: item.barcode.clone(),
                    section: item.section.clone(),
                    list_price: item.list_price,
                    promo_price: item.promo_price,
                    margin_text: item.margin_text.clone(),
                    occurrences: 1,
                });
            }
        }
    }

    groups.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
    groups
}

/// Rank sections by divergence count or by accumulated list value.
/// Items without a section fall under "unknown".
fn rank_sections(items: &[&AuditItem], by_count: bool) -> Vec<SectionRank> {
    let mut ranks: Vec<SectionRank> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let section = item.section.as_deref().unwrap_or("unknown");
        let i = match index.get(section) {
            Some(&i) => i,
            None => {
                index.insert(section.to_string(), ranks.len());
                ranks.push(SectionRank {
                    section: section.to_string(),
                    divergences: 0,
                    value: Decimal::ZERO,
                });
                ranks.len() - 1
            }
        };
        ranks[i].divergences += 1;
        ranks[i].value += item.list_price;
    }

    if by_count {
        ranks.sort_by(|a, b| b.divergences.cmp(&a.divergences));
    } else {
        ranks.sort_by(|a, b| b.value.cmp(&a.value));
    }
    ranks
}

/// Divergences bucketed by the weekday of the parent audit's reference
/// date. Always emits all seven buckets, Monday first.
fn weekday_histogram(
    items: &[&AuditItem],
    date_by_audit: &HashMap<i64, NaiveDate>,
) -> Vec<WeekdayBucket> {
    let mut counts = [0u64; 7];
    for item in items {
        if let Some(date) = date_by_audit.get(&item.audit_id) {
            counts[date.weekday().num_days_from_monday() as usize] += 1;
        }
    }
    WEEKDAY_LABELS
        .into_iter()
        .zip(counts)
        .map(|(weekday, divergent)| WeekdayBucket { weekday, divergent })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuditStatus, ItemStatus};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn audit(id: i64, date: &str) -> Audit {
        Audit {
            id,
            title: format!("audit {id}"),
            reference_date: date.parse().unwrap(),
            status: AuditStatus::InProgress,
            notes: None,
            store_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn item(
        audit_id: i64,
        description: &str,
        section: Option<&str>,
        list_price: Decimal,
        status: ItemStatus,
    ) -> AuditItem {
        AuditItem {
            id: 0,
            audit_id,
            barcode: Some("789".into()),
            description: description.into(),
            label_code: None,
            section: section.map(Into::into),
            list_price,
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
    fn test_totals_partition_by_status() {
        // 2026-03-02 is a Monday, 2026-03-05 a Thursday.
        let audits = vec![audit(1, "2026-03-02"), audit(2, "2026-03-05")];
        let items = vec![
            item(1, "Arroz", Some("12"), dec!(22.90), ItemStatus::Divergent),
            item(1, "Feijao", Some("12"), dec!(8.50), ItemStatus::Correct),
            item(2, "Arroz", Some("12"), dec!(22.90), ItemStatus::Divergent),
            item(2, "Queijo", Some("7"), dec!(31.00), ItemStatus::Pending),
        ];

        let result = assemble(&audits, &items, DiscountAggregate::default());
        assert_eq!(result.totals.audits, 2);
        assert_eq!(result.totals.items, 4);
        assert_eq!(result.totals.verified, 3);
        assert_eq!(result.totals.correct, 1);
        assert_eq!(result.totals.divergent, 2);
        assert!((result.totals.conformity_rate - 1.0 / 3.0).abs() < 1e-9);
        assert!((result.totals.divergence_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(result.totals.divergent_value, dec!(45.80));
    }

    #[test]
    fn test_zero_verified_means_zero_rates() {
        let audits = vec![audit(1, "2026-03-02")];
        let items = vec![item(1, "Arroz", None, dec!(1), ItemStatus::Pending)];
        let result = assemble(&audits, &items, DiscountAggregate::default());
        assert_eq!(result.totals.conformity_rate, 0.0);
        assert_eq!(result.totals.divergence_rate, 0.0);
    }

    #[test]
    fn test_products_group_by_description_first_seen_wins() {
        let audits = vec![audit(1, "2026-03-02")];
        let items = vec![
            item(1, "Arroz", Some("12"), dec!(22.90), ItemStatus::Divergent),
            item(1, "Arroz", Some("99"), dec!(99.99), ItemStatus::Divergent),
            item(1, "Feijao", Some("12"), dec!(8.50), ItemStatus::Divergent),
        ];
        let result = assemble(&audits, &items, DiscountAggregate::default());
        assert_eq!(result.products.len(), 2);
        assert_eq!(result.products[0].description, "Arroz");
        assert_eq!(result.products[0].occurrences, 2);
        // first occurrence supplies the representative values
        assert_eq!(result.products[0].section.as_deref(), Some("12"));
        assert_eq!(result.products[0].list_price, dec!(22.90));
    }

    #[test]
    fn test_section_rankings_sort_by_their_own_key() {
        let audits = vec![audit(1, "2026-03-02")];
        let items = vec![
            item(1, "A", Some("12"), dec!(1.00), ItemStatus::Divergent),
            item(1, "B", Some("12"), dec!(1.00), ItemStatus::Divergent),
            item(1, "C", Some("7"), dec!(50.00), ItemStatus::Divergent),
        ];
        let result = assemble(&audits, &items, DiscountAggregate::default());

        assert_eq!(result.sections_by_count[0].section, "12");
        assert_eq!(result.sections_by_count[0].divergences, 2);
        assert_eq!(result.sections_by_value[0].section, "7");
        assert_eq!(result.sections_by_value[0].value, dec!(50.00));
    }

    #[test]
    fn test_weekday_histogram_uses_parent_audit_date() {
        let audits = vec![audit(1, "2026-03-02"), audit(2, "2026-03-05")];
        let items = vec![
            item(1, "A", None, dec!(1), ItemStatus::Divergent),
            item(1, "B", None, dec!(1), ItemStatus::Divergent),
            item(2, "C", None, dec!(1), ItemStatus::Divergent),
        ];
        let result = assemble(&audits, &items, DiscountAggregate::default());
        assert_eq!(result.weekdays.len(), 7);
        assert_eq!(result.weekdays[0].weekday, "monday");
        assert_eq!(result.weekdays[0].divergent, 2);
        assert_eq!(result.weekdays[3].weekday, "thursday");
        assert_eq!(result.weekdays[3].divergent, 1);
        assert_eq!(result.weekdays[6].divergent, 0);
    }

    #[test]
    fn test_tied_sections_keep_encounter_order() {
        let audits = vec![audit(1, "2026-03-02")];
        let mut items = Vec::new();
        for (section, n) in [("9", 3), ("12", 5), ("7", 3)] {
            for i in 0..n {
                items.push(item(
                    1,
                    &format!("p{section}-{i}"),
                    Some(section),
                    dec!(1),
                    ItemStatus::Divergent,
                ));
            }
        }
        let result = assemble(&audits, &items, DiscountAggregate::default());
        let order: Vec<&str> = result
            .sections_by_count
            .iter()
            .map(|s| s.section.as_str())
            .collect();
        assert_eq!(order, vec!["12", "9", "7"]);
    }

    #[test]
    fn test_missing_section_falls_under_unknown() {
        let audits = vec![audit(1, "2026-03-02")];
        let items = vec![item(1, "A", None, dec!(2.50), ItemStatus::Divergent)];
        let result = assemble(&audits, &items, DiscountAggregate::default());
        assert_eq!(result.sections_by_count[0].section, "unknown");
    }
}
