//! Read-only adapter for the store's ERP analytical database.
//!
//! Discount figures come from a system we do not control and that is
//! frequently unreachable. The aggregator treats it as best-effort: a
//! failing source degrades to zeroed discounts, never to a failed
//! aggregation.

pub mod mapping;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ErpError {
    #[error("analytical query failed: {0}")]
    Query(String),

    #[error("analytical source unavailable: {0}")]
    Unavailable(String),
}

/// Point-of-sale discounts over a period, totaled and broken down by
/// store section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscountAggregate {
    pub total: Decimal,
    pub by_section: Vec<SectionDiscount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDiscount {
    pub section: String,
    pub total: Decimal,
}

/// Seam for the external analytical database.
#[async_trait]
pub trait ErpSource: Send + Sync {
    /// Discount totals for sales dated inside the inclusive range.
    async fn discount_totals(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<DiscountAggregate, ErpError>;

    /// Name used in logs when this source fails.
    fn source_name(&self) -> &str;
}

/// Source for deployments without an ERP link. Always reports zero
/// discounts.
pub struct NullErpSource;

#[async_trait]
impl ErpSource for NullErpSource {
    async fn discount_totals(
        &self,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<DiscountAggregate, ErpError> {
        Ok(DiscountAggregate::default())
    }

    fn source_name(&self) -> &str {
        "null"
    }
}
