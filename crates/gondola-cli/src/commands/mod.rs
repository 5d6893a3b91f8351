pub mod aggregate;
pub mod audits;
pub mod ingest;
pub mod report;
pub mod verify;

use chrono::NaiveDate;
use gondola_core::error::GondolaError;
use gondola_core::store::AuditStore;

pub async fn open_store(db: &str) -> Result<AuditStore, GondolaError> {
    Ok(AuditStore::open_local(db).await?)
}

pub fn parse_date_arg(s: &str) -> Result<NaiveDate, GondolaError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| GondolaError::InvalidDate(s.to_string()))
}
