use gondola_core::error::GondolaError;
use gondola_core::ingest;
use gondola_core::model::VerifyOutcome;

use crate::commands::open_store;

pub async fn run(
    db: &str,
    item_id: i64,
    status: &str,
    by: &str,
    note: Option<&str>,
) -> Result<(), GondolaError> {
    let outcome = VerifyOutcome::from_str_loose(status)
        .ok_or_else(|| GondolaError::InvalidStatus(status.to_string()))?;

    let store = open_store(db).await?;
    let item = ingest::verify_item(&store, item_id, outcome, by, note).await?;
    eprintln!(
        "Item {} ({}) marked {} by {}",
        item.id, item.description, item.status, by
    );
    Ok(())
}

pub async fn complete(db: &str, audit_id: i64) -> Result<(), GondolaError> {
    let store = open_store(db).await?;
    let audit = ingest::complete_audit(&store, audit_id).await?;
    eprintln!("Audit {} ({}) marked {}", audit.id, audit.title, audit.status);
    Ok(())
}
