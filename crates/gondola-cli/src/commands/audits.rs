use gondola_core::error::GondolaError;
use gondola_core::ingest;

use crate::commands::open_store;
use crate::output;

pub async fn list(db: &str) -> Result<(), GondolaError> {
    let store = open_store(db).await?;
    let audits = store.list_audits().await?;
    output::table::print_audit_list(&audits);
    Ok(())
}

pub async fn show(db: &str, audit_id: i64) -> Result<(), GondolaError> {
    let store = open_store(db).await?;
    let detail = ingest::audit_detail(&store, audit_id).await?;
    output::table::print_detail(&detail);
    Ok(())
}

pub async fn pending(db: &str, audit_id: i64) -> Result<(), GondolaError> {
    let store = open_store(db).await?;
    // surface NotFound before an empty item list
    let detail = ingest::audit_detail(&store, audit_id).await?;
    let pending = store.pending_items(audit_id).await?;
    eprintln!(
        "{} of {} item(s) still pending in audit {}",
        pending.len(),
        detail.stats.total_items,
        audit_id
    );
    output::table::print_items(&pending);
    Ok(())
}

pub async fn delete(db: &str, audit_id: i64) -> Result<(), GondolaError> {
    let store = open_store(db).await?;
    if !store.delete_audit(audit_id).await? {
        return Err(GondolaError::NotFound {
            what: "audit",
            id: audit_id,
        });
    }
    eprintln!("Audit {audit_id} deleted");
    Ok(())
}
