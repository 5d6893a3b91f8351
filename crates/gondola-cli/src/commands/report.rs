use gondola_core::error::GondolaError;
use gondola_core::report;

use crate::commands::open_store;
use crate::output;

pub async fn run(db: &str, audit_id: i64, output_format: &str) -> Result<(), GondolaError> {
    let store = open_store(db).await?;
    let report = report::for_audit(&store, audit_id).await?;
    match output_format {
        "json" => output::json::print(&report)?,
        _ => output::table::print_report(&report),
    }
    Ok(())
}
