use std::path::PathBuf;

use gondola_core::error::GondolaError;
use gondola_core::ingest::{self, IngestMeta};

use crate::commands::{open_store, parse_date_arg};
use crate::output;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    db: &str,
    file: PathBuf,
    title: String,
    date: &str,
    user: String,
    store_id: Option<String>,
    notes: Option<String>,
) -> Result<(), GondolaError> {
    let store = open_store(db).await?;
    let meta = IngestMeta {
        title,
        reference_date: parse_date_arg(date)?,
        requested_by: user,
        store_id,
        notes,
    };

    let detail = ingest::ingest_file(&store, &file, &meta).await?;
    eprintln!(
        "Audit {} created with {} item(s) from {}",
        detail.audit.id,
        detail.stats.total_items,
        file.display()
    );
    output::table::print_detail(&detail);
    Ok(())
}
