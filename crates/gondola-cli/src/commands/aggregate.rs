use gondola_core::aggregate::{self, AggregateQuery};
use gondola_core::erp::NullErpSource;
use gondola_core::error::GondolaError;

use crate::commands::{open_store, parse_date_arg};
use crate::output;

pub async fn run(
    db: &str,
    from: &str,
    to: &str,
    product: Option<String>,
    auditor: Option<String>,
    output_format: &str,
) -> Result<(), GondolaError> {
    let store = open_store(db).await?;
    let query = AggregateQuery {
        from: parse_date_arg(from)?,
        to: parse_date_arg(to)?,
        product,
        auditor,
        supplier: None,
    };

    let result = aggregate::aggregate(&store, &NullErpSource, &query).await?;
    match output_format {
        "json" => output::json::print(&result)?,
        _ => output::table::print_aggregate(&result),
    }
    Ok(())
}
