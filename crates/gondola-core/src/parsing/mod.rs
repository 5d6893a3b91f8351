//! Turns raw vendor spreadsheet bytes into clean [`NewItem`] records.
//!
//! Pipeline: decode bytes ([`decode`]), drop the preamble, read the
//! semicolon-delimited CSV body, filter to product rows ([`columns`])
//! and normalize cell values ([`values`]).

pub mod columns;
pub mod decode;
pub mod values;

use crate::error::GondolaError;
use crate::model::NewItem;
use columns::RawRow;
use rust_decimal::Decimal;
use tracing::debug;

/// Parse the CSV body (header row first) into keyed rows.
///
/// The reader is deliberately lenient: semicolon delimiter, variable
/// field counts, whitespace trimmed. Short rows simply lack the
/// trailing columns.
pub fn parse_rows(content: &str) -> Result<Vec<RawRow>, GondolaError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| GondolaError::Ingest(format!("unreadable header row: {e}")))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| GondolaError::Ingest(format!("bad csv record: {e}")))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Build a [`NewItem`] from a row already known to be a data row.
fn extract_item(row: &RawRow) -> NewItem {
    let barcode = columns::first_match(row, columns::BARCODE).map(values::repair_barcode);
    let description = columns::first_match(row, columns::DESCRIPTION)
        .unwrap_or_default()
        .to_string();
    let label_code = columns::first_match(row, columns::LABEL_CODE).map(str::to_string);
    let section = columns::first_match(row, columns::SECTION).map(str::to_string);
    let list_price = columns::first_match(row, columns::LIST_PRICE)
        .map(values::parse_price)
        .unwrap_or(Decimal::ZERO);
    let promo_price = columns::first_match(row, columns::PROMO_PRICE)
        .map(values::parse_price)
        .unwrap_or(Decimal::ZERO);
    let margin_text = columns::first_match(row, columns::MARGIN).map(str::to_string);

    NewItem {
        barcode,
        description,
        label_code,
        section,
        list_price,
        promo_price,
        margin_text,
    }
}

/// Filter parsed rows to product lines and normalize them.
pub fn extract_items(rows: &[RawRow]) -> Vec<NewItem> {
    let items: Vec<NewItem> = rows
        .iter()
        .filter(|r| columns::is_data_row(r))
        .map(extract_item)
        .collect();
    debug!(
        rows = rows.len(),
        items = items.len(),
        "filtered spreadsheet rows"
    );
    items
}

/// Full text-to-items pipeline used by ingestion.
pub fn items_from_text(text: &str) -> Result<Vec<NewItem>, GondolaError> {
    let body = decode::strip_preamble(text);
    let rows = parse_rows(&body)?;
    Ok(extract_items(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "\
SUPERMERCADO BOM PRECO LTDA;;;;;
CEP 01234-567 CNPJ 12.345.678/0001-00;;;;;
;;;;;
Codigo Barras;Descricao Produto;Etiqueta;Secao;Valor Venda;Valor Oferta;Margem Pratic
7891234567890;Arroz Tipo 1 5kg;ET-01;12;R$ 22,90;R$ 19,90;18,5%
7,8074E+12;Feijao Preto 1kg;ET-02;12;R$ 8,50;0;22%
;;;;;
;Queijo Minas 500g;ET-03;7;R$ 31,00;R$ 27,90;
";

    #[test]
    fn test_full_pipeline_extracts_qualifying_rows() {
        let items = items_from_text(SAMPLE).unwrap();
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].barcode.as_deref(), Some("7891234567890"));
        assert_eq!(items[0].description, "Arroz Tipo 1 5kg");
        assert_eq!(items[0].section.as_deref(), Some("12"));
        assert_eq!(items[0].list_price, dec!(22.90));
        assert_eq!(items[0].promo_price, dec!(19.90));
        assert_eq!(items[0].margin_text.as_deref(), Some("18,5%"));

        // scientific notation barcode repaired
        assert_eq!(items[1].barcode.as_deref(), Some("7807400000000"));
        assert_eq!(items[1].promo_price, dec!(0));

        // row without barcode still qualifies on description
        assert_eq!(items[2].barcode, None);
        assert_eq!(items[2].description, "Queijo Minas 500g");
        assert_eq!(items[2].margin_text, None);
    }

    #[test]
    fn test_preamble_and_blank_rows_are_dropped() {
        let body = decode::strip_preamble(SAMPLE);
        let rows = parse_rows(&body).unwrap();
        let items = extract_items(&rows);
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_headerless_text_without_data_yields_nothing() {
        let items = items_from_text("a;b;c\n;;\n").unwrap();
        assert!(items.is_empty());
    }
}
