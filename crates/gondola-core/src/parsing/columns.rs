//! Logical column lookup over messy vendor headers.
//!
//! Header names shift between exports: accents survive or get mangled,
//! and some deployments rename columns outright. Each logical field
//! carries an alias list tried in order, first non-empty cell wins.

use std::collections::HashMap;

/// A raw CSV row keyed by the header names as they appeared in the file.
pub type RawRow = HashMap<String, String>;

pub const BARCODE: &[&str] = &[
    "Código Barras",
    "C\u{fffd}digo Barras",
    "Codigo Barras",
    "codigo_barras",
];

pub const DESCRIPTION: &[&str] = &[
    "Descrição Produto",
    "Descri\u{fffd}\u{fffd}o Produto",
    "Descricao Produto",
    "descricao",
];

pub const LABEL_CODE: &[&str] = &["Etiqueta", "etiqueta"];

pub const SECTION: &[&str] = &["Seção", "Se\u{fffd}\u{fffd}o", "Secao", "secao"];

pub const LIST_PRICE: &[&str] = &["Valor Venda", "valor_venda"];

pub const PROMO_PRICE: &[&str] = &["Valor Oferta", "valor_oferta"];

pub const MARGIN: &[&str] = &["Margem Pratic", "Margem Prática", "Margem Pratica"];

/// Cell contents that flag a preamble or repeated-header row rather
/// than product data.
const NON_DATA_MARKERS: &[&str] = &["SUPERMERCADO", "CEP", "CNPJ", "Código Barras", "Codigo Barras"];

/// Return the first non-empty cell among the aliases, trimmed.
pub fn first_match<'a>(row: &'a RawRow, aliases: &[&str]) -> Option<&'a str> {
    for alias in aliases {
        if let Some(value) = row.get(*alias) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed);
            }
        }
    }
    None
}

/// Decide whether a parsed row is a product line.
///
/// A data row needs a barcode or a description, and its barcode cell
/// must not carry a preamble marker (store banner lines, address lines
/// and repeated headers sneak into the body of some exports, always in
/// the first column).
pub fn is_data_row(row: &RawRow) -> bool {
    let barcode = first_match(row, BARCODE);
    let has_content = barcode.is_some() || first_match(row, DESCRIPTION).is_some();
    if !has_content {
        return false;
    }
    match barcode {
        Some(cell) => !NON_DATA_MARKERS.iter().any(|m| cell.contains(m)),
        None => true,
    }
}
