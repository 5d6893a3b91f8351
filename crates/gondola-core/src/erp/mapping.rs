//! Logical-to-physical schema mapping for ERP queries.
//!
//! Every deployment renames the analytical tables and columns a little,
//! so queries are written against logical names and resolved through a
//! per-deployment map. Unmapped names fall back to the most common
//! physical names in the field.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const FALLBACK_SCHEMA: &str = "INTERSOLID";

const FALLBACK_TABLES: &[(&str, &str)] = &[
    ("pdv_sales", "TAB_PRODUTO_PDV"),
    ("product_master", "TAB_PRODUTO"),
    ("section_master", "TAB_SECAO"),
];

const FALLBACK_COLUMNS: &[(&str, &str)] = &[
    ("sale_date", "DTA_SAIDA"),
    ("discount_value", "VAL_DESCONTO"),
    ("product_total", "VAL_TOTAL_PRODUTO"),
    ("product_code", "COD_PRODUTO"),
    ("section_code", "COD_SECAO"),
    ("section_name", "DES_SECAO"),
];

/// Per-deployment overrides, usually loaded from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaMap {
    #[serde(default)]
    schema: Option<String>,
    #[serde(default)]
    tables: BTreeMap<String, String>,
    #[serde(default)]
    columns: BTreeMap<String, String>,
}

impl SchemaMap {
    pub fn from_json(json: &str) -> Result<SchemaMap, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn schema(&self) -> &str {
        self.schema.as_deref().unwrap_or(FALLBACK_SCHEMA)
    }

    pub fn table<'a>(&'a self, logical: &'a str) -> &'a str {
        if let Some(name) = self.tables.get(logical) {
            return name;
        }
        FALLBACK_TABLES
            .iter()
            .find(|(l, _)| *l == logical)
            .map(|(_, phys)| *phys)
            .unwrap_or(logical)
    }

    pub fn column<'a>(&'a self, logical: &'a str) -> &'a str {
        if let Some(name) = self.columns.get(logical) {
            return name;
        }
        FALLBACK_COLUMNS
            .iter()
            .find(|(l, _)| *l == logical)
            .map(|(_, phys)| *phys)
            .unwrap_or(logical)
    }
}

/// Format a date the way the ERP's `TO_DATE` calls expect it.
pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Total of point-of-sale discounts in a period. Bind `:from` and
/// `:to` as DD/MM/YYYY strings. Rows where the discount covers the
/// whole product value are price overrides, not discounts, and are
/// excluded.
pub fn discount_total_sql(map: &SchemaMap) -> String {
    let schema = map.schema();
    let pdv = map.table("pdv_sales");
    let date = map.column("sale_date");
    let discount = map.column("discount_value");
    let total = map.column("product_total");
    format!(
        "SELECT SUM(NVL(p.{discount}, 0)) AS TOTAL_DESCONTOS \
         FROM {schema}.{pdv} p \
         WHERE p.{date} >= TO_DATE(:from, 'DD/MM/YYYY') \
           AND p.{date} <= TO_DATE(:to, 'DD/MM/YYYY') \
           AND NVL(p.{discount}, 0) > 0 \
           AND NVL(p.{discount}, 0) < NVL(p.{total}, 0)"
    )
}

/// The period discount total SQL paired with its named bind values.
pub fn discount_query(
    map: &SchemaMap,
    from: NaiveDate,
    to: NaiveDate,
) -> (String, [(&'static str, String); 2]) {
    (
        discount_total_sql(map),
        [
            (":from", format_date_br(from)),
            (":to", format_date_br(to)),
        ],
    )
}

/// Discount totals grouped by store section, largest first.
pub fn discount_by_section_sql(map: &SchemaMap) -> String {
    let schema = map.schema();
    let pdv = map.table("pdv_sales");
    let product = map.table("product_master");
    let section = map.table("section_master");
    let date = map.column("sale_date");
    let discount = map.column("discount_value");
    let total = map.column("product_total");
    let product_code = map.column("product_code");
    let section_code = map.column("section_code");
    let section_name = map.column("section_name");
    format!(
        "SELECT s.{section_name} AS SECAO, SUM(NVL(p.{discount}, 0)) AS TOTAL_DESCONTOS \
         FROM {schema}.{pdv} p \
         JOIN {schema}.{product} pr ON pr.{product_code} = p.{product_code} \
         JOIN {schema}.{section} s ON s.{section_code} = pr.{section_code} \
         WHERE p.{date} >= TO_DATE(:from, 'DD/MM/YYYY') \
           AND p.{date} <= TO_DATE(:to, 'DD/MM/YYYY') \
           AND NVL(p.{discount}, 0) > 0 \
           AND NVL(p.{discount}, 0) < NVL(p.{total}, 0) \
         GROUP BY s.{section_name} \
         ORDER BY TOTAL_DESCONTOS DESC"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallbacks_apply_when_map_is_empty() {
        let map = SchemaMap::default();
        assert_eq!(map.schema(), "INTERSOLID");
        assert_eq!(map.table("pdv_sales"), "TAB_PRODUTO_PDV");
        assert_eq!(map.column("discount_value"), "VAL_DESCONTO");
        // unknown logical names pass through untouched
        assert_eq!(map.column("mystery"), "mystery");
    }

    #[test]
    fn test_overrides_win_over_fallbacks() {
        let map = SchemaMap::from_json(
            r#"{
                "schema": "LOJA42",
                "tables": { "pdv_sales": "VENDAS_PDV" },
                "columns": { "sale_date": "DT_VENDA" }
            }"#,
        )
        .unwrap();
        assert_eq!(map.schema(), "LOJA42");
        assert_eq!(map.table("pdv_sales"), "VENDAS_PDV");
        assert_eq!(map.column("sale_date"), "DT_VENDA");
        assert_eq!(map.column("discount_value"), "VAL_DESCONTO");
    }

    #[test]
    fn test_date_formats_as_brazilian() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(format_date_br(date), "07/03/2026");
    }

    #[test]
    fn test_total_sql_uses_mapped_names() {
        let map = SchemaMap::default();
        let sql = discount_total_sql(&map);
        assert!(sql.contains("INTERSOLID.TAB_PRODUTO_PDV"));
        assert!(sql.contains("TO_DATE(:from, 'DD/MM/YYYY')"));
        assert!(sql.contains("NVL(p.VAL_DESCONTO, 0) < NVL(p.VAL_TOTAL_PRODUTO, 0)"));
    }

    #[test]
    fn test_discount_query_binds_brazilian_dates() {
        let from = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        let (sql, binds) = discount_query(&SchemaMap::default(), from, to);
        assert!(sql.contains(":from"));
        assert_eq!(binds[0], (":from", "01/03/2026".to_string()));
        assert_eq!(binds[1], (":to", "31/03/2026".to_string()));
    }

    #[test]
    fn test_section_sql_joins_masters() {
        let sql = discount_by_section_sql(&SchemaMap::default());
        assert!(sql.contains("JOIN INTERSOLID.TAB_PRODUTO pr"));
        assert!(sql.contains("GROUP BY s.DES_SECAO"));
    }
}
