//! Audit and item persistence.

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{Audit, AuditItem, AuditStats, ItemStatus, NewItem};

use super::helpers::{
    coerce_money, get_opt_string, parse_date, parse_datetime, parse_enum, parse_optional_datetime,
};
use super::{AuditStore, StoreError};

const AUDIT_COLUMNS: &str =
    "id, title, reference_date, status, notes, store_id, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, audit_id, barcode, description, label_code, section, \
     list_price, promo_price, margin_text, status, verified_at, verified_by, note, created_at";

fn row_to_audit(row: &libsql::Row) -> Result<Audit, StoreError> {
    Ok(Audit {
        id: row.get::<i64>(0)?,
        title: row.get::<String>(1)?,
        reference_date: parse_date(&row.get::<String>(2)?)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        notes: get_opt_string(row, 4)?,
        store_id: get_opt_string(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

fn row_to_item(row: &libsql::Row) -> Result<AuditItem, StoreError> {
    Ok(AuditItem {
        id: row.get::<i64>(0)?,
        audit_id: row.get::<i64>(1)?,
        barcode: get_opt_string(row, 2)?,
        description: row.get::<String>(3)?,
        label_code: get_opt_string(row, 4)?,
        section: get_opt_string(row, 5)?,
        list_price: coerce_money(row, 6)?,
        promo_price: coerce_money(row, 7)?,
        margin_text: get_opt_string(row, 8)?,
        status: parse_enum(&row.get::<String>(9)?)?,
        verified_at: parse_optional_datetime(get_opt_string(row, 10)?.as_deref())?,
        verified_by: get_opt_string(row, 11)?,
        note: get_opt_string(row, 12)?,
        created_at: parse_datetime(&row.get::<String>(13)?)?,
    })
}

impl AuditStore {
    /// Insert an audit and all its items in one transaction. Either the
    /// whole batch lands or nothing does.
    pub async fn create_audit_with_items(
        &self,
        title: &str,
        reference_date: NaiveDate,
        notes: Option<&str>,
        store_id: Option<&str>,
        items: &[NewItem],
    ) -> Result<Audit, StoreError> {
        let now = Utc::now();
        let tx = self.conn().transaction().await?;

        tx.execute(
            "INSERT INTO audits (title, reference_date, status, notes, store_id, created_at, updated_at)
             VALUES (?1, ?2, 'in_progress', ?3, ?4, ?5, ?6)",
            libsql::params![
                title,
                reference_date.format("%Y-%m-%d").to_string(),
                notes,
                store_id,
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        let audit_id = tx.last_insert_rowid();

        for item in items {
            tx.execute(
                "INSERT INTO audit_items (audit_id, barcode, description, label_code, section,
                     list_price, promo_price, margin_text, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'pending', ?9)",
                libsql::params![
                    audit_id,
                    item.barcode.as_deref(),
                    item.description.as_str(),
                    item.label_code.as_deref(),
                    item.section.as_deref(),
                    item.list_price.to_string(),
                    item.promo_price.to_string(),
                    item.margin_text.as_deref(),
                    now.to_rfc3339()
                ],
            )
            .await?;
        }

        tx.commit().await?;

        self.audit(audit_id).await?.ok_or(StoreError::NoResult)
    }

    pub async fn audit(&self, id: i64) -> Result<Option<Audit>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {AUDIT_COLUMNS} FROM audits WHERE id = ?1"),
                libsql::params![id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_audit(&row)?)),
            None => Ok(None),
        }
    }

    /// All audits, newest first, each with its progress counters.
    pub async fn list_audits(&self) -> Result<Vec<(Audit, AuditStats)>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT a.id, a.title, a.reference_date, a.status, a.notes, a.store_id,
                        a.created_at, a.updated_at,
                        COALESCE(SUM(CASE WHEN i.status = 'pending' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN i.status = 'correct' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN i.status = 'divergent' THEN 1 ELSE 0 END), 0)
                 FROM audits a
                 LEFT JOIN audit_items i ON i.audit_id = a.id
                 GROUP BY a.id
                 ORDER BY a.created_at DESC, a.id DESC",
                (),
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            let audit = row_to_audit(&row)?;
            let stats = AuditStats::from_counts(
                row.get::<i64>(8)?.max(0) as u64,
                row.get::<i64>(9)?.max(0) as u64,
                row.get::<i64>(10)?.max(0) as u64,
            );
            out.push((audit, stats));
        }
        Ok(out)
    }

    /// Items of one audit in walking order: numeric section, then
    /// description.
    pub async fn items_for_audit(&self, audit_id: i64) -> Result<Vec<AuditItem>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {ITEM_COLUMNS} FROM audit_items
                     WHERE audit_id = ?1
                     ORDER BY CAST(section AS INTEGER) ASC, description ASC"
                ),
                libsql::params![audit_id],
            )
            .await?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_item(&row)?);
        }
        Ok(items)
    }

    /// Items of one audit still waiting for a shelf check.
    pub async fn pending_items(&self, audit_id: i64) -> Result<Vec<AuditItem>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {ITEM_COLUMNS} FROM audit_items
                     WHERE audit_id = ?1 AND status = 'pending'
                     ORDER BY CAST(section AS INTEGER) ASC, description ASC"
                ),
                libsql::params![audit_id],
            )
            .await?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_item(&row)?);
        }
        Ok(items)
    }

    pub async fn item(&self, item_id: i64) -> Result<Option<AuditItem>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {ITEM_COLUMNS} FROM audit_items WHERE id = ?1"),
                libsql::params![item_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_item(&row)?)),
            None => Ok(None),
        }
    }

    /// Record a verification result on an item. The note is only
    /// replaced when a new one is given. Returns false when the item
    /// does not exist.
    pub async fn update_item_verification(
        &self,
        item_id: i64,
        status: ItemStatus,
        verified_at: DateTime<Utc>,
        verified_by: &str,
        note: Option<&str>,
    ) -> Result<bool, StoreError> {
        let affected = self
            .conn()
            .execute(
                "UPDATE audit_items
                 SET status = ?2, verified_at = ?3, verified_by = ?4,
                     note = COALESCE(?5, note)
                 WHERE id = ?1",
                libsql::params![
                    item_id,
                    status.as_str(),
                    verified_at.to_rfc3339(),
                    verified_by,
                    note
                ],
            )
            .await?;
        Ok(affected > 0)
    }

    /// Move an audit to a new lifecycle status. Returns false when the
    /// audit does not exist.
    pub async fn set_audit_status(
        &self,
        audit_id: i64,
        status: crate::model::AuditStatus,
    ) -> Result<bool, StoreError> {
        let affected = self
            .conn()
            .execute(
                "UPDATE audits SET status = ?2, updated_at = ?3 WHERE id = ?1",
                libsql::params![audit_id, status.as_str(), Utc::now().to_rfc3339()],
            )
            .await?;
        Ok(affected > 0)
    }

    /// Delete an audit. Items go with it through the cascade.
    pub async fn delete_audit(&self, audit_id: i64) -> Result<bool, StoreError> {
        let affected = self
            .conn()
            .execute("DELETE FROM audits WHERE id = ?1", libsql::params![audit_id])
            .await?;
        Ok(affected > 0)
    }

    /// Audits whose reference date falls inside the inclusive range.
    pub async fn audits_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Audit>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {AUDIT_COLUMNS} FROM audits
                     WHERE reference_date >= ?1 AND reference_date <= ?2
                     ORDER BY reference_date ASC, id ASC"
                ),
                libsql::params![
                    from.format("%Y-%m-%d").to_string(),
                    to.format("%Y-%m-%d").to_string()
                ],
            )
            .await?;

        let mut audits = Vec::new();
        while let Some(row) = rows.next().await? {
            audits.push(row_to_audit(&row)?);
        }
        Ok(audits)
    }

    /// Items belonging to any of the given audits, with optional
    /// product and auditor filters. Used by aggregation.
    pub async fn items_for_audits(
        &self,
        audit_ids: &[i64],
        product: Option<&str>,
        auditor: Option<&str>,
    ) -> Result<Vec<AuditItem>, StoreError> {
        if audit_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut params: Vec<libsql::Value> = audit_ids
            .iter()
            .map(|id| libsql::Value::Integer(*id))
            .collect();
        let placeholders: Vec<String> =
            (1..=audit_ids.len()).map(|i| format!("?{i}")).collect();
        let mut conditions = vec![format!("audit_id IN ({})", placeholders.join(", "))];

        if let Some(product) = product {
            params.push(libsql::Value::Text(product.to_string()));
            conditions.push(format!("description = ?{}", params.len()));
        }
        if let Some(auditor) = auditor {
            params.push(libsql::Value::Text(auditor.to_string()));
            conditions.push(format!("verified_by = ?{}", params.len()));
        }

        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM audit_items
             WHERE {}
             ORDER BY audit_id ASC, id ASC",
            conditions.join(" AND ")
        );

        let mut rows = self
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_item(&row)?);
        }
        Ok(items)
    }
}
