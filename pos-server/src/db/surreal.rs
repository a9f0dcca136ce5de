//! SurrealDB Store
//!
//! Embedded SurrealDB on RocksDB. One table per record type; the record key
//! is the snowflake id, read back through `record::id(id)` so models stay
//! free of `RecordId`.

use std::path::Path;

use async_trait::async_trait;
use shared::models::{Bill, Shift};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use super::{BillStore, RepoError, RepoResult, ShiftStore, TimeRange};

const NAMESPACE: &str = "pos";
const DATABASE: &str = "pos";

const BILL_TABLE: &str = "bill";
const SHIFT_TABLE: &str = "shift";

const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS bill SCHEMALESS;
DEFINE INDEX IF NOT EXISTS bill_invoice ON bill FIELDS invoice_number UNIQUE;
DEFINE INDEX IF NOT EXISTS bill_created_at ON bill FIELDS created_at;
DEFINE INDEX IF NOT EXISTS bill_shift ON bill FIELDS shift_id;
DEFINE TABLE IF NOT EXISTS shift SCHEMALESS;
DEFINE INDEX IF NOT EXISTS shift_cashier_status ON shift FIELDS cashier_name, status;
DEFINE INDEX IF NOT EXISTS shift_start_time ON shift FIELDS start_time;
DEFINE INDEX IF NOT EXISTS shift_open_cashier ON shift FIELDS open_key UNIQUE;
"#;

const BILL_FIELDS: &str = "record::id(id) AS id, invoice_number, cashier_name, customer_name, \
    customer_number, payment_mode, cart_items, sub_total, vat_sales, vat_amount, cash, \
    `change`, total_amount, discount, is_senior_or_pwd, shift_id, voided, voided_at, created_at";

const SHIFT_FIELDS: &str = "record::id(id) AS id, cashier_id, cashier_name, status, start_time, \
    end_time, starting_cash, ending_cash, note, created_at, updated_at";

/// SurrealDB-backed bill and shift store
#[derive(Clone)]
pub struct SurrealStore {
    db: Surreal<Db>,
}

impl SurrealStore {
    /// Open (or create) the RocksDB database at `path` and apply the schema
    pub async fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RepoError::Database(format!("Failed to create {}: {e}", parent.display())))?;
        }

        let db: Surreal<Db> = Surreal::new::<RocksDb>(path).await?;
        db.use_ns(NAMESPACE).use_db(DATABASE).await?;

        let store = Self { db };
        store.apply_schema().await?;
        tracing::info!(path = %path.display(), "SurrealDB store ready (RocksDB)");
        Ok(store)
    }

    async fn apply_schema(&self) -> RepoResult<()> {
        self.db.query(SCHEMA).await?.check()?;
        Ok(())
    }

    async fn select_bills(&self, sql: String, bindings: Vec<(&'static str, i64)>) -> RepoResult<Vec<Bill>> {
        let mut query = self.db.query(sql);
        for binding in bindings {
            query = query.bind(binding);
        }
        let bills: Vec<Bill> = query.await?.take(0)?;
        Ok(bills)
    }

    async fn select_shifts(&self, sql: String, bindings: Vec<(&'static str, i64)>) -> RepoResult<Vec<Shift>> {
        let mut query = self.db.query(sql);
        for binding in bindings {
            query = query.bind(binding);
        }
        let shifts: Vec<Shift> = query.await?.take(0)?;
        Ok(shifts)
    }
}

/// Record content without `id`; the key lives in the record id
fn content<T: serde::Serialize>(record: &T) -> RepoResult<serde_json::Value> {
    let mut value = serde_json::to_value(record)
        .map_err(|e| RepoError::Database(format!("Failed to encode record: {e}")))?;
    if let Some(map) = value.as_object_mut() {
        map.remove("id");
    }
    Ok(value)
}

/// Shift content plus `open_key`
///
/// `open_key` is the cashier name while the shift is OPEN and a per-record
/// value once closed, so the unique index allows one OPEN shift per cashier.
fn shift_content(shift: &Shift) -> RepoResult<serde_json::Value> {
    let mut value = content(shift)?;
    let open_key = if shift.is_open() {
        format!("open:{}", shift.cashier_name)
    } else {
        format!("closed:{}", shift.id)
    };
    if let Some(map) = value.as_object_mut() {
        map.insert("open_key".into(), serde_json::Value::String(open_key));
    }
    Ok(value)
}

fn end_operator(range: &TimeRange) -> &'static str {
    if range.end_inclusive { "<=" } else { "<" }
}

#[async_trait]
impl BillStore for SurrealStore {
    async fn insert(&self, bill: Bill) -> RepoResult<Bill> {
        if self.find_by_invoice(&bill.invoice_number).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Invoice '{}' already exists",
                bill.invoice_number
            )));
        }

        self.db
            .query("CREATE type::thing($table, $id) CONTENT $data RETURN NONE")
            .bind(("table", BILL_TABLE))
            .bind(("id", bill.id))
            .bind(("data", content(&bill)?))
            .await?
            .check()?;
        Ok(bill)
    }

    async fn find_by_invoice(&self, invoice_number: &str) -> RepoResult<Option<Bill>> {
        let mut result = self
            .db
            .query(format!(
                "SELECT {BILL_FIELDS} FROM bill WHERE invoice_number = $invoice"
            ))
            .bind(("invoice", invoice_number.to_string()))
            .await?;
        let bills: Vec<Bill> = result.take(0)?;
        Ok(bills.into_iter().next())
    }

    async fn find_in_range(&self, range: TimeRange) -> RepoResult<Vec<Bill>> {
        let sql = format!(
            "SELECT {BILL_FIELDS} FROM bill WHERE created_at >= $start AND created_at {} $end ORDER BY created_at ASC",
            end_operator(&range)
        );
        self.select_bills(sql, vec![("start", range.start), ("end", range.end)])
            .await
    }

    async fn find_by_shift(&self, shift_id: i64) -> RepoResult<Vec<Bill>> {
        let sql = format!(
            "SELECT {BILL_FIELDS} FROM bill WHERE shift_id = $shift_id ORDER BY created_at ASC"
        );
        self.select_bills(sql, vec![("shift_id", shift_id)]).await
    }

    async fn list(&self, limit: usize, offset: usize) -> RepoResult<Vec<Bill>> {
        let sql = format!(
            "SELECT {BILL_FIELDS} FROM bill ORDER BY created_at DESC LIMIT $limit START $offset"
        );
        self.select_bills(sql, vec![("limit", limit as i64), ("offset", offset as i64)])
            .await
    }

    async fn update(&self, bill: Bill) -> RepoResult<Bill> {
        let sql = format!("SELECT {BILL_FIELDS} FROM type::thing('bill', $id)");
        if self.select_bills(sql, vec![("id", bill.id)]).await?.is_empty() {
            return Err(RepoError::NotFound(format!("Bill {} not found", bill.id)));
        }

        self.db
            .query("UPDATE type::thing($table, $id) CONTENT $data RETURN NONE")
            .bind(("table", BILL_TABLE))
            .bind(("id", bill.id))
            .bind(("data", content(&bill)?))
            .await?
            .check()?;
        Ok(bill)
    }
}

#[async_trait]
impl ShiftStore for SurrealStore {
    async fn insert(&self, shift: Shift) -> RepoResult<Shift> {
        self.db
            .query("CREATE type::thing($table, $id) CONTENT $data RETURN NONE")
            .bind(("table", SHIFT_TABLE))
            .bind(("id", shift.id))
            .bind(("data", shift_content(&shift)?))
            .await?
            .check()?;
        Ok(shift)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Shift>> {
        let sql = format!("SELECT {SHIFT_FIELDS} FROM type::thing('shift', $id)");
        Ok(self.select_shifts(sql, vec![("id", id)]).await?.into_iter().next())
    }

    async fn find_open_by_cashier(&self, cashier_name: &str) -> RepoResult<Option<Shift>> {
        let mut result = self
            .db
            .query(format!(
                "SELECT {SHIFT_FIELDS} FROM shift WHERE cashier_name = $cashier AND status = 'OPEN' ORDER BY start_time DESC"
            ))
            .bind(("cashier", cashier_name.to_string()))
            .await?;
        let shifts: Vec<Shift> = result.take(0)?;
        Ok(shifts.into_iter().next())
    }

    async fn find_in_range(&self, range: TimeRange) -> RepoResult<Vec<Shift>> {
        let sql = format!(
            "SELECT {SHIFT_FIELDS} FROM shift WHERE start_time >= $start AND start_time {} $end ORDER BY start_time DESC",
            end_operator(&range)
        );
        self.select_shifts(sql, vec![("start", range.start), ("end", range.end)])
            .await
    }

    async fn list(&self, limit: usize, offset: usize) -> RepoResult<Vec<Shift>> {
        let sql = format!(
            "SELECT {SHIFT_FIELDS} FROM shift ORDER BY start_time DESC LIMIT $limit START $offset"
        );
        self.select_shifts(sql, vec![("limit", limit as i64), ("offset", offset as i64)])
            .await
    }

    async fn update(&self, shift: Shift) -> RepoResult<Shift> {
        if self.find_by_id(shift.id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Shift {} not found", shift.id)));
        }

        self.db
            .query("UPDATE type::thing($table, $id) CONTENT $data RETURN NONE")
            .bind(("table", SHIFT_TABLE))
            .bind(("id", shift.id))
            .bind(("data", shift_content(&shift)?))
            .await?
            .check()?;
        Ok(shift)
    }
}
