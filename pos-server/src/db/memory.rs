//! In-process store
//!
//! Keeps bills and shifts behind `parking_lot` locks. Used by tests and
//! by `STORE_BACKEND=memory`; nothing survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::{Bill, Shift};

use super::{BillStore, RepoError, RepoResult, ShiftStore, TimeRange};

#[derive(Debug, Default)]
pub struct MemoryStore {
    bills: RwLock<HashMap<i64, Bill>>,
    shifts: RwLock<HashMap<i64, Shift>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page<T>(items: Vec<T>, limit: usize, offset: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(limit).collect()
}

#[async_trait]
impl BillStore for MemoryStore {
    async fn insert(&self, bill: Bill) -> RepoResult<Bill> {
        let mut bills = self.bills.write();
        if bills.contains_key(&bill.id) {
            return Err(RepoError::Duplicate(format!("Bill {} already exists", bill.id)));
        }
        if bills
            .values()
            .any(|b| b.invoice_number == bill.invoice_number)
        {
            return Err(RepoError::Duplicate(format!(
                "Invoice '{}' already exists",
                bill.invoice_number
            )));
        }
        bills.insert(bill.id, bill.clone());
        Ok(bill)
    }

    async fn find_by_invoice(&self, invoice_number: &str) -> RepoResult<Option<Bill>> {
        Ok(self
            .bills
            .read()
            .values()
            .find(|b| b.invoice_number == invoice_number)
            .cloned())
    }

    async fn find_in_range(&self, range: TimeRange) -> RepoResult<Vec<Bill>> {
        let mut bills: Vec<Bill> = self
            .bills
            .read()
            .values()
            .filter(|b| range.contains(b.created_at))
            .cloned()
            .collect();
        bills.sort_by_key(|b| (b.created_at, b.id));
        Ok(bills)
    }

    async fn find_by_shift(&self, shift_id: i64) -> RepoResult<Vec<Bill>> {
        let mut bills: Vec<Bill> = self
            .bills
            .read()
            .values()
            .filter(|b| b.shift_id == Some(shift_id))
            .cloned()
            .collect();
        bills.sort_by_key(|b| (b.created_at, b.id));
        Ok(bills)
    }

    async fn list(&self, limit: usize, offset: usize) -> RepoResult<Vec<Bill>> {
        let mut bills: Vec<Bill> = self.bills.read().values().cloned().collect();
        bills.sort_by_key(|b| std::cmp::Reverse((b.created_at, b.id)));
        Ok(page(bills, limit, offset))
    }

    async fn update(&self, bill: Bill) -> RepoResult<Bill> {
        let mut bills = self.bills.write();
        match bills.get_mut(&bill.id) {
            Some(existing) => {
                *existing = bill.clone();
                Ok(bill)
            }
            None => Err(RepoError::NotFound(format!("Bill {} not found", bill.id))),
        }
    }
}

#[async_trait]
impl ShiftStore for MemoryStore {
    async fn insert(&self, shift: Shift) -> RepoResult<Shift> {
        let mut shifts = self.shifts.write();
        if shifts.contains_key(&shift.id) {
            return Err(RepoError::Duplicate(format!("Shift {} already exists", shift.id)));
        }
        if shift.is_open()
            && shifts
                .values()
                .any(|s| s.is_open() && s.cashier_name == shift.cashier_name)
        {
            return Err(RepoError::Duplicate(format!(
                "{} already has an open shift",
                shift.cashier_name
            )));
        }
        shifts.insert(shift.id, shift.clone());
        Ok(shift)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Shift>> {
        Ok(self.shifts.read().get(&id).cloned())
    }

    async fn find_open_by_cashier(&self, cashier_name: &str) -> RepoResult<Option<Shift>> {
        Ok(self
            .shifts
            .read()
            .values()
            .filter(|s| s.is_open() && s.cashier_name == cashier_name)
            .max_by_key(|s| s.start_time)
            .cloned())
    }

    async fn find_in_range(&self, range: TimeRange) -> RepoResult<Vec<Shift>> {
        let mut shifts: Vec<Shift> = self
            .shifts
            .read()
            .values()
            .filter(|s| range.contains(s.start_time))
            .cloned()
            .collect();
        shifts.sort_by_key(|s| std::cmp::Reverse((s.start_time, s.id)));
        Ok(shifts)
    }

    async fn list(&self, limit: usize, offset: usize) -> RepoResult<Vec<Shift>> {
        let mut shifts: Vec<Shift> = self.shifts.read().values().cloned().collect();
        shifts.sort_by_key(|s| std::cmp::Reverse((s.start_time, s.id)));
        Ok(page(shifts, limit, offset))
    }

    async fn update(&self, shift: Shift) -> RepoResult<Shift> {
        let mut shifts = self.shifts.write();
        match shifts.get_mut(&shift.id) {
            Some(existing) => {
                *existing = shift.clone();
                Ok(shift)
            }
            None => Err(RepoError::NotFound(format!("Shift {} not found", shift.id))),
        }
    }
}
