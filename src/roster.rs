use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use crate::fees::{self, Status};

#[derive(Debug, Clone, Serialize)]
pub struct RosterError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for RosterError {}

impl RosterError {
    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        Self {
            code: "invalid_input".to_string(),
            message: message.into(),
            details: Some(json!({ "field": field })),
        }
    }
}

/// The complete set of user-editable fields. Every edit supplies all of
/// them; there is no partial update path.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet {
    name: String,
    email: String,
    phone: String,
    course: String,
    total_fees: Decimal,
    paid_amount: Decimal,
}

impl FieldSet {
    pub fn new(
        name: &str,
        email: &str,
        phone: &str,
        course: &str,
        total_fees: Decimal,
        paid_amount: Decimal,
    ) -> Result<Self, RosterError> {
        let name = required_text("name", name)?;
        let email = required_text("email", email)?;
        let phone = required_text("phone", phone)?;
        let course = required_text("course", course)?;
        let total_fees = fees::check_amount("totalFees", total_fees)?;
        let paid_amount = fees::check_amount("paidAmount", paid_amount)?;
        Ok(Self {
            name,
            email,
            phone,
            course,
            total_fees,
            paid_amount,
        })
    }

    /// Builds a field set from request params, reading the camelCase keys
    /// the shell sends.
    pub fn from_params(params: &serde_json::Value) -> Result<Self, RosterError> {
        let text = |key: &str| params.get(key).and_then(|v| v.as_str()).unwrap_or("");
        let total_fees = fees::parse_amount("totalFees", params.get("totalFees"))?;
        let paid_amount = fees::parse_amount("paidAmount", params.get("paidAmount"))?;
        Self::new(
            text("name"),
            text("email"),
            text("phone"),
            text("course"),
            total_fees,
            paid_amount,
        )
    }
}

fn required_text(field: &str, v: &str) -> Result<String, RosterError> {
    let v = v.trim();
    if v.is_empty() {
        return Err(RosterError::invalid_input(
            field,
            format!("{field} must not be empty"),
        ));
    }
    Ok(v.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    id: String,
    name: String,
    email: String,
    phone: String,
    course: String,
    #[serde(with = "rust_decimal::serde::str")]
    total_fees: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    paid_amount: Decimal,
    last_payment_date: DateTime<Utc>,
    status: Status,
}

impl StudentRecord {
    fn build(id: String, fields: FieldSet, stamped_at: DateTime<Utc>) -> Self {
        let status = fees::classify(fields.total_fees, fields.paid_amount);
        Self {
            id,
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            course: fields.course,
            total_fees: fields.total_fees,
            paid_amount: fields.paid_amount,
            last_payment_date: stamped_at,
            status,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn course(&self) -> &str {
        &self.course
    }
    pub fn total_fees(&self) -> Decimal {
        self.total_fees
    }
    pub fn paid_amount(&self) -> Decimal {
        self.paid_amount
    }
    pub fn status(&self) -> Status {
        self.status
    }
}

/// Ordered roster; lookups go by id, enumeration keeps insertion order.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<StudentRecord>,
}

impl RecordStore {
    pub fn insert(&mut self, record: StudentRecord) {
        self.records.push(record);
    }

    /// Swaps in `record` at the position of `id`. No-op when `id` is absent.
    pub fn replace(&mut self, id: &str, record: StudentRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// No-op when `id` is absent.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&StudentRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn all(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Proof that the caller obtained the user's go-ahead for a deletion.
/// The roster never prompts on its own.
#[derive(Debug, Clone, Copy)]
pub struct Confirmed(());

impl Confirmed {
    pub fn from_flag(confirmed: bool) -> Option<Self> {
        confirmed.then_some(Confirmed(()))
    }
}

/// Sole writer of the record store. Assigns identities, stamps edits and
/// keeps `status` in step with the amounts.
#[derive(Debug, Default)]
pub struct Roster {
    store: RecordStore,
    issued_ids: HashSet<String>,
}

impl Roster {
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn records(&self) -> &[StudentRecord] {
        self.store.all()
    }

    fn next_id(&mut self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.issued_ids.insert(id.clone()) {
                return id;
            }
        }
    }

    pub fn create_record(&mut self, fields: FieldSet) -> StudentRecord {
        let id = self.next_id();
        let record = StudentRecord::build(id, fields, Utc::now());
        self.store.insert(record.clone());
        log::info!(
            "created student {} ({}), status={}",
            record.id,
            record.name,
            record.status
        );
        record
    }

    /// Replaces the whole record under `id`. Returns `None`, leaving the
    /// store as it was, when the id is not present.
    pub fn update_record(&mut self, id: &str, fields: FieldSet) -> Option<StudentRecord> {
        let record = StudentRecord::build(id.to_string(), fields, Utc::now());
        if !self.store.replace(id, record.clone()) {
            log::debug!("update skipped, student {id} not present");
            return None;
        }
        log::info!("updated student {id}, status={}", record.status);
        Some(record)
    }

    pub fn delete_record(&mut self, id: &str, _confirmed: Confirmed) -> bool {
        let removed = self.store.remove(id);
        if removed {
            log::info!("deleted student {id}");
        } else {
            log::debug!("delete skipped, student {id} not present");
        }
        removed
    }
}
