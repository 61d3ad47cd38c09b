use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::roster::{RosterError, StudentRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Unpaid,
    PartiallyPaid,
    FullyPaid,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Unpaid => "unpaid",
            Status::PartiallyPaid => "partially_paid",
            Status::FullyPaid => "fully_paid",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Status::Unpaid),
            "partially_paid" => Ok(Status::PartiallyPaid),
            "fully_paid" => Ok(Status::FullyPaid),
            other => Err(RosterError::invalid_input(
                "status",
                format!("unknown status: {other}"),
            )),
        }
    }
}

/// Payment status is a function of the two amounts only.
///
/// A zero payment is `Unpaid` even when nothing is owed; any payment that
/// reaches the total is `FullyPaid`.
pub fn classify(total_fees: Decimal, paid_amount: Decimal) -> Status {
    if paid_amount.is_zero() {
        Status::Unpaid
    } else if paid_amount >= total_fees {
        Status::FullyPaid
    } else {
        Status::PartiallyPaid
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub unpaid: usize,
    pub partially_paid: usize,
    pub fully_paid: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSummary {
    pub count: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_fees: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub collected: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub pending: Decimal,
    pub by_status: StatusCounts,
}

pub fn aggregate<'a, I>(records: I) -> RosterSummary
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    let mut count: usize = 0;
    let mut total_fees = Decimal::ZERO;
    let mut collected = Decimal::ZERO;
    let mut by_status = StatusCounts::default();

    for r in records {
        count += 1;
        total_fees += r.total_fees();
        collected += r.paid_amount();
        match r.status() {
            Status::Unpaid => by_status.unpaid += 1,
            Status::PartiallyPaid => by_status.partially_paid += 1,
            Status::FullyPaid => by_status.fully_paid += 1,
        }
    }

    // Amounts are capped at MAX_AMOUNT on entry, so the sums above stay in range.
    // Derived from the two sums so collected + pending == total_fees holds exactly.
    let pending = total_fees - collected;

    RosterSummary {
        count,
        total_fees,
        collected,
        pending,
        by_status,
    }
}

/// Largest accepted fee amount, in whole currency units. Sums over any
/// roster that fits in memory stay far below `Decimal::MAX`, so `aggregate`
/// cannot overflow.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Range check shared by every path that admits an amount into the roster.
pub fn check_amount(field: &str, amount: Decimal) -> Result<Decimal, RosterError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(RosterError::invalid_input(
            field,
            format!("{field} must not be negative"),
        ));
    }
    if amount > Decimal::from(MAX_AMOUNT) {
        return Err(RosterError::invalid_input(
            field,
            format!("{field} must not exceed {MAX_AMOUNT}"),
        ));
    }
    // "-0" normalises to plain zero.
    Ok(amount.abs().normalize())
}

/// Reads a fee amount from a request value. Accepts JSON numbers and
/// numeric strings; rejects negatives, digit separators and anything
/// non-numeric.
pub fn parse_amount(field: &str, v: Option<&serde_json::Value>) -> Result<Decimal, RosterError> {
    let raw = match v {
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(serde_json::Value::Null) | None => {
            return Err(RosterError::invalid_input(field, format!("missing {field}")))
        }
        Some(_) => {
            return Err(RosterError::invalid_input(
                field,
                format!("{field} must be a number"),
            ))
        }
    };
    if raw.is_empty() {
        return Err(RosterError::invalid_input(field, format!("missing {field}")));
    }
    // rust_decimal would otherwise read "1_000" as 1000.
    if raw.contains('_') {
        return Err(RosterError::invalid_input(
            field,
            format!("{field} must be a number"),
        ));
    }

    let amount = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| RosterError::invalid_input(field, format!("{field} must be a number")))?;

    check_amount(field, amount)
}
