use std::str::FromStr;

use crate::fees::Status;
use crate::roster::{RosterError, StudentRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn admits(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(s) => s == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            other => other.parse::<Status>().map(StatusFilter::Only),
        }
    }
}

/// Lower-cased search term paired with a status predicate.
#[derive(Debug, Clone, Default)]
pub struct RosterQuery {
    needle: String,
    status: StatusFilter,
}

impl RosterQuery {
    pub fn new(search_term: &str, status: StatusFilter) -> Self {
        Self {
            needle: search_term.to_lowercase(),
            status,
        }
    }

    /// Reads optional `search` and `status` keys from request params.
    pub fn from_params(params: &serde_json::Value) -> Result<Self, RosterError> {
        let search = match params.get("search") {
            None | Some(serde_json::Value::Null) => "",
            Some(v) => v
                .as_str()
                .ok_or_else(|| RosterError::invalid_input("search", "search must be a string"))?,
        };
        let status = match params.get("status") {
            None | Some(serde_json::Value::Null) => StatusFilter::All,
            Some(v) => v
                .as_str()
                .ok_or_else(|| RosterError::invalid_input("status", "status must be a string"))?
                .parse::<StatusFilter>()?,
        };
        Ok(Self::new(search, status))
    }

    pub fn matches(&self, record: &StudentRecord) -> bool {
        self.matches_search(record) && self.status.admits(record.status())
    }

    /// Stable filter: survivors keep their roster order.
    pub fn filter<'a>(&self, records: &'a [StudentRecord]) -> Vec<&'a StudentRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    fn matches_search(&self, record: &StudentRecord) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        [record.name(), record.email(), record.course()]
            .iter()
            .any(|field| field.to_lowercase().contains(&self.needle))
    }
}
