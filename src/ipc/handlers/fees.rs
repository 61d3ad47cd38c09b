use crate::fees;
use crate::ipc::error::{ok, roster_err};
use crate::ipc::types::{AppState, Request};
use crate::query::RosterQuery;
use serde_json::json;

fn handle_fees_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    // Without search/status this is the whole-roster dashboard.
    let query = match RosterQuery::from_params(&req.params) {
        Ok(v) => v,
        Err(e) => return roster_err(&req.id, e),
    };
    let summary = fees::aggregate(state.roster.records().iter().filter(|r| query.matches(r)));
    ok(&req.id, json!(summary))
}

fn handle_fees_classify(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let total_fees = match fees::parse_amount("totalFees", req.params.get("totalFees")) {
        Ok(v) => v,
        Err(e) => return roster_err(&req.id, e),
    };
    let paid_amount = match fees::parse_amount("paidAmount", req.params.get("paidAmount")) {
        Ok(v) => v,
        Err(e) => return roster_err(&req.id, e),
    };
    ok(
        &req.id,
        json!({ "status": fees::classify(total_fees, paid_amount) }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "fees.summary" => Some(handle_fees_summary(state, req)),
        "fees.classify" => Some(handle_fees_classify(state, req)),
        _ => None,
    }
}
