use crate::ipc::error::{ok, roster_err};
use crate::ipc::types::{AppState, Request};
use crate::seed;
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "studentCount": state.roster.store().len()
        }),
    )
}

fn handle_roster_seed_demo(state: &mut AppState, req: &Request) -> serde_json::Value {
    match seed::load_demo(&mut state.roster) {
        Ok(added) => ok(&req.id, json!({ "students": added })),
        Err(e) => roster_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "roster.seedDemo" => Some(handle_roster_seed_demo(state, req)),
        _ => None,
    }
}
