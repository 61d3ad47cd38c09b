use crate::ipc::error::{err, ok, roster_err};
use crate::ipc::types::{AppState, Request};
use crate::query::RosterQuery;
use crate::roster::{Confirmed, FieldSet};
use serde_json::json;

fn student_id_param(req: &Request) -> Result<String, serde_json::Value> {
    match req.params.get("studentId").and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(err(&req.id, "bad_params", "missing studentId", None)),
    }
}

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "students": state.roster.records() }))
}

fn handle_students_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match student_id_param(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.roster.store().get(&student_id) {
        Some(student) => ok(&req.id, json!({ "student": student })),
        None => err(
            &req.id,
            "not_found",
            "student not found",
            Some(json!({ "studentId": student_id })),
        ),
    }
}

fn handle_students_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let fields = match FieldSet::from_params(&req.params) {
        Ok(v) => v,
        Err(e) => return roster_err(&req.id, e),
    };
    let student = state.roster.create_record(fields);
    ok(&req.id, json!({ "student": student }))
}

fn handle_students_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match student_id_param(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let fields = match FieldSet::from_params(&req.params) {
        Ok(v) => v,
        Err(e) => return roster_err(&req.id, e),
    };

    // A vanished selection is not an error; the shell just gets updated=false.
    let student = state.roster.update_record(&student_id, fields);
    ok(
        &req.id,
        json!({ "updated": student.is_some(), "student": student }),
    )
}

fn handle_students_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match student_id_param(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let confirmed = req
        .params
        .get("confirmed")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let Some(token) = Confirmed::from_flag(confirmed) else {
        return err(
            &req.id,
            "confirmation_required",
            "deleting a student requires confirmed=true",
            Some(json!({ "studentId": student_id })),
        );
    };

    let deleted = state.roster.delete_record(&student_id, token);
    ok(&req.id, json!({ "deleted": deleted }))
}

fn handle_students_filter(state: &mut AppState, req: &Request) -> serde_json::Value {
    let query = match RosterQuery::from_params(&req.params) {
        Ok(v) => v,
        Err(e) => return roster_err(&req.id, e),
    };
    let students = query.filter(state.roster.records());
    ok(&req.id, json!({ "students": students }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_students_list(state, req)),
        "students.get" => Some(handle_students_get(state, req)),
        "students.create" => Some(handle_students_create(state, req)),
        "students.update" => Some(handle_students_update(state, req)),
        "students.delete" => Some(handle_students_delete(state, req)),
        "students.filter" => Some(handle_students_filter(state, req)),
        _ => None,
    }
}
