use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::helpers::{get_opt_str, get_required_str};
use crate::ipc::types::{AppState, Request};
use crate::subjects::SubjectEdit;
use serde_json::json;

fn handle_add_row(state: &mut AppState, req: &Request) -> serde_json::Value {
    let row = state.subjects.add().to_json();
    ok(&req.id, json!({ "row": row, "rows": state.subjects.to_json() }))
}

fn handle_remove_row(state: &mut AppState, req: &Request) -> serde_json::Value {
    let row_id = match get_required_str(&req.params, "rowId") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    if !state.subjects.remove(&row_id) {
        return HandlerErr::new("not_found", "subject row not found")
            .with_details(json!({ "rowId": row_id }))
            .response(&req.id);
    }
    ok(&req.id, json!({ "rows": state.subjects.to_json() }))
}

fn handle_update_row(state: &mut AppState, req: &Request) -> serde_json::Value {
    let row_id = match get_required_str(&req.params, "rowId") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let edit = SubjectEdit {
        subject_name: get_opt_str(&req.params, "subjectName"),
        subject_code: get_opt_str(&req.params, "subjectCode"),
        subject_dept: get_opt_str(&req.params, "subjectDept"),
    };
    match state.subjects.update(&row_id, edit) {
        Some(row) => ok(&req.id, json!({ "row": row.to_json() })),
        None => HandlerErr::new("not_found", "subject row not found")
            .with_details(json!({ "rowId": row_id }))
            .response(&req.id),
    }
}

fn handle_form(state: &mut AppState, req: &Request) -> serde_json::Value {
    let semester = get_opt_str(&req.params, "semester").unwrap_or_default();
    match state.subjects.encode(&semester) {
        Ok(fields) => {
            let fields: Vec<serde_json::Value> = fields.into_iter().map(|(k, v)| json!([k, v])).collect();
            ok(&req.id, json!({ "fields": fields }))
        }
        Err(e) => HandlerErr::from(e).response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "subjects.addRow" => Some(handle_add_row(state, req)),
        "subjects.removeRow" => Some(handle_remove_row(state, req)),
        "subjects.updateRow" => Some(handle_update_row(state, req)),
        "subjects.list" => Some(ok(&req.id, json!({ "rows": state.subjects.to_json() }))),
        "subjects.form" => Some(handle_form(state, req)),
        _ => None,
    }
}
