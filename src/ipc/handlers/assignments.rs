use std::sync::Arc;

use crate::assignments::{SubmissionSheet, SubmissionStatus};
use crate::ipc::error::{err, ok, HandlerErr};
use crate::ipc::handlers::roster::submit_failed;
use crate::ipc::helpers::get_required_str;
use crate::ipc::types::{AppState, Dispatch, Request};
use serde_json::json;

fn no_sheet(id: &str) -> serde_json::Value {
    err(id, "no_assignment", "open an assignment sheet first", None)
}

fn required_status(req: &Request) -> Result<SubmissionStatus, HandlerErr> {
    let raw = get_required_str(&req.params, "status")?;
    Ok(SubmissionStatus::parse(&raw)?)
}

fn required_string_list(req: &Request, key: &str) -> Result<Vec<String>, HandlerErr> {
    let Some(arr) = req.params.get(key).and_then(|v| v.as_array()) else {
        return Err(HandlerErr::new("bad_params", format!("missing {}", key)));
    };
    let mut out = Vec::with_capacity(arr.len());
    for (i, v) in arr.iter().enumerate() {
        match v.as_str() {
            Some(s) => out.push(s.to_string()),
            None => {
                return Err(HandlerErr::new("bad_params", format!("{}[{}] must be a string", key, i))
                    .with_details(json!({ "index": i })))
            }
        }
    }
    Ok(out)
}

fn handle_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let assignment_id = match get_required_str(&req.params, "assignmentId") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let students = match required_string_list(req, "students") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    match SubmissionSheet::open(&assignment_id, &students) {
        Ok(sheet) => {
            let body = sheet.to_json();
            state.assignments = Some(sheet);
            ok(&req.id, body)
        }
        Err(e) => HandlerErr::from(e).response(&req.id),
    }
}

fn handle_set_status(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(sheet) = state.assignments.as_mut() else {
        return no_sheet(&req.id);
    };
    let reg = match get_required_str(&req.params, "registrationNumber") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let status = match required_status(req) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    if !sheet.set_status(&reg, status) {
        return HandlerErr::new("not_found", "student not on this sheet")
            .with_details(json!({ "registrationNumber": reg }))
            .response(&req.id);
    }
    ok(&req.id, sheet.to_json())
}

fn handle_set_all(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(sheet) = state.assignments.as_mut() else {
        return no_sheet(&req.id);
    };
    let status = match required_status(req) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    sheet.set_all(status);
    ok(&req.id, sheet.to_json())
}

fn handle_submit(state: &mut AppState, req: &Request) -> Dispatch {
    let Some(sheet) = state.assignments.as_ref() else {
        return Dispatch::Reply(no_sheet(&req.id));
    };
    let fields = match sheet.encode() {
        Ok(v) => v,
        Err(e) => return Dispatch::Reply(HandlerErr::from(e).response(&req.id)),
    };
    let path = sheet.mark_path();
    let row_count = sheet.rows().len();
    let portal = Arc::clone(&state.portal);
    let id = req.id.clone();
    let spawned = state.replies.defer("assignment-submit", move || {
        match portal.post_form(&path, &fields) {
            Ok(()) => ok(&id, json!({ "submitted": true, "rowCount": row_count })),
            Err(e) => submit_failed(&id, e),
        }
    });
    match spawned {
        Ok(()) => Dispatch::Deferred,
        Err(e) => Dispatch::Reply(err(&req.id, "spawn_failed", e.to_string(), None)),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Dispatch> {
    let resp = match req.method.as_str() {
        "assignments.open" => handle_open(state, req),
        "assignments.setStatus" => handle_set_status(state, req),
        "assignments.setAll" => handle_set_all(state, req),
        "assignments.list" => match state.assignments.as_ref() {
            Some(sheet) => ok(&req.id, sheet.to_json()),
            None => no_sheet(&req.id),
        },
        "assignments.submit" => return Some(handle_submit(state, req)),
        _ => return None,
    };
    Some(Dispatch::Reply(resp))
}
