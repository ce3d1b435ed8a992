use std::sync::Arc;

use crate::attendance::{AttendanceForm, MARK_ATTENDANCE_PATH};
use crate::criteria::QueryCriteria;
use crate::fetcher::FetchOutcome;
use crate::ipc::error::{err, ok, HandlerErr};
use crate::ipc::helpers::{get_required_str, parse_params};
use crate::ipc::types::{AppState, Dispatch, Request};
use crate::notice;
use crate::portal::SourceError;
use crate::roster::{rows_json, AttendanceStatus, RosterRegion, RosterRow};
use serde_json::json;

fn status_options() -> Vec<&'static str> {
    AttendanceStatus::OPTIONS.iter().map(|s| s.as_str()).collect()
}

fn fetch_result(id: &str, outcome: &FetchOutcome, rows: &[RosterRow]) -> serde_json::Value {
    ok(
        id,
        json!({
            "outcome": outcome.kind(),
            "applied": outcome.applied(),
            "notice": notice::for_fetch(outcome),
            "rows": rows_json(rows),
        }),
    )
}

fn handle_roster_fetch(state: &mut AppState, req: &Request) -> Dispatch {
    let criteria: QueryCriteria = match parse_params(&req.params) {
        Ok(v) => v,
        Err(e) => return Dispatch::Reply(e.response(&req.id)),
    };

    let ticket = match state.roster.begin(&criteria) {
        Ok(t) => t,
        Err(outcome) => {
            let rows = state.roster.region().rows().to_vec();
            return Dispatch::Reply(fetch_result(&req.id, &outcome, &rows));
        }
    };

    log::debug!("enrolled-students fetch #{} issued", ticket.seq());
    let roster = Arc::clone(&state.roster);
    let portal = Arc::clone(&state.portal);
    let id = req.id.clone();
    let spawned = state.replies.defer("roster-fetch", move || {
        let answer = portal.enrolled_students(ticket.criteria());
        let resolution = roster.resolve(&ticket, answer);
        fetch_result(&id, &resolution.outcome, &resolution.rows)
    });
    match spawned {
        Ok(()) => Dispatch::Deferred,
        Err(e) => Dispatch::Reply(err(&req.id, "spawn_failed", e.to_string(), None)),
    }
}

fn handle_roster_add_row(state: &mut AppState, req: &Request) -> serde_json::Value {
    let row = RosterRow::empty();
    let row_json = row.to_json();
    let mut region = state.roster.region();
    region.append(row);
    ok(&req.id, json!({ "row": row_json, "rows": rows_json(region.rows()) }))
}

fn handle_roster_remove_row(state: &mut AppState, req: &Request) -> serde_json::Value {
    let row_id = match get_required_str(&req.params, "rowId") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let mut region = state.roster.region();
    if !region.remove(&row_id) {
        return HandlerErr::new("not_found", "row not found")
            .with_details(json!({ "rowId": row_id }))
            .response(&req.id);
    }
    ok(&req.id, json!({ "rows": rows_json(region.rows()) }))
}

fn edit_row(
    state: &mut AppState,
    req: &Request,
    apply: impl FnOnce(&mut RosterRow) -> Result<(), HandlerErr>,
) -> serde_json::Value {
    let row_id = match get_required_str(&req.params, "rowId") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let mut region = state.roster.region();
    let Some(row) = region.row_mut(&row_id) else {
        return HandlerErr::new("not_found", "row not found")
            .with_details(json!({ "rowId": row_id }))
            .response(&req.id);
    };
    if let Err(e) = apply(row) {
        return e.response(&req.id);
    }
    ok(&req.id, json!({ "row": row.to_json() }))
}

fn handle_roster_set_registration(state: &mut AppState, req: &Request) -> serde_json::Value {
    if req.params.get("name").is_some() {
        return err(&req.id, "read_only", "student name is read-only", None);
    }
    let value = match get_required_str(&req.params, "registrationNumber") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    edit_row(state, req, |row| {
        row.registration_number = value;
        Ok(())
    })
}

fn handle_roster_set_status(state: &mut AppState, req: &Request) -> serde_json::Value {
    let raw = match get_required_str(&req.params, "status") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let Some(status) = AttendanceStatus::parse(&raw) else {
        return err(
            &req.id,
            "bad_params",
            format!("unknown status {:?}", raw),
            Some(json!({ "options": status_options() })),
        );
    };
    edit_row(state, req, |row| {
        row.status = status;
        Ok(())
    })
}

fn handle_roster_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let region = state.roster.region();
    ok(
        &req.id,
        json!({
            "rows": rows_json(region.rows()),
            "statusOptions": status_options(),
        }),
    )
}

fn handle_roster_submit(state: &mut AppState, req: &Request) -> Dispatch {
    let form: AttendanceForm = match parse_params(&req.params) {
        Ok(v) => v,
        Err(e) => return Dispatch::Reply(e.response(&req.id)),
    };
    let today = chrono::Local::now().date_naive();
    let encoded = {
        let region = state.roster.region();
        form.encode(region.rows(), today)
    };
    let fields = match encoded {
        Ok(v) => v,
        Err(e) => return Dispatch::Reply(HandlerErr::from(e).response(&req.id)),
    };

    let row_count = fields.iter().filter(|(k, _)| k == "student_reg_no[]").count();
    let portal = Arc::clone(&state.portal);
    let id = req.id.clone();
    let spawned = state.replies.defer("attendance-submit", move || {
        match portal.post_form(MARK_ATTENDANCE_PATH, &fields) {
            Ok(()) => ok(&id, json!({ "submitted": true, "rowCount": row_count })),
            Err(e) => submit_failed(&id, e),
        }
    });
    match spawned {
        Ok(()) => Dispatch::Deferred,
        Err(e) => Dispatch::Reply(err(&req.id, "spawn_failed", e.to_string(), None)),
    }
}

pub(crate) fn submit_failed(id: &str, e: SourceError) -> serde_json::Value {
    log::error!("form submission failed: {}", e);
    match e {
        SourceError::Status { status, body } => err(
            id,
            "http_failed",
            format!("portal answered {}", status),
            Some(json!({ "status": status, "body": body })),
        ),
        other => err(id, "transport_failed", other.to_string(), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Dispatch> {
    match req.method.as_str() {
        "roster.fetch" => Some(handle_roster_fetch(state, req)),
        "roster.submit" => Some(handle_roster_submit(state, req)),
        "roster.addRow" => Some(Dispatch::Reply(handle_roster_add_row(state, req))),
        "roster.removeRow" => Some(Dispatch::Reply(handle_roster_remove_row(state, req))),
        "roster.setRegistration" => Some(Dispatch::Reply(handle_roster_set_registration(state, req))),
        "roster.setStatus" => Some(Dispatch::Reply(handle_roster_set_status(state, req))),
        "roster.list" => Some(Dispatch::Reply(handle_roster_list(state, req))),
        _ => None,
    }
}
