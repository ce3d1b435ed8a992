use crate::ipc::error::{err, ok};
use crate::ipc::helpers::get_required_str;
use crate::ipc::types::{AppState, Request};
use crate::login::LoginTab;

fn handle_select_tab(state: &mut AppState, req: &Request) -> serde_json::Value {
    let raw = match get_required_str(&req.params, "tab") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let Some(tab) = LoginTab::parse(&raw) else {
        return err(&req.id, "bad_params", "tab must be password or otp", None);
    };
    state.login.select(tab);
    ok(&req.id, state.login.to_json())
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "login.selectTab" => Some(handle_select_tab(state, req)),
        "login.state" => Some(ok(&req.id, state.login.to_json())),
        _ => None,
    }
}
