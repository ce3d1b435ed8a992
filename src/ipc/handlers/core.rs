use crate::config::ClientConfig;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::get_opt_str;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn session_json(state: &AppState) -> serde_json::Value {
    json!({
        "baseUrl": state.config.base_url,
        "hasSessionCookie": state.config.session_cookie.is_some(),
    })
}

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "baseUrl": state.config.base_url,
        }),
    )
}

fn handle_session_configure(state: &mut AppState, req: &Request) -> serde_json::Value {
    let base_url = get_opt_str(&req.params, "baseUrl").unwrap_or_else(|| state.config.base_url.clone());
    // An absent key keeps the current cookie; an explicit empty string clears it.
    let cookie = match req.params.get("sessionCookie") {
        Some(v) => v.as_str().map(|s| s.to_string()),
        None => state.config.session_cookie.clone(),
    };

    match ClientConfig::new(&base_url, cookie.as_deref()) {
        Ok(config) => {
            log::info!("portal session now targets {}", config.base_url);
            state.reconfigure(config);
            ok(&req.id, session_json(state))
        }
        Err(e) => err(&req.id, "bad_params", e.to_string(), None),
    }
}

fn handle_session_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, session_json(state))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "session.configure" => Some(handle_session_configure(state, req)),
        "session.get" => Some(handle_session_get(state, req)),
        _ => None,
    }
}
