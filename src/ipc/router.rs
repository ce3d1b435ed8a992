use super::handlers;
use super::types::{AppState, Dispatch, Request};
use crate::ipc::error::err;

pub fn handle_request(state: &mut AppState, req: Request) -> Dispatch {
    if let Some(resp) = handlers::core::try_handle(state, &req) {
        return Dispatch::Reply(resp);
    }
    if let Some(dispatch) = handlers::roster::try_handle(state, &req) {
        return dispatch;
    }
    if let Some(resp) = handlers::login::try_handle(state, &req) {
        return Dispatch::Reply(resp);
    }
    if let Some(resp) = handlers::subjects::try_handle(state, &req) {
        return Dispatch::Reply(resp);
    }
    if let Some(dispatch) = handlers::assignments::try_handle(state, &req) {
        return dispatch;
    }

    Dispatch::Reply(err(
        &req.id,
        "not_implemented",
        format!("unknown method: {}", req.method),
        None,
    ))
}
