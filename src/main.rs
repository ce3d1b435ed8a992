mod assignments;
mod attendance;
mod config;
mod criteria;
mod fetcher;
mod forms;
mod ipc;
mod login;
mod notice;
mod portal;
mod roster;
mod subjects;

use std::io::{self, BufRead};

use config::ClientConfig;

fn main() {
    // stdout carries the IPC replies, so logs go to stderr only.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = match ClientConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("{:#}; using {}", e, config::DEFAULT_BASE_URL);
            ClientConfig::default()
        }
    };
    log::info!("rosterd {} talking to {}", env!("CARGO_PKG_VERSION"), config.base_url);

    let replies = ipc::ReplySink::stdout();
    let mut state = ipc::AppState::new(config, replies.clone());

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                replies.send(&serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                }));
                continue;
            }
        };

        log::debug!("request {} {}", req.id, req.method);
        match ipc::handle_request(&mut state, req) {
            ipc::Dispatch::Reply(resp) => replies.send(&resp),
            ipc::Dispatch::Deferred => {}
        }
    }

    replies.drain();
}
