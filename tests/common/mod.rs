#![allow(dead_code)]

use serde_json::json;
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_rosterd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .env_remove("ROSTERD_BASE_URL")
        .env_remove("ROSTERD_SESSION_COOKIE")
        .spawn()
        .expect("spawn rosterd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

pub fn send(stdin: &mut ChildStdin, id: &str, method: &str, params: serde_json::Value) {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");
}

pub fn read_reply(reader: &mut BufReader<ChildStdout>) -> serde_json::Value {
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response line");
    serde_json::from_str(line.trim()).expect("parse response json")
}

pub fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    send(stdin, id, method, params);
    let value = read_reply(reader);
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

pub fn result(value: &serde_json::Value) -> &serde_json::Value {
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(true),
        "expected ok reply, got {}",
        value
    );
    value.get("result").expect("result")
}

pub fn error_code(value: &serde_json::Value) -> &str {
    assert_eq!(value.get("ok").and_then(|v| v.as_bool()), Some(false), "{}", value);
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .expect("error code")
}

/// Registration numbers of the rows in a reply, in order.
pub fn row_regs(result: &serde_json::Value) -> Vec<String> {
    result
        .get("rows")
        .and_then(|v| v.as_array())
        .expect("rows")
        .iter()
        .map(|r| {
            r.get("registrationNumber")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        })
        .collect()
}

pub fn row_ids(result: &serde_json::Value) -> Vec<String> {
    result
        .get("rows")
        .and_then(|v| v.as_array())
        .expect("rows")
        .iter()
        .map(|r| r.get("rowId").and_then(|v| v.as_str()).expect("rowId").to_string())
        .collect()
}

/// An address nothing listens on.
pub fn dead_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let port = listener.local_addr().expect("probe addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[derive(Debug, Clone)]
pub struct Hit {
    pub method: String,
    pub url: String,
    pub cookie: Option<String>,
    pub body: String,
}

struct Canned {
    url_contains: String,
    status: u16,
    body: String,
    delay: Duration,
}

/// Stand-in for the portal server: replies are scripted per URL fragment and
/// every request is recorded.
pub struct FakePortal {
    pub base_url: String,
    hits: Arc<Mutex<Vec<Hit>>>,
    canned: Arc<Mutex<Vec<Canned>>>,
}

impl FakePortal {
    pub fn start() -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind fake portal");
        let addr = server.server_addr().to_ip().expect("ip listener");
        let hits: Arc<Mutex<Vec<Hit>>> = Arc::new(Mutex::new(Vec::new()));
        let canned: Arc<Mutex<Vec<Canned>>> = Arc::new(Mutex::new(Vec::new()));

        let hits_bg = Arc::clone(&hits);
        let canned_bg = Arc::clone(&canned);
        thread::spawn(move || {
            for mut rq in server.incoming_requests() {
                let mut body = String::new();
                let _ = rq.as_reader().read_to_string(&mut body);
                let url = rq.url().to_string();
                let cookie = rq
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Cookie"))
                    .map(|h| h.value.as_str().to_string());
                hits_bg.lock().unwrap().push(Hit {
                    method: rq.method().to_string(),
                    url: url.clone(),
                    cookie,
                    body,
                });

                let reply = {
                    let mut canned = canned_bg.lock().unwrap();
                    let pos = canned.iter().position(|c| url.contains(&c.url_contains));
                    pos.map(|i| canned.remove(i))
                };
                let (status, body, delay) = match reply {
                    Some(c) => (c.status, c.body, c.delay),
                    None => (404, "no reply scripted".to_string(), Duration::ZERO),
                };
                thread::spawn(move || {
                    thread::sleep(delay);
                    let header = tiny_http::Header::from_bytes(
                        &b"Content-Type"[..],
                        &b"application/json"[..],
                    )
                    .expect("header");
                    let resp = tiny_http::Response::from_string(body)
                        .with_status_code(status)
                        .with_header(header);
                    let _ = rq.respond(resp);
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
            canned,
        }
    }

    pub fn reply(&self, url_contains: &str, status: u16, body: &str) {
        self.reply_after(url_contains, status, body, Duration::ZERO);
    }

    pub fn reply_after(&self, url_contains: &str, status: u16, body: &str, delay: Duration) {
        self.canned.lock().unwrap().push(Canned {
            url_contains: url_contains.to_string(),
            status,
            body: body.to_string(),
            delay,
        });
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }
}

pub fn configure(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    base_url: &str,
    cookie: Option<&str>,
) {
    let mut params = json!({ "baseUrl": base_url });
    if let Some(c) = cookie {
        params["sessionCookie"] = json!(c);
    }
    let resp = request(stdin, reader, "cfg", "session.configure", params);
    result(&resp);
}
