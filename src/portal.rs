use serde::Deserialize;

use crate::config::ClientConfig;
use crate::criteria::{ValidCriteria, ENROLLED_STUDENTS_PATH};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StudentRecord {
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EnrolledStudentsBody {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    students: Vec<StudentRecord>,
}

/// A 2xx answer from the enrolled-students endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrolledStudents {
    Listed(Vec<StudentRecord>),
    Refused(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("portal answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub fn parse_enrolled_body(body: &str) -> Result<EnrolledStudents, SourceError> {
    let parsed: EnrolledStudentsBody =
        serde_json::from_str(body).map_err(|e| SourceError::Malformed(e.to_string()))?;
    if parsed.ok {
        Ok(EnrolledStudents::Listed(parsed.students))
    } else {
        Ok(EnrolledStudents::Refused(parsed.error))
    }
}

/// The same-origin portal endpoints the sidecar calls.
pub trait Portal: Send + Sync {
    fn enrolled_students(&self, criteria: &ValidCriteria) -> Result<EnrolledStudents, SourceError>;

    /// Posts a form-urlencoded body. Redirects are followed; any final 2xx is success.
    fn post_form(&self, path: &str, fields: &[(String, String)]) -> Result<(), SourceError>;
}

pub struct HttpPortal {
    agent: ureq::Agent,
    config: ClientConfig,
}

impl HttpPortal {
    pub fn new(config: ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("rosterd/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent, config }
    }

    fn with_session(&self, req: ureq::Request) -> ureq::Request {
        match &self.config.session_cookie {
            Some(cookie) => req.set("Cookie", cookie),
            None => req,
        }
    }
}

fn status_error(status: u16, body: std::io::Result<String>) -> SourceError {
    match body {
        Ok(body) => SourceError::Status { status, body },
        Err(e) => SourceError::Transport(format!("reading {} body: {}", status, e)),
    }
}

fn into_source_error(err: ureq::Error) -> SourceError {
    match err {
        ureq::Error::Status(status, resp) => status_error(status, resp.into_string()),
        ureq::Error::Transport(t) => SourceError::Transport(t.to_string()),
    }
}

fn read_success_body(resp: ureq::Response) -> Result<String, SourceError> {
    let status = resp.status();
    let body = resp
        .into_string()
        .map_err(|e| SourceError::Transport(e.to_string()))?;
    if !(200..300).contains(&status) {
        return Err(SourceError::Status { status, body });
    }
    Ok(body)
}

impl Portal for HttpPortal {
    fn enrolled_students(&self, criteria: &ValidCriteria) -> Result<EnrolledStudents, SourceError> {
        let url = self.config.url_for(ENROLLED_STUDENTS_PATH);
        let mut req = self.with_session(self.agent.get(&url));
        for (key, value) in criteria.query_pairs() {
            req = req.query(key, value);
        }
        log::info!("fetching enrolled students for {:?}", criteria.subject_name());
        let resp = req.call().map_err(into_source_error)?;
        let body = read_success_body(resp)?;
        parse_enrolled_body(&body)
    }

    fn post_form(&self, path: &str, fields: &[(String, String)]) -> Result<(), SourceError> {
        let url = self.config.url_for(path);
        let pairs: Vec<(&str, &str)> = fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        log::info!("posting {} form fields to {}", pairs.len(), path);
        let resp = self
            .with_session(self.agent.post(&url))
            .send_form(&pairs)
            .map_err(into_source_error)?;
        read_success_body(resp).map(|_| ())
    }
}
