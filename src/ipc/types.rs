use std::sync::{Arc, Mutex};

use serde::Deserialize;

use crate::assignments::SubmissionSheet;
use crate::config::ClientConfig;
use crate::fetcher::RosterFetcher;
use crate::ipc::reply::ReplySink;
use crate::login::LoginTabs;
use crate::portal::{HttpPortal, Portal};
use crate::roster::RowList;
use crate::subjects::SubjectRows;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// What the request loop should do once a handler returns.
pub enum Dispatch {
    Reply(serde_json::Value),
    /// A worker thread owns the request and writes the reply itself.
    Deferred,
}

pub struct AppState {
    pub config: ClientConfig,
    pub portal: Arc<dyn Portal>,
    pub roster: Arc<RosterFetcher<RowList>>,
    pub login: LoginTabs,
    pub subjects: SubjectRows,
    pub assignments: Option<SubmissionSheet>,
    pub replies: ReplySink,
}

impl AppState {
    pub fn new(config: ClientConfig, replies: ReplySink) -> Self {
        Self {
            portal: Arc::new(HttpPortal::new(config.clone())),
            config,
            roster: Arc::new(RosterFetcher::new(Arc::new(Mutex::new(RowList::new())))),
            login: LoginTabs::default(),
            subjects: SubjectRows::default(),
            assignments: None,
            replies,
        }
    }

    pub fn reconfigure(&mut self, config: ClientConfig) {
        self.portal = Arc::new(HttpPortal::new(config.clone()));
        self.config = config;
    }
}
