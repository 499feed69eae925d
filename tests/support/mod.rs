//! Scripted collaborator doubles shared by the flow tests.
//!
//! Each double answers prompts from a queue and records every interaction
//! so tests can assert on ordering and on calls that must NOT happen.

// Each test binary compiles its own copy; not every binary uses every double.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use webtasker::binder::SurfaceId;
use webtasker::error::{RemoteError, WorkspaceError};
use webtasker::identity::Identity;
use webtasker::remote::prioritize;
use webtasker::{Profile, Remote, Ui, VerifiedSession, WebtaskDetail, WebtaskSummary, Workspace};

pub fn summary(token: &str, name: &str) -> WebtaskSummary {
    WebtaskSummary {
        token: token.to_string(),
        name: name.to_string(),
        container: "wt-user-0".to_string(),
        meta: HashMap::new(),
        webtask_url: Some(format!("https://example.test/run/{name}")),
    }
}

pub fn detail(token: &str, name: &str, code: &str) -> WebtaskDetail {
    WebtaskDetail {
        token: token.to_string(),
        name: name.to_string(),
        container: "wt-user-0".to_string(),
        meta: HashMap::new(),
        code: code.to_string(),
        webtask_url: format!("https://example.test/run/{name}"),
    }
}

pub fn profile() -> Profile {
    Profile {
        url: "https://webtask.example.test".to_string(),
        token: "profile-token".to_string(),
        container: "wt-user-0".to_string(),
    }
}

/// UI double answering from scripted queues.
#[derive(Default)]
pub struct ScriptedUi {
    confirms: Mutex<VecDeque<Option<bool>>>,
    prompts: Mutex<VecDeque<Option<String>>>,
    picks: Mutex<VecDeque<Option<usize>>>,
    pub notifications: Mutex<Vec<String>>,
    pub opened_urls: Mutex<Vec<String>>,
    /// Token order of every list presented to the user.
    pub presented: Mutex<Vec<Vec<String>>>,
}

impl ScriptedUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_confirm(self, answer: Option<bool>) -> Self {
        self.confirms.lock().unwrap().push_back(answer);
        self
    }

    pub fn with_prompt(self, answer: Option<&str>) -> Self {
        self.prompts
            .lock()
            .unwrap()
            .push_back(answer.map(str::to_string));
        self
    }

    /// Script the next pick as a zero-based index into the presented list,
    /// or `None` for a dismissal.
    pub fn with_pick(self, index: Option<usize>) -> Self {
        self.picks.lock().unwrap().push_back(index);
        self
    }

    pub fn notified(&self, fragment: &str) -> bool {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .any(|msg| msg.contains(fragment))
    }
}

#[async_trait]
impl Ui for ScriptedUi {
    async fn confirm(&self, _question: &str) -> Option<bool> {
        self.confirms.lock().unwrap().pop_front().flatten()
    }

    async fn prompt(&self, _message: &str) -> Option<String> {
        self.prompts.lock().unwrap().pop_front().flatten()
    }

    async fn pick(&self, webtasks: &[WebtaskSummary]) -> Option<WebtaskSummary> {
        self.presented
            .lock()
            .unwrap()
            .push(webtasks.iter().map(|wt| wt.token.clone()).collect());
        let index = self.picks.lock().unwrap().pop_front().flatten()?;
        webtasks.get(index).cloned()
    }

    fn notify(&self, message: &str) {
        self.notifications.lock().unwrap().push(message.to_string());
    }

    fn open_url(&self, url: &str) {
        self.opened_urls.lock().unwrap().push(url.to_string());
    }
}

/// Remote double serving a fixed webtask set and recording every call.
#[derive(Default)]
pub struct ScriptedRemote {
    pub webtasks: Vec<WebtaskSummary>,
    pub details: HashMap<String, WebtaskDetail>,
    pub verified: Option<VerifiedSession>,
    pub fail_code_request: bool,
    pub calls: Mutex<Vec<String>>,
    pub updates: Mutex<Vec<(String, String, String)>>,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_webtask(mut self, webtask: WebtaskSummary, code: &str) -> Self {
        self.details.insert(
            webtask.token.clone(),
            detail(&webtask.token, &webtask.name, code),
        );
        self.webtasks.push(webtask);
        self
    }

    pub fn with_verified(mut self, session: VerifiedSession) -> Self {
        self.verified = Some(session);
        self
    }

    pub fn failing_code_request(mut self) -> Self {
        self.fail_code_request = true;
        self
    }

    pub fn called(&self, fragment: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|call| call.contains(fragment))
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Remote for ScriptedRemote {
    async fn list(
        &self,
        _profile: &Profile,
        priority: Option<&str>,
    ) -> Result<Vec<WebtaskSummary>, RemoteError> {
        self.record(format!("list priority={priority:?}"));
        Ok(prioritize(self.webtasks.clone(), priority))
    }

    async fn fetch_detail(
        &self,
        _profile: &Profile,
        token: &str,
    ) -> Result<WebtaskDetail, RemoteError> {
        self.record(format!("fetch_detail {token}"));
        self.details
            .get(token)
            .cloned()
            .ok_or(RemoteError::Rejected {
                op: "fetch webtask",
                status: 404,
            })
    }

    async fn create(
        &self,
        _profile: &Profile,
        name: &str,
        code: &str,
    ) -> Result<WebtaskDetail, RemoteError> {
        self.record(format!("create {name}"));
        Ok(detail(&format!("token-{name}"), name, code))
    }

    async fn update(
        &self,
        _profile: &Profile,
        container: &str,
        name: &str,
        code: &str,
    ) -> Result<(), RemoteError> {
        self.record(format!("update {container}/{name}"));
        self.updates.lock().unwrap().push((
            container.to_string(),
            name.to_string(),
            code.to_string(),
        ));
        Ok(())
    }

    async fn request_verification_code(&self, identity: &Identity) -> Result<(), RemoteError> {
        let (key, value) = identity.as_query_pair();
        self.record(format!("request_code {key}={value}"));
        if self.fail_code_request {
            return Err(RemoteError::Rejected {
                op: "request verification code",
                status: 500,
            });
        }
        Ok(())
    }

    async fn verify_code(
        &self,
        identity: &Identity,
        code: &str,
    ) -> Result<VerifiedSession, RemoteError> {
        let (key, value) = identity.as_query_pair();
        self.record(format!("verify_code {key}={value} code={code}"));
        self.verified
            .clone()
            .ok_or(RemoteError::VerificationFailed)
    }
}

/// In-memory workspace double.
#[derive(Default)]
pub struct MemoryWorkspace {
    pub texts: Mutex<HashMap<String, String>>,
    active: Mutex<Option<String>>,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-open a surface and make it active.
    pub fn with_surface(self, id: &str, text: &str) -> Self {
        self.texts
            .lock()
            .unwrap()
            .insert(id.to_string(), text.to_string());
        *self.active.lock().unwrap() = Some(id.to_string());
        self
    }

    pub fn surface_count(&self) -> usize {
        self.texts.lock().unwrap().len()
    }

    pub fn text_of(&self, id: &str) -> Option<String> {
        self.texts.lock().unwrap().get(id).cloned()
    }
}

impl Workspace for MemoryWorkspace {
    fn active_surface(&self) -> Option<SurfaceId> {
        self.active.lock().unwrap().clone()
    }

    fn read_text(&self, surface: &str) -> Result<String, WorkspaceError> {
        self.texts
            .lock()
            .unwrap()
            .get(surface)
            .cloned()
            .ok_or_else(|| WorkspaceError::UnknownSurface {
                id: surface.to_string(),
            })
    }

    fn open_surface(&self, name: &str, content: &str) -> Result<SurfaceId, WorkspaceError> {
        let id = name.to_string();
        self.texts
            .lock()
            .unwrap()
            .insert(id.clone(), content.to_string());
        *self.active.lock().unwrap() = Some(id.clone());
        Ok(id)
    }

    fn replace_text(&self, surface: &str, content: &str) -> Result<(), WorkspaceError> {
        let mut texts = self.texts.lock().unwrap();
        match texts.get_mut(surface) {
            Some(text) => {
                *text = content.to_string();
                Ok(())
            }
            None => Err(WorkspaceError::UnknownSurface {
                id: surface.to_string(),
            }),
        }
    }

    fn focus(&self, surface: &str) {
        *self.active.lock().unwrap() = Some(surface.to_string());
    }
}
