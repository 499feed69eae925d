//! The top-level operations: init, open, create, update, run.
//!
//! Each command is a short composition over the injected ports. The binder
//! is mutated only after the remote operation it reflects has succeeded —
//! never speculatively. Commands are not serialized against each other;
//! concurrent invocations race exactly as described by the store's
//! last-writer-wins save and the snapshot-at-read update text.

use std::sync::Arc;

use crate::binder::ResourceBinder;
use crate::error::{Error, Flow, FlowResult, Result};
use crate::profile::ProfileStore;
use crate::remote::Remote;
use crate::session::SessionFlow;
use crate::ui::Ui;
use crate::workspace::Workspace;

/// Template body for newly created webtasks.
pub const NEW_WEBTASK_CODE: &str = "\
module.exports = function (context, callback) {
    callback(null, 'Hello world');
};
";

/// Wires the ports together and exposes the user-facing operations.
pub struct CommandOrchestrator {
    ui: Arc<dyn Ui>,
    remote: Arc<dyn Remote>,
    workspace: Arc<dyn Workspace>,
    store: ProfileStore,
    binder: Arc<ResourceBinder>,
}

impl CommandOrchestrator {
    pub fn new(
        ui: Arc<dyn Ui>,
        remote: Arc<dyn Remote>,
        workspace: Arc<dyn Workspace>,
        store: ProfileStore,
        binder: Arc<ResourceBinder>,
    ) -> Self {
        Self {
            ui,
            remote,
            workspace,
            store,
            binder,
        }
    }

    /// Establish (or overwrite) the default profile via the verification
    /// handshake.
    pub async fn init(&self) -> FlowResult<()> {
        let flow = SessionFlow::new(self.ui.as_ref(), self.remote.as_ref(), &self.store)
            .run()
            .await?;
        Ok(flow.map(|_| ()))
    }

    /// Pick a remote webtask and open its code in a surface.
    pub async fn open(&self) -> FlowResult<()> {
        let profile = self.store.load()?;

        let webtasks = self.remote.list(&profile, None).await?;
        let Some(picked) = self.ui.pick(&webtasks).await else {
            return Ok(Flow::Cancelled);
        };

        let detail = self.remote.fetch_detail(&profile, &picked.token).await?;

        // Reuse a surface already showing this webtask instead of opening
        // a duplicate.
        let surface = match self.binder.surface_for_token(&picked.token) {
            Some(existing) => {
                self.workspace.replace_text(&existing, &detail.code)?;
                self.workspace.focus(&existing);
                existing
            }
            None => self.workspace.open_surface(&picked.name, &detail.code)?,
        };

        self.binder.bind(&surface, picked);
        Ok(Flow::Done(()))
    }

    /// Create a named webtask from the template and open it.
    pub async fn create(&self) -> FlowResult<()> {
        let profile = self.store.load()?;

        let Some(name) = self.ui.prompt("Enter the name of the new webtask").await else {
            return Ok(Flow::Cancelled);
        };

        let detail = self
            .remote
            .create(&profile, &name, NEW_WEBTASK_CODE)
            .await?;

        // A surface-open failure after a successful create is not rolled
        // back; the remote webtask exists either way.
        let surface = self.workspace.open_surface(&name, NEW_WEBTASK_CODE)?;
        self.binder.bind(&surface, detail.summary());

        self.ui
            .notify(&format!("Webtask {name} successfully created"));
        Ok(Flow::Done(()))
    }

    /// Push the active surface's text to a picked webtask.
    ///
    /// The webtask bound to the surface (if any) is listed first, but the
    /// user may pick a different one — the surface is rebound to whichever
    /// webtask was ultimately updated.
    pub async fn update(&self) -> FlowResult<()> {
        let surface = self.workspace.active_surface().ok_or(Error::NoActiveSurface)?;
        let bound = self.binder.resolve(&surface);

        let profile = self.store.load()?;

        let priority = bound.as_ref().map(|wt| wt.token.as_str());
        let webtasks = self.remote.list(&profile, priority).await?;
        let Some(picked) = self.ui.pick(&webtasks).await else {
            return Ok(Flow::Cancelled);
        };

        let code = self.workspace.read_text(&surface)?;
        self.remote
            .update(&profile, &picked.container, &picked.name, &code)
            .await?;

        let name = picked.name.clone();
        self.binder.bind(&surface, picked);

        self.ui
            .notify(&format!("Webtask {name} successfully updated"));
        Ok(Flow::Done(()))
    }

    /// Launch the active surface's webtask URL in the platform browser.
    pub async fn run(&self) -> Result<()> {
        let surface = self.workspace.active_surface().ok_or(Error::NoActiveSurface)?;
        let bound = self.binder.resolve(&surface).ok_or(Error::NoActiveResource)?;

        let url = match bound.webtask_url {
            Some(url) => url,
            // Older bindings may predate the URL field; the remote record
            // is authoritative, so fetch it.
            None => {
                let profile = self.store.load()?;
                self.remote
                    .fetch_detail(&profile, &bound.token)
                    .await?
                    .webtask_url
            }
        };

        self.ui.open_url(&url);
        Ok(())
    }
}
