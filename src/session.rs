//! The multi-step, user-interruptible login handshake.
//!
//! Start → CheckExisting → (AskOverride →)? CollectIdentity → RequestCode
//! → CollectCode → Verify → Persist → Done, with cancellation reachable
//! from every user-prompted state. Cancellation is pre-flight only: once a
//! network call is in flight it runs to completion.
//!
//! A verification code is single-use server-side, so nothing about a
//! verified session is cached across a failed persist — the user repeats
//! verification. That limitation is surfaced, never hidden.

use crate::error::{Flow, FlowResult};
use crate::identity;
use crate::profile::{Profile, ProfileStore};
use crate::remote::Remote;
use crate::ui::Ui;

/// Orchestrates one login attempt over the injected ports.
pub struct SessionFlow<'a> {
    ui: &'a dyn Ui,
    remote: &'a dyn Remote,
    store: &'a ProfileStore,
}

impl<'a> SessionFlow<'a> {
    pub fn new(ui: &'a dyn Ui, remote: &'a dyn Remote, store: &'a ProfileStore) -> Self {
        Self { ui, remote, store }
    }

    /// Run the handshake to completion, cancellation, or failure.
    ///
    /// On success the persisted [`Profile`] is returned; it is always
    /// re-read from the store by later commands, never held in memory.
    pub async fn run(&self) -> FlowResult<Profile> {
        // CheckExisting: an existing profile is only ever overwritten with
        // the user's explicit consent.
        if self.store.try_load().is_some() {
            match self
                .ui
                .confirm("You already have a profile. Would you like to override it?")
                .await
            {
                Some(true) => {}
                // Declining is a deliberate no-op outcome, not an error.
                Some(false) | None => return Ok(Flow::Cancelled),
            }
        }

        // CollectIdentity
        let Some(raw) = self
            .ui
            .prompt("Please enter your e-mail or phone number, we will send you a verification code")
            .await
        else {
            return Ok(Flow::Cancelled);
        };

        let identity = match identity::classify(&raw) {
            Ok(identity) => identity,
            Err(err) => {
                // Surfaced here, then the flow ends without retry; the
                // command boundary stays silent.
                self.ui.notify(&err.to_string());
                return Ok(Flow::Cancelled);
            }
        };

        // RequestCode: no code prompt without a confirmed send.
        self.remote.request_verification_code(&identity).await?;
        tracing::info!(target = identity.display_value(), "verification code sent");

        // CollectCode
        let Some(code) = self
            .ui
            .prompt(&format!(
                "Please enter the verification code we sent to {}",
                identity.display_value()
            ))
            .await
        else {
            return Ok(Flow::Cancelled);
        };

        // Verify: terminal on failure, no automatic retry.
        let session = self.remote.verify_code(&identity, &code).await?;

        // Persist: the issued credentials become the new default profile.
        let profile = Profile {
            url: session.url,
            token: session.token,
            container: session.tenant,
        };
        self.store.save(&profile)?;

        self.ui.notify("Successfully logged in to webtask.io.");
        Ok(Flow::Done(profile))
    }
}
