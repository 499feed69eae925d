//! webtasker — editor-integration core for the webtask.io hosting service.
//!
//! The crate keeps one authenticated profile, a live mapping between open
//! editing surfaces and the remote webtasks they show, and five operations
//! (init, open, create, update, run) composed over injected collaborator
//! ports:
//!
//! - [`ui::Ui`] — prompts, pick lists, notifications, browser launch
//! - [`workspace::Workspace`] — open surfaces and their text
//! - [`remote::Remote`] — the hosting service's HTTP API
//!
//! The binary wires these to a console, a local directory, and reqwest;
//! tests wire them to scripted fakes. The remote service is always
//! authoritative: nothing is cached across commands beyond the surface
//! bindings themselves.

pub mod binder;
pub mod commands;
pub mod error;
pub mod identity;
pub mod profile;
pub mod remote;
pub mod session;
pub mod ui;
pub mod workspace;

pub use binder::ResourceBinder;
pub use commands::{CommandOrchestrator, NEW_WEBTASK_CODE};
pub use error::{Error, Flow, FlowResult, Result};
pub use identity::{classify, Identity};
pub use profile::{Profile, ProfileStore};
pub use remote::{HttpRemote, Remote, VerifiedSession, VerifierConfig, WebtaskDetail, WebtaskSummary};
pub use session::SessionFlow;
pub use ui::Ui;
pub use workspace::{LocalWorkspace, Workspace};
