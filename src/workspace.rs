//! The editing-surface collaborator contract and a local-directory
//! implementation.
//!
//! The core never owns surface lifecycle; it reads and writes text through
//! this port and uses surface ids as binder keys. The shipped
//! implementation maps surfaces onto `.js` files under a working directory
//! and treats the most recently opened file as the active surface — the
//! CLI analogue of the focused editor tab.

use std::path::PathBuf;
use std::sync::Mutex;

use crate::binder::SurfaceId;
use crate::error::WorkspaceError;

/// Workspace port consumed by the integration core.
pub trait Workspace: Send + Sync {
    /// The surface the user is currently editing, if any.
    fn active_surface(&self) -> Option<SurfaceId>;

    /// Current text of a surface.
    fn read_text(&self, surface: &str) -> Result<String, WorkspaceError>;

    /// Open (or reuse) a surface named `name` and fill it with `content`.
    /// Returns the surface id and makes it active.
    fn open_surface(&self, name: &str, content: &str) -> Result<SurfaceId, WorkspaceError>;

    /// Replace the full text of an already-open surface.
    fn replace_text(&self, surface: &str, content: &str) -> Result<(), WorkspaceError>;

    /// Bring an already-open surface to the front, making it active.
    fn focus(&self, surface: &str);
}

/// File-backed workspace rooted at a local directory.
#[derive(Debug)]
pub struct LocalWorkspace {
    root: PathBuf,
    active: Mutex<Option<SurfaceId>>,
}

impl LocalWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            active: Mutex::new(None),
        }
    }

    fn surface_path(&self, surface: &str) -> PathBuf {
        self.root.join(surface)
    }

    fn surface_name(name: &str) -> String {
        if name.ends_with(".js") {
            name.to_string()
        } else {
            format!("{name}.js")
        }
    }
}

impl Workspace for LocalWorkspace {
    fn active_surface(&self) -> Option<SurfaceId> {
        self.active.lock().expect("workspace lock poisoned").clone()
    }

    fn read_text(&self, surface: &str) -> Result<String, WorkspaceError> {
        std::fs::read_to_string(self.surface_path(surface)).map_err(|source| {
            WorkspaceError::Read {
                id: surface.to_string(),
                source,
            }
        })
    }

    fn open_surface(&self, name: &str, content: &str) -> Result<SurfaceId, WorkspaceError> {
        let surface = Self::surface_name(name);
        let path = self.surface_path(&surface);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| WorkspaceError::Open {
                name: surface.clone(),
                source,
            })?;
        }
        std::fs::write(&path, content).map_err(|source| WorkspaceError::Open {
            name: surface.clone(),
            source,
        })?;

        self.focus(&surface);
        tracing::debug!(surface, path = %path.display(), "opened surface");
        Ok(surface)
    }

    fn replace_text(&self, surface: &str, content: &str) -> Result<(), WorkspaceError> {
        let path = self.surface_path(surface);
        if !path.is_file() {
            return Err(WorkspaceError::UnknownSurface {
                id: surface.to_string(),
            });
        }
        std::fs::write(&path, content).map_err(|source| WorkspaceError::Write {
            id: surface.to_string(),
            source,
        })
    }

    fn focus(&self, surface: &str) {
        let mut active = self.active.lock().expect("workspace lock poisoned");
        *active = Some(surface.to_string());
    }
}
