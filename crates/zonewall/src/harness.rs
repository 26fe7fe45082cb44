//! Headless harness for driving a zone session in tests.
//!
//! Wraps a `ZoneSession` backed by the in-memory zone store and a recording
//! notifier, with shortcuts for the usual placement and download flows.

use shared::{Point3, SessionMode};

use crate::build::WallMesh;
use crate::command::{self, CommandResponse};
use crate::error::ZoneError;
use crate::notify::RecordingNotifier;
use crate::remote::MemoryRemote;
use crate::session::ZoneSession;
use crate::state::SyncState;
use crate::validation::MeshValidator;

/// Headless harness: session, in-memory store and notice log
pub struct SessionHarness {
    pub session: ZoneSession<MemoryRemote, RecordingNotifier>,
    pub remote: MemoryRemote,
    pub notifier: RecordingNotifier,
}

impl SessionHarness {
    /// Fresh session with an empty store
    pub fn new(mode: SessionMode) -> Self {
        let remote = MemoryRemote::new();
        let notifier = RecordingNotifier::new();
        Self {
            session: ZoneSession::new(mode, remote.clone(), notifier.clone()),
            remote,
            notifier,
        }
    }

    /// Remote-feedback session whose store already holds `payload`
    pub fn with_published(payload: &str) -> Self {
        let harness = Self::new(SessionMode::RemoteFeedback);
        harness.remote.set_payload(payload);
        harness
    }

    // ── Placement ─────────────────────────────────────────────

    /// Place a marker on the ground plane
    pub async fn place_xz(&mut self, x: f64, z: f64) -> Result<bool, ZoneError> {
        self.session.place(Point3::new(x, 0.0, z)).await
    }

    /// Place every point in order; stops at the first error
    pub async fn place_all(&mut self, points: &[Point3]) -> Result<usize, ZoneError> {
        let mut accepted = 0;
        for point in points {
            if self.session.place(*point).await? {
                accepted += 1;
            }
        }
        Ok(accepted)
    }

    // ── Remote ────────────────────────────────────────────────

    pub async fn download(&mut self) -> Result<(), ZoneError> {
        self.session.download().await
    }

    pub fn fail_publish(&self, fail: bool) {
        self.remote.set_fail_publish(fail);
    }

    pub fn fail_download(&self, fail: bool) {
        self.remote.set_fail_download(fail);
    }

    /// Payload currently held by the in-memory store
    pub fn published_payload(&self) -> Option<String> {
        self.remote.payload()
    }

    // ── Commands ──────────────────────────────────────────────

    pub async fn execute_json(&mut self, json: &str) -> Result<CommandResponse, String> {
        command::execute_json(&mut self.session, json).await
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn state(&self) -> SyncState {
        self.session.state()
    }

    pub fn point_count(&self) -> usize {
        self.session.points().len()
    }

    pub fn walls(&self) -> Option<&WallMesh> {
        self.session.walls()
    }

    /// Validator for the built walls
    pub fn validate_walls(&self) -> Option<MeshValidator<'_>> {
        self.session.walls().map(MeshValidator::new)
    }

    /// Validation errors including the winding check, empty when valid
    pub fn wall_errors(&self) -> Vec<String> {
        match (self.session.hull(), self.session.walls()) {
            (Some(hull), Some(mesh)) => MeshValidator::new(mesh).validate_against(hull),
            _ => vec!["no walls built".to_string()],
        }
    }

    /// Error notices shown so far
    pub fn error_notices(&self) -> Vec<String> {
        self.notifier.errors()
    }
}
