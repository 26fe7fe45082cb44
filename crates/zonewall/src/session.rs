//! One zone session: markers in, walls out.
//!
//! `ZoneSession` glues the point store, the sync state machine, a remote
//! store and a notifier together. Publish and download are the only await
//! points; `&mut self` keeps at most one of them in flight, and hosts that
//! share a session across tasks wrap it in a [`SharedSession`].

use std::sync::Arc;

use shared::{Point3, SessionMode};
use tracing::Instrument;
use uuid::Uuid;

use crate::build::{self, Hull, WallMesh};
use crate::error::ZoneError;
use crate::notify::Notifier;
use crate::remote::RemoteSync;
use crate::state::{PointStore, SyncAction, SyncCoordinator, SyncState, ZoneSettings};

/// Session handle shared between tasks; locking makes placement atomic
pub type SharedSession<R, N> = Arc<tokio::sync::Mutex<ZoneSession<R, N>>>;

pub struct ZoneSession<R, N> {
    id: Uuid,
    span: tracing::Span,
    store: PointStore,
    sync: SyncCoordinator,
    remote: R,
    notifier: N,
    wall_height: f64,
    hull: Option<Hull>,
    walls: Option<WallMesh>,
}

impl<R: RemoteSync, N: Notifier> ZoneSession<R, N> {
    pub fn new(mode: SessionMode, remote: R, notifier: N) -> Self {
        let id = Uuid::new_v4();
        let span = tracing::info_span!("zone_session", %id, ?mode);
        span.in_scope(|| tracing::info!("Session started"));
        Self {
            id,
            span,
            store: PointStore::new(),
            sync: SyncCoordinator::new(mode),
            remote,
            notifier,
            wall_height: shared::DEFAULT_WALL_HEIGHT,
            hull: None,
            walls: None,
        }
    }

    /// Mode, wall height and download offset taken from settings.
    ///
    /// Non-finite geometry settings are rejected.
    pub fn from_settings(
        settings: &ZoneSettings,
        remote: R,
        notifier: N,
    ) -> Result<Self, ZoneError> {
        settings.validate().map_err(ZoneError::invalid_argument)?;
        let mut session = Self::new(settings.mode(), remote, notifier);
        session.sync = session
            .sync
            .with_download_offset(settings.walls.download_y_offset);
        session.wall_height = settings.walls.wall_height;
        Ok(session)
    }

    pub fn with_wall_height(mut self, wall_height: f64) -> Self {
        self.wall_height = wall_height;
        self
    }

    pub fn into_shared(self) -> SharedSession<R, N> {
        Arc::new(tokio::sync::Mutex::new(self))
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> SessionMode {
        self.sync.mode()
    }

    pub fn state(&self) -> SyncState {
        self.sync.state()
    }

    pub fn points(&self) -> &[Point3] {
        self.store.as_slice()
    }

    /// y of the wall bottom rim.
    ///
    /// Downloaded zones are shifted by the download offset, so remote
    /// sessions shift the configured height by the same amount and the rim
    /// stays below the markers.
    pub fn wall_height(&self) -> f64 {
        if self.mode().is_remote() {
            self.wall_height + self.sync.download_offset()
        } else {
            self.wall_height
        }
    }

    pub fn hull(&self) -> Option<&Hull> {
        self.hull.as_ref()
    }

    pub fn walls(&self) -> Option<&WallMesh> {
        self.walls.as_ref()
    }

    /// Shadow positions for the placed markers
    pub fn shadows(&self) -> Vec<Point3> {
        self.store.iter().copied().map(build::shadow_position).collect()
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    // ── Events ─────────────────────────────────────────────────

    /// Handle a placement event.
    ///
    /// Returns whether the point was stored. The placement that fills the
    /// store publishes the zone (and builds the walls in feedback mode);
    /// a failed publish is returned as an error, the four points stay
    /// stored and [`ZoneSession::retry_publish`] can try again.
    pub async fn place(&mut self, point: Point3) -> Result<bool, ZoneError> {
        let span = self.span.clone();
        async move {
            let outcome = self.sync.on_point_placed(&mut self.store, point);
            self.drive(outcome.action).await?;
            Ok(outcome.accepted)
        }
        .instrument(span)
        .await
    }

    /// Publish again after a failed upload
    pub async fn retry_publish(&mut self) -> Result<(), ZoneError> {
        let span = self.span.clone();
        async move {
            let action = self.sync.retry_publish(&self.store)?;
            self.drive(action).await
        }
        .instrument(span)
        .await
    }

    /// Fetch the published zone and build its walls (remote mode)
    pub async fn download(&mut self) -> Result<(), ZoneError> {
        let span = self.span.clone();
        async move {
            let action = self.sync.begin_download()?;
            self.drive(action).await
        }
        .instrument(span)
        .await
    }

    /// Compute hull and wall mesh from the stored points.
    ///
    /// Only valid once the zone is published or downloaded. A degenerate
    /// hull leaves the state unchanged.
    pub fn build_walls(&mut self) -> Result<&WallMesh, ZoneError> {
        let _guard = self.span.enter();
        if !self.sync.can_build_walls() {
            return Err(ZoneError::InvalidTransition {
                state: self.sync.state(),
                event: "build walls",
            });
        }

        let (hull, mesh) = match build::build_walls(self.store.as_slice(), self.wall_height()) {
            Ok(built) => built,
            Err(e) => {
                tracing::warn!("Wall build failed: {e}");
                self.notifier.error(&format!("Cannot build walls: {e}"));
                return Err(e);
            }
        };
        self.sync.walls_built()?;
        tracing::info!(vertices = mesh.vertex_count(), "Walls built");
        self.hull = Some(hull);
        Ok(self.walls.insert(mesh))
    }

    /// Drop all points and geometry, back to the mode's initial state
    pub fn reset(&mut self) {
        let _guard = self.span.enter();
        self.sync.reset(&mut self.store);
        self.hull = None;
        self.walls = None;
    }

    // ── Action loop ────────────────────────────────────────────

    async fn drive(&mut self, mut action: SyncAction) -> Result<(), ZoneError> {
        loop {
            action = match action {
                SyncAction::None => return Ok(()),
                SyncAction::Publish(points) => match self.remote.publish(points).await {
                    Ok(()) => {
                        self.notifier.info("Zone uploaded");
                        self.sync.publish_succeeded()?
                    }
                    Err(e) => {
                        tracing::warn!("Publish failed: {e}");
                        self.notifier.error(&format!("Upload failed: {e}"));
                        self.sync.publish_failed()?;
                        return Err(e);
                    }
                },
                SyncAction::Download => {
                    let result = self.remote.download().await;
                    match result.and_then(|points| {
                        self.sync.download_succeeded(&mut self.store, &points)
                    }) {
                        Ok(next) => {
                            self.notifier.info("Zone downloaded");
                            next
                        }
                        Err(e) => {
                            tracing::warn!("Download failed: {e}");
                            self.notifier.error(&format!("Download failed: {e}"));
                            if self.sync.state() == SyncState::DownloadPending {
                                self.sync.download_failed()?;
                            }
                            return Err(e);
                        }
                    }
                }
                SyncAction::BuildWalls => {
                    self.build_walls()?;
                    return Ok(());
                }
            };
        }
    }
}
