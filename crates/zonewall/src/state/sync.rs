//! Zone synchronization state machine.
//!
//! One `SyncState` per session replaces the old trio of
//! uploaded/downloaded/walls-made flags. States only move forward until an
//! explicit reset:
//!
//! ```text
//! local:  CollectingLocal ──full──▶ PublishPending ──ok──▶ Published ──▶ WallBuilt
//!               ▲                         │
//!               └────────── failed ───────┘
//!
//! remote: AwaitingRemoteDownload ──▶ DownloadPending ──ok──▶ RemoteDownloaded ──▶ WallBuilt
//!               ▲                         │
//!               └────────── failed ───────┘
//! ```

use std::fmt;

use serde::Serialize;
use shared::{ParseError, Point3, SessionMode, DOWNLOAD_Y_OFFSET, ZONE_POINT_COUNT};

use crate::error::ZoneError;
use crate::state::points::PointStore;

/// Where the session is in the collect/publish/download flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    CollectingLocal,
    PublishPending,
    Published,
    AwaitingRemoteDownload,
    DownloadPending,
    RemoteDownloaded,
    WallBuilt,
}

impl SyncState {
    /// Initial state for a session mode
    pub fn initial(mode: SessionMode) -> Self {
        if mode.is_remote() {
            SyncState::AwaitingRemoteDownload
        } else {
            SyncState::CollectingLocal
        }
    }

    /// A publish or download is in flight
    pub fn is_pending(&self) -> bool {
        matches!(self, SyncState::PublishPending | SyncState::DownloadPending)
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncState::CollectingLocal => "collecting local",
            SyncState::PublishPending => "publish pending",
            SyncState::Published => "published",
            SyncState::AwaitingRemoteDownload => "awaiting remote download",
            SyncState::DownloadPending => "download pending",
            SyncState::RemoteDownloaded => "remote downloaded",
            SyncState::WallBuilt => "wall built",
        };
        f.write_str(name)
    }
}

/// Follow-up the caller must perform after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum SyncAction {
    None,
    /// Hand these points to the remote store
    Publish([Point3; ZONE_POINT_COUNT]),
    /// Fetch the published zone
    Download,
    /// Compute hull + wall mesh from the point store
    BuildWalls,
}

/// Result of a placement event
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementOutcome {
    pub accepted: bool,
    pub action: SyncAction,
}

impl PlacementOutcome {
    fn rejected() -> Self {
        Self {
            accepted: false,
            action: SyncAction::None,
        }
    }
}

/// Drives [`SyncState`] transitions for one session
#[derive(Debug, Clone)]
pub struct SyncCoordinator {
    mode: SessionMode,
    state: SyncState,
    download_y_offset: f64,
}

impl SyncCoordinator {
    pub fn new(mode: SessionMode) -> Self {
        Self {
            mode,
            state: SyncState::initial(mode),
            download_y_offset: DOWNLOAD_Y_OFFSET,
        }
    }

    /// Override the vertical offset applied to downloaded points
    pub fn with_download_offset(mut self, dy: f64) -> Self {
        self.download_y_offset = dy;
        self
    }

    /// Vertical offset applied to downloaded points
    pub fn download_offset(&self) -> f64 {
        self.download_y_offset
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Placement events are only consumed while collecting
    pub fn accepts_points(&self) -> bool {
        self.state == SyncState::CollectingLocal
    }

    /// Hull + mesh may be computed from the current store
    pub fn can_build_walls(&self) -> bool {
        matches!(
            self.state,
            SyncState::Published | SyncState::RemoteDownloaded
        )
    }

    /// Store a placed point. Filling the store starts the publish.
    pub fn on_point_placed(&mut self, store: &mut PointStore, point: Point3) -> PlacementOutcome {
        if !self.accepts_points() {
            tracing::warn!(state = %self.state, "Ignoring placement");
            return PlacementOutcome::rejected();
        }
        if !store.try_add(point) {
            tracing::warn!("Point store full, placement ignored");
            return PlacementOutcome::rejected();
        }
        tracing::debug!(count = store.len(), x = point.x, y = point.y, z = point.z, "Point placed");

        let action = match store.to_array() {
            Some(points) => {
                self.transition(SyncState::PublishPending);
                SyncAction::Publish(points)
            }
            None => SyncAction::None,
        };
        PlacementOutcome {
            accepted: true,
            action,
        }
    }

    /// Re-issue a publish after a failure
    pub fn retry_publish(&mut self, store: &PointStore) -> Result<SyncAction, ZoneError> {
        let points = match (self.state, store.to_array()) {
            (SyncState::CollectingLocal, Some(points)) => points,
            _ => return Err(self.reject("retry publish")),
        };
        self.transition(SyncState::PublishPending);
        Ok(SyncAction::Publish(points))
    }

    pub fn publish_succeeded(&mut self) -> Result<SyncAction, ZoneError> {
        self.require(SyncState::PublishPending, "complete publish")?;
        self.transition(SyncState::Published);
        if self.mode.builds_walls() {
            Ok(SyncAction::BuildWalls)
        } else {
            Ok(SyncAction::None)
        }
    }

    pub fn publish_failed(&mut self) -> Result<(), ZoneError> {
        self.require(SyncState::PublishPending, "fail publish")?;
        self.transition(SyncState::CollectingLocal);
        Ok(())
    }

    pub fn begin_download(&mut self) -> Result<SyncAction, ZoneError> {
        self.require(SyncState::AwaitingRemoteDownload, "start download")?;
        self.transition(SyncState::DownloadPending);
        Ok(SyncAction::Download)
    }

    /// Load the first four downloaded points, shifted by the download offset.
    ///
    /// Fewer than four points counts as a failed download.
    pub fn download_succeeded(
        &mut self,
        store: &mut PointStore,
        points: &[Point3],
    ) -> Result<SyncAction, ZoneError> {
        self.require(SyncState::DownloadPending, "complete download")?;
        if points.len() < ZONE_POINT_COUNT {
            self.transition(SyncState::AwaitingRemoteDownload);
            return Err(ParseError::TooFewLines {
                expected: ZONE_POINT_COUNT,
                found: points.len(),
            }
            .into());
        }

        store.reset();
        for point in &points[..ZONE_POINT_COUNT] {
            store.try_add(point.offset_y(self.download_y_offset));
        }
        self.transition(SyncState::RemoteDownloaded);
        Ok(SyncAction::BuildWalls)
    }

    pub fn download_failed(&mut self) -> Result<(), ZoneError> {
        self.require(SyncState::DownloadPending, "fail download")?;
        self.transition(SyncState::AwaitingRemoteDownload);
        Ok(())
    }

    /// Hull and mesh are done; terminal until reset
    pub fn walls_built(&mut self) -> Result<(), ZoneError> {
        if !self.can_build_walls() {
            return Err(self.reject("finish walls"));
        }
        self.transition(SyncState::WallBuilt);
        Ok(())
    }

    /// Back to the mode's initial state with an empty store
    pub fn reset(&mut self, store: &mut PointStore) {
        store.reset();
        self.transition(SyncState::initial(self.mode));
    }

    fn require(&self, state: SyncState, event: &'static str) -> Result<(), ZoneError> {
        if self.state == state {
            Ok(())
        } else {
            Err(self.reject(event))
        }
    }

    fn reject(&self, event: &'static str) -> ZoneError {
        ZoneError::InvalidTransition {
            state: self.state,
            event,
        }
    }

    fn transition(&mut self, to: SyncState) {
        tracing::info!(from = %self.state, to = %to, "Sync state");
        self.state = to;
    }
}
