//! Transfer of zone points to and from the remote zone store.
//!
//! The wire format is the plain-text payload from [`shared::payload`]: one
//! `"x y z"` line per point.

mod http;
mod memory;

pub use http::HttpRemote;
pub use memory::MemoryRemote;

use std::future::Future;

use shared::{Point3, ZONE_POINT_COUNT};

use crate::error::ZoneError;

/// Remote zone store.
///
/// Implementations own their timeouts; the session awaits at most one call
/// at a time.
pub trait RemoteSync: Send + Sync {
    /// Publish the four collected points
    fn publish(
        &self,
        points: [Point3; ZONE_POINT_COUNT],
    ) -> impl Future<Output = Result<(), ZoneError>> + Send;

    /// Fetch the published points, unshifted
    fn download(&self) -> impl Future<Output = Result<Vec<Point3>, ZoneError>> + Send;
}
