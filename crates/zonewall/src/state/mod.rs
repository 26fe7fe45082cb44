pub mod points;
pub mod settings;
pub mod sync;

pub use points::PointStore;
pub use settings::{RemoteSettings, WallSettings, ZoneSettings};
pub use sync::{PlacementOutcome, SyncAction, SyncCoordinator, SyncState};
