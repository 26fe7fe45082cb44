//! Integration tests for SessionHarness.
//!
//! Drives whole placement and download flows through the public API.

use approx::assert_relative_eq;
use shared::{Point3, SessionMode};
use zonewall_lib::fixtures;
use zonewall_lib::harness::SessionHarness;
use zonewall_lib::state::SyncState;
use zonewall_lib::ZoneError;

#[tokio::test]
async fn test_unit_square_walls() {
    let mut h = SessionHarness::new(SessionMode::Feedback);
    h.place_all(&fixtures::unit_square()).await.unwrap();

    assert_eq!(h.state(), SyncState::WallBuilt);
    let hull = h.session.hull().unwrap();
    assert_eq!(hull.points(), &fixtures::unit_square());

    let walls = h.walls().unwrap();
    for i in [2, 3, 4, 5] {
        assert_relative_eq!(walls.vertices[i].y, -0.12);
    }
    let errors = h.wall_errors();
    assert!(errors.is_empty(), "Validation errors: {errors:?}");
}

#[tokio::test]
async fn test_zigzag_input_reordered() {
    let mut h = SessionHarness::new(SessionMode::Feedback);
    let rect = fixtures::zigzag_rect(Point3::new(1.0, 0.0, 1.0), 2.0, 3.0);
    h.place_all(&rect).await.unwrap();

    let hull = h.session.hull().unwrap();
    assert!(hull.signed_area2() > 0.0);
    for p in &rect {
        assert_eq!(hull.points().iter().filter(|q| *q == p).count(), 1);
    }
    let v = h.validate_walls().unwrap();
    assert!(v.dimensions_approx([2.0, 0.12, 3.0], 1e-9));
}

#[tokio::test]
async fn test_fifth_placement_ignored() {
    let mut h = SessionHarness::new(SessionMode::Placement);
    assert_eq!(h.place_all(&fixtures::unit_square()).await.unwrap(), 4);
    assert!(!h.place_xz(5.0, 5.0).await.unwrap());
    assert_eq!(h.point_count(), 4);
    assert_eq!(
        h.published_payload().as_deref(),
        Some("0 0 0\n1 0 0\n1 0 1\n0 0 1\n")
    );
}

#[tokio::test]
async fn test_published_zone_round_trips_to_remote_session() {
    let mut local = SessionHarness::new(SessionMode::Placement);
    local.place_all(&fixtures::sloped_quad()).await.unwrap();
    let payload = local.published_payload().unwrap();

    let mut remote = SessionHarness::with_published(&payload);
    remote.download().await.unwrap();
    assert_eq!(remote.state(), SyncState::WallBuilt);

    for (got, placed) in remote.session.points().iter().zip(fixtures::sloped_quad()) {
        assert!(got.approx_eq(&placed.offset_y(-1.5), 1e-5), "{got:?} vs {placed:?}");
    }
    assert!(remote.wall_errors().is_empty(), "{:?}", remote.wall_errors());
}

#[tokio::test]
async fn test_raised_payload_offset() {
    let mut h = SessionHarness::with_published(fixtures::RAISED_SQUARE_PAYLOAD);
    h.download().await.unwrap();
    for p in h.session.points() {
        assert_relative_eq!(p.y, -0.5);
    }

    // Bottom rim moves down with the zone and the walls still face inward
    let walls = h.walls().unwrap();
    for i in [2, 3, 4, 5] {
        assert_relative_eq!(walls.vertices[i].y, -1.62, epsilon = 1e-12);
    }
    assert!(h.wall_errors().is_empty(), "{:?}", h.wall_errors());
}

#[tokio::test]
async fn test_long_payload_uses_first_four() {
    let mut h = SessionHarness::with_published(fixtures::LONG_PAYLOAD);
    h.download().await.unwrap();
    assert_eq!(h.point_count(), 4);
    assert!(h.session.points().iter().all(|p| p.x <= 2.0));
}

#[tokio::test]
async fn test_bad_payloads_keep_waiting() {
    for payload in [fixtures::SHORT_PAYLOAD, fixtures::MALFORMED_PAYLOAD] {
        let mut h = SessionHarness::with_published(payload);
        let err = h.download().await.unwrap_err();
        assert!(matches!(err, ZoneError::Parse(_)), "{payload:?}: {err}");
        assert_eq!(h.state(), SyncState::AwaitingRemoteDownload);
        assert_eq!(h.point_count(), 0);
        assert_eq!(h.error_notices().len(), 1);
    }
}

#[tokio::test]
async fn test_interior_point_zone_rejected() {
    let mut h = SessionHarness::new(SessionMode::Feedback);
    let err = h.place_all(&fixtures::interior_point()).await.unwrap_err();
    assert!(matches!(err, ZoneError::DegenerateHull { vertices: 3 }));
    assert_eq!(h.state(), SyncState::Published);
    assert!(h.walls().is_none());
}

#[tokio::test]
async fn test_retry_after_failed_publish() {
    let mut h = SessionHarness::new(SessionMode::Feedback);
    h.fail_publish(true);
    assert!(h.place_all(&fixtures::unit_square()).await.is_err());
    assert_eq!(h.state(), SyncState::CollectingLocal);

    h.fail_publish(false);
    h.session.retry_publish().await.unwrap();
    assert_eq!(h.state(), SyncState::WallBuilt);
    assert_eq!(h.remote.publish_count(), 2);
}

#[tokio::test]
async fn test_reset_starts_over() {
    let mut h = SessionHarness::new(SessionMode::Feedback);
    h.place_all(&fixtures::unit_square()).await.unwrap();
    h.session.reset();

    assert_eq!(h.state(), SyncState::CollectingLocal);
    h.place_all(&fixtures::sloped_quad()).await.unwrap();
    assert_eq!(h.state(), SyncState::WallBuilt);
    assert_eq!(h.remote.publish_count(), 2);
}
