//! Integration tests for the SessionCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use shared::SessionMode;
use zonewall_lib::command::{execute_json, execute_json_batch};
use zonewall_lib::fixtures;
use zonewall_lib::harness::SessionHarness;

#[tokio::test]
async fn test_command_place_until_published() {
    let mut h = SessionHarness::new(SessionMode::Placement);
    let batch = r#"[
        {"command": "place", "x": 0.0, "z": 0.0},
        {"command": "place", "x": 1.0, "z": 0.0},
        {"command": "place", "x": 1.0, "z": 1.0},
        {"command": "place", "x": 0.0, "z": 1.0},
        {"command": "place", "x": 9.0, "z": 9.0}
    ]"#;
    let responses = execute_json_batch(&mut h.session, batch).await.unwrap();
    assert_eq!(responses.len(), 5);

    let last = responses[3].data.as_ref().unwrap();
    assert_eq!(last["state"], "published");
    let rejected = responses[4].data.as_ref().unwrap();
    assert_eq!(rejected["accepted"], false);
    assert_eq!(rejected["count"], 4);
}

#[tokio::test]
async fn test_command_inspect_reports_hull() {
    let mut h = SessionHarness::new(SessionMode::Feedback);
    h.place_all(&fixtures::unit_square()).await.unwrap();

    let resp = h.execute_json(r#"{"command": "inspect"}"#).await.unwrap();
    let data = resp.data.unwrap();
    assert_eq!(data["mode"], "feedback");
    assert_eq!(data["points"].as_array().unwrap().len(), 4);
    assert_eq!(data["shadows"][0]["y"], -0.12);
    assert_eq!(data["hull"]["points"][1]["x"], 1.0);
}

#[tokio::test]
async fn test_command_retry_publish() {
    let mut h = SessionHarness::new(SessionMode::Feedback);
    h.fail_publish(true);
    for (x, z) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)] {
        h.place_xz(x, z).await.unwrap();
    }
    let resp = h
        .execute_json(r#"{"command": "place", "x": 0.0, "z": 1.0}"#)
        .await
        .unwrap();
    assert!(!resp.success);
    assert!(resp.error.unwrap().contains("network error"));

    h.fail_publish(false);
    let resp = h.execute_json(r#"{"command": "retry_publish"}"#).await.unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["state"], "wall_built");
}

#[tokio::test]
async fn test_command_download_twice_fails() {
    let mut h = SessionHarness::with_published(fixtures::RAISED_SQUARE_PAYLOAD);
    let resp = execute_json(&mut h.session, r#"{"command": "download"}"#)
        .await
        .unwrap();
    assert!(resp.success);

    let resp = execute_json(&mut h.session, r#"{"command": "download"}"#)
        .await
        .unwrap();
    assert!(!resp.success);
    assert_eq!(h.remote.download_count(), 1);
}

#[tokio::test]
async fn test_command_export_glb_file() {
    let mut h = SessionHarness::new(SessionMode::Feedback);
    h.place_all(&fixtures::unit_square()).await.unwrap();

    let path = std::env::temp_dir().join(format!("zonewall-{}.glb", uuid::Uuid::new_v4()));
    let json = serde_json::json!({
        "command": "export_mesh",
        "glb_path": path.to_string_lossy(),
    })
    .to_string();
    let resp = h.execute_json(&json).await.unwrap();
    assert!(resp.success, "{:?}", resp.error);

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], b"glTF");
    assert_eq!(resp.data.unwrap()["glb_bytes"], bytes.len());
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_invalid_batch() {
    let mut h = SessionHarness::new(SessionMode::Placement);
    assert!(execute_json_batch(&mut h.session, r#"{"command": "inspect"}"#)
        .await
        .is_err());
}
