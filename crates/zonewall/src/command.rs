//! JSON command protocol for driving a zone session.
//!
//! One command per JSON object, tagged by `"command"`:
//! `{"command": "place", "x": 1.0, "z": 2.0}`.

use serde::{Deserialize, Serialize};
use shared::Point3;

use crate::export::build_wall_glb;
use crate::notify::Notifier;
use crate::remote::RemoteSync;
use crate::session::ZoneSession;
use crate::validation::MeshValidator;

/// A command a host or script can send to a session.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SessionCommand {
    /// Placement event at a tracked position
    Place {
        x: f64,
        #[serde(default)]
        y: f64,
        z: f64,
    },
    /// Publish again after a failed upload
    RetryPublish,
    /// Fetch the published zone (remote mode)
    Download,
    /// Compute hull and walls from the stored points
    BuildWalls,
    /// Drop points and geometry
    Reset,
    /// Report state, points, hull and wall summary
    Inspect,
    /// Return the wall mesh as JSON, optionally also writing a GLB file
    ExportMesh {
        #[serde(default)]
        glb_path: Option<String>,
    },
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

/// Execute a single command on the session.
pub async fn execute_command<R: RemoteSync, N: Notifier>(
    session: &mut ZoneSession<R, N>,
    cmd: SessionCommand,
) -> CommandResponse {
    match cmd {
        SessionCommand::Place { x, y, z } => match session.place(Point3::new(x, y, z)).await {
            Ok(accepted) => CommandResponse::ok_with_data(serde_json::json!({
                "accepted": accepted,
                "count": session.points().len(),
                "state": session.state(),
            })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        SessionCommand::RetryPublish => match session.retry_publish().await {
            Ok(()) => CommandResponse::ok_with_data(serde_json::json!({ "state": session.state() })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        SessionCommand::Download => match session.download().await {
            Ok(()) => CommandResponse::ok_with_data(serde_json::json!({
                "state": session.state(),
                "points": session.points(),
            })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        SessionCommand::BuildWalls => match session.build_walls() {
            Ok(mesh) => CommandResponse::ok_with_data(serde_json::json!({
                "vertices": mesh.vertex_count(),
                "triangles": mesh.triangle_count(),
            })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        SessionCommand::Reset => {
            session.reset();
            CommandResponse::ok()
        }

        SessionCommand::Inspect => {
            let validation = match (session.hull(), session.walls()) {
                (Some(hull), Some(mesh)) => MeshValidator::new(mesh).validate_against(hull),
                _ => Vec::new(),
            };
            CommandResponse::ok_with_data(serde_json::json!({
                "session": session.id().to_string(),
                "mode": session.mode(),
                "state": session.state(),
                "points": session.points(),
                "shadows": session.shadows(),
                "hull": session.hull(),
                "has_walls": session.walls().is_some(),
                "wall_height": session.wall_height(),
                "validation_errors": validation,
            }))
        }

        SessionCommand::ExportMesh { glb_path } => {
            let Some(mesh) = session.walls() else {
                return CommandResponse::err("no walls built yet");
            };
            let mut data = serde_json::json!({ "mesh": mesh });
            if let Some(path) = glb_path {
                let glb = build_wall_glb(mesh, "zone_walls");
                if let Err(e) = std::fs::write(&path, &glb) {
                    return CommandResponse::err(format!("Failed to write {path}: {e}"));
                }
                data["glb_path"] = serde_json::json!(path);
                data["glb_bytes"] = serde_json::json!(glb.len());
            }
            CommandResponse::ok_with_data(data)
        }
    }
}

/// Parse and execute a single JSON command string.
pub async fn execute_json<R: RemoteSync, N: Notifier>(
    session: &mut ZoneSession<R, N>,
    json: &str,
) -> Result<CommandResponse, String> {
    let cmd: SessionCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(session, cmd).await)
}

/// Parse and execute multiple JSON commands (array), in order.
pub async fn execute_json_batch<R: RemoteSync, N: Notifier>(
    session: &mut ZoneSession<R, N>,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<SessionCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    let mut responses = Vec::with_capacity(cmds.len());
    for cmd in cmds {
        responses.push(execute_command(session, cmd).await);
    }
    Ok(responses)
}
