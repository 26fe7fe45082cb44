use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, BufReader};
use zonewall_lib::command::{self, CommandResponse};
use zonewall_lib::export::build_wall_glb;
use zonewall_lib::notify::TracingNotifier;
use zonewall_lib::remote::HttpRemote;
use zonewall_lib::state::ZoneSettings;
use zonewall_lib::ZoneSession;

type HostSession = ZoneSession<HttpRemote, TracingNotifier>;

/// Command-line options
#[derive(Debug, Default)]
struct Args {
    scene: Option<String>,
    settings: Option<String>,
    commands: Option<String>,
    export: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zonewall=info,zonewall_lib=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&argv);
    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let remote = match HttpRemote::new(&settings.remote) {
        Ok(remote) => remote,
        Err(e) => {
            tracing::error!("Failed to create HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut session = match ZoneSession::from_settings(&settings, remote, TracingNotifier) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Invalid settings: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        mode = ?session.mode(),
        upload = %settings.remote.upload_url,
        download = %settings.remote.download_url,
        "Zone host ready"
    );

    let result = match &args.commands {
        Some(path) => run_command_file(&mut session, path).await,
        None => run_stdin(&mut session).await,
    };
    if let Err(e) = result {
        tracing::error!("{e}");
        return ExitCode::FAILURE;
    }

    if let Some(path) = &args.export {
        match session.walls() {
            Some(mesh) => {
                if let Err(e) = std::fs::write(path, build_wall_glb(mesh, "zone_walls")) {
                    tracing::error!("Failed to write {path}: {e}");
                    return ExitCode::FAILURE;
                }
                tracing::info!("Exported walls to {path}");
            }
            None => tracing::warn!("No walls built, skipping export to {path}"),
        }
    }

    ExitCode::SUCCESS
}

/// Flags take the next argument as value; a flag without one is left unset
fn parse_args(argv: &[String]) -> Args {
    let mut args = Args::default();
    let mut rest = argv.iter();
    while let Some(arg) = rest.next() {
        let slot = match arg.as_str() {
            "--scene" => &mut args.scene,
            "--settings" => &mut args.settings,
            "--commands" => &mut args.commands,
            "--export" => &mut args.export,
            other => {
                tracing::warn!("Ignoring unknown argument {other}");
                continue;
            }
        };
        match rest.next() {
            Some(value) => *slot = Some(value.clone()),
            None => tracing::warn!("Missing value for {arg}, ignoring it"),
        }
    }
    args
}

/// Settings file (explicit or config dir), then env, then `--scene`
fn load_settings(args: &Args) -> Result<ZoneSettings, String> {
    let mut settings = match &args.settings {
        Some(path) => ZoneSettings::load_from(std::path::Path::new(path))?,
        None => ZoneSettings::load(),
    };
    settings.apply_env();
    if let Some(scene) = &args.scene {
        settings.scene = scene.clone();
    }
    Ok(settings)
}

/// A JSON array runs as one batch, anything else as one command per line
async fn run_command_file(session: &mut HostSession, path: &str) -> Result<(), String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("Failed to read {path}: {e}"))?;
    if text.trim_start().starts_with('[') {
        for response in command::execute_json_batch(session, &text).await? {
            print_response(&response);
        }
    } else {
        for line in text.lines() {
            run_line(session, line).await;
        }
    }
    Ok(())
}

async fn run_stdin(session: &mut HostSession) -> Result<(), String> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| format!("Failed to read stdin: {e}"))?
    {
        run_line(session, &line).await;
    }
    Ok(())
}

async fn run_line(session: &mut HostSession, line: &str) {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return;
    }
    let response = match command::execute_json(session, line).await {
        Ok(response) => response,
        Err(e) => CommandResponse {
            success: false,
            error: Some(e),
            data: None,
        },
    };
    print_response(&response);
}

fn print_response(response: &CommandResponse) {
    match serde_json::to_string(response) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to encode response: {e}"),
    }
}
