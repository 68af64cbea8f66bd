//! Adorna - Headless AR Earring Try-On Service
//!
//! Main entry point for the CLI application.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use adorna::{
    config::Config,
    render,
    scene::{Finish, ModelTemplate},
    tracking::{
        receiver::FrameReceiver,
        subprocess::{check_tracker_available, TrackerSubprocess},
    },
    web::WebServer,
    AppState,
};

/// Adorna - AR earring try-on service
#[derive(Parser, Debug)]
#[command(name = "adorna", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Earring GLB model path (overrides config)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Initial finish (overrides config)
    #[arg(short, long)]
    finish: Option<String>,

    /// HTTP server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable HTTP server
    #[arg(long)]
    no_http: bool,

    /// Disable the tracker subprocess and receiver
    #[arg(long)]
    no_tracker: bool,

    /// List available finishes and exit
    #[arg(long)]
    list_finishes: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", adorna::NAME, adorna::VERSION);

    if args.list_finishes {
        list_finishes();
        return Ok(());
    }

    let state = setup_and_spawn_services(&args).await?;

    // Wait for Ctrl+C / SIGTERM
    shutdown_signal().await;
    info!("Shutdown signal received");
    state.shutdown();

    // Give tasks a moment to clean up
    tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;

    info!("Adorna stopped");
    Ok(())
}

/// Setup config, create AppState, and spawn all background services.
async fn setup_and_spawn_services(args: &Args) -> anyhow::Result<Arc<AppState>> {
    // Load configuration
    let mut config = if let Some(ref path) = args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    // Apply CLI overrides
    if let Some(ref model) = args.model {
        config.asset.model_path = model.display().to_string();
    }
    if let Some(ref finish) = args.finish {
        config.asset.default_finish = finish.clone();
    }
    if args.no_http {
        config.http.enabled = false;
    }
    if args.no_tracker {
        config.tracking.enabled = false;
        config.tracking.auto_launch = false;
    }
    if let Some(port) = args.port {
        config.http.port = port;
    }

    // Validate configuration
    config.validate()?;

    info!("Model: {}", config.asset.model_path);
    info!("Default finish: {}", config.asset.default_finish);
    info!("Tracking: {}", config.tracking.enabled);
    info!("HTTP server: {}", config.http.enabled);

    // Warn early when auto-launch cannot work
    if config.tracking.enabled && config.tracking.auto_launch && !check_tracker_available() {
        tracing::warn!(
            "mediapipe Python package not found; tracker auto-launch will likely fail"
        );
    }

    // Create shared application state
    let state = AppState::new(config.clone());

    // Load the earring model in the background; the scene no-ops until done
    let asset_state = Arc::clone(&state);
    let model_path = config.asset.model_path.clone();
    tokio::spawn(async move {
        if let Err(e) = load_assets(asset_state, model_path).await {
            error!("Asset load failed: {}", e);
        }
    });

    // Start snapshot broadcast loop
    let render_state = Arc::clone(&state);
    tokio::spawn(async move {
        if let Err(e) = render::run_render_loop(render_state).await {
            error!("Render loop error: {}", e);
        }
    });

    // Start HTTP server if enabled
    if config.http.enabled {
        let http_state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = run_http_server(http_state).await {
                error!("HTTP server error: {}", e);
            }
        });
    }

    // Start tracking if enabled
    if config.tracking.enabled {
        let tracking_state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = run_tracking(tracking_state).await {
                error!("Tracking error: {}", e);
            }
        });
    }

    Ok(state)
}

fn list_finishes() {
    println!("Available finishes:\n");
    for finish in Finish::ALL {
        let preset = finish.preset();
        println!(
            "  {:<8} color #{:06x}  metalness {:.2}  roughness {:.2}",
            finish, preset.color, preset.metalness, preset.roughness
        );
    }
}

/// Decode the GLB off the async runtime, then install both attachments.
async fn load_assets(state: Arc<AppState>, model_path: String) -> anyhow::Result<()> {
    let template =
        tokio::task::spawn_blocking(move || ModelTemplate::from_file(&model_path)).await??;

    let mut scene = state.scene.write().await;
    scene.install_template(&template);
    Ok(())
}

async fn run_http_server(state: Arc<AppState>) -> anyhow::Result<()> {
    let config = state.config.read().await;
    let http_config = config.http.clone();
    drop(config);

    let web_server = WebServer::new(Arc::clone(&state), &http_config);

    let addr = format!("{}:{}", http_config.host, http_config.port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let mut shutdown_rx = state.subscribe_shutdown();

    axum::serve(listener, web_server.router())
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn run_tracking(state: Arc<AppState>) -> anyhow::Result<()> {
    let config = state.config.read().await;
    let tracking_config = config.tracking.clone();
    drop(config);

    let mut shutdown_rx = state.subscribe_shutdown();

    // Optionally launch the camera/FaceMesh helper
    let mut subprocess = if tracking_config.auto_launch {
        let mut sp = TrackerSubprocess::new(&tracking_config);
        if let Err(e) = sp.start() {
            error!("Failed to auto-launch tracker: {}", e);
            // Continue anyway; the user may run the helper externally
        }
        // Give the tracker a moment to start
        tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;
        Some(sp)
    } else {
        None
    };

    // Start the receiver
    let mut receiver = FrameReceiver::new(&tracking_config);
    receiver.start()?;

    info!("Tracking started (port: {})", tracking_config.port);

    // Only apply a packet once; process() re-returns the latest data
    let mut last_applied = None;

    loop {
        tokio::select! {
            result = receiver.process() => {
                match result {
                    Ok(Some(data)) if data.has_data && data.packet != last_applied => {
                        state.set_tracker_alive(true);

                        if let Some(frame) = data.face_frame() {
                            let tuning = state.config.read().await.tuning;
                            let mut scene = state.scene.write().await;
                            scene.apply_frame(&frame, &tuning);
                        }
                        // face_detected == false means "no update this tick";
                        // the prior pose stays frozen
                        last_applied = data.packet;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("Tracking receive error: {}", e);
                        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    }
                }

                // Check subprocess health and auto-restart if needed
                if let Some(ref mut sp) = subprocess {
                    if !sp.is_running() && tracking_config.auto_restart {
                        info!(
                            "Tracker subprocess crashed, restarting in {}s",
                            tracking_config.restart_delay_secs
                        );
                        tokio::time::sleep(tokio::time::Duration::from_secs(
                            tracking_config.restart_delay_secs,
                        ))
                        .await;
                        if let Err(e) = sp.start() {
                            error!("Failed to restart tracker: {}", e);
                        }
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                info!("Tracking shutting down");
                break;
            }
        }

        // Small yield to avoid busy-spinning when no data arrives
        tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    }

    // Cleanup
    receiver.stop();
    if let Some(ref mut sp) = subprocess {
        sp.stop().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
