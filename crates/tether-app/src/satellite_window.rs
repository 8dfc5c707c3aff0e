//! The `satellite` role: one popped-out window in its own process.

use std::time::Duration;

use tether_common::WindowKey;
use tether_config::TetherConfig;
use tether_satellite::{SatelliteCommand, SatelliteController, SyncState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::console::{self, SATELLITE_HELP};

/// Longest wait for queued intents to reach the hub before exiting.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn run(config: TetherConfig, key: WindowKey) {
    let channel = crate::bus::connect(&config).await;
    let mirror = crate::bus::mirror(&config);

    let controller = SatelliteController::new(key.clone(), channel.clone(), mirror);
    let close_guard = controller.close_guard();
    let mut view = controller.watch();

    let (tx, rx) = mpsc::channel(8);
    tokio::spawn(read_console(tx));

    tokio::spawn(async move {
        while view.changed().await.is_ok() {
            let current = view.borrow_and_update().clone();
            match current.render.window() {
                Some(window) => println!(
                    "[{}] {} {}",
                    sync_label(current.sync),
                    window.kind,
                    window.display_state.as_str()
                ),
                None => println!("[{}]", sync_label(current.sync)),
            }
        }
    });

    println!("satellite for {key}. {SATELLITE_HELP}");
    let task = tokio::spawn(controller.run(rx));
    tokio::select! {
        result = task => match result {
            Ok(state) => info!(key = %key, state = ?state, "Satellite finished"),
            Err(e) => warn!(key = %key, error = %e, "Satellite task failed"),
        },
        signal = os_close() => {
            // Same path as teardown: pop in unless something already ended it.
            if close_guard.fire() {
                info!(key = %key, signal, "Closed by the OS, popped window back in");
            }
        }
    }

    match tokio::time::timeout(FLUSH_TIMEOUT, channel.close()).await {
        Ok(()) => debug!(key = %key, "Sync channel flushed"),
        Err(_) => warn!(key = %key, "Hub did not confirm close, last intent may be lost"),
    }
}

/// Resolves when the OS asks this window to go away, with the signal name.
#[cfg(unix)]
async fn os_close() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    match (signal(SignalKind::terminate()), signal(SignalKind::hangup())) {
        (Ok(mut term), Ok(mut hup)) => tokio::select! {
            _ = ctrl_c() => "SIGINT",
            _ = term.recv() => "SIGTERM",
            _ = hup.recv() => "SIGHUP",
        },
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Signal handlers unavailable, only ctrl-c closes the satellite");
            ctrl_c().await;
            "SIGINT"
        }
    }
}

#[cfg(not(unix))]
async fn os_close() -> &'static str {
    ctrl_c().await;
    "ctrl-c"
}

/// Ctrl-c, or never if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}

/// Feed stdin commands to the controller.
///
/// On end of input the sender is held until the controller stops, so a
/// satellite launched without a terminal keeps running.
async fn read_console(tx: mpsc::Sender<SatelliteCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match console::parse_satellite(&line) {
                Ok(Some(cmd)) => {
                    if tx.send(cmd).await.is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(e) => println!("{e}. {SATELLITE_HELP}"),
            },
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Console read failed");
                break;
            }
        }
    }
    tx.closed().await;
}

fn sync_label(state: SyncState) -> String {
    match state {
        SyncState::ColdStart => "starting".into(),
        SyncState::AwaitingSync => "loading".into(),
        SyncState::Synced => "live".into(),
        SyncState::Terminated(reason) => format!("ended: {reason:?}").to_lowercase(),
    }
}
