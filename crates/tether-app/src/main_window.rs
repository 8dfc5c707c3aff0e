//! The `main` role: owns the registry and drives it from a console.

use std::path::PathBuf;
use std::process::Stdio;

use tether_common::WindowKey;
use tether_config::TetherConfig;
use tether_registry::{RegistryHandle, RegistryHost, WindowRegistry};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::console::{self, MainCommand, MAIN_HELP};

pub async fn run(config: TetherConfig, config_path: Option<PathBuf>) {
    let channel = crate::bus::connect(&config).await;
    let mirror = crate::bus::mirror(&config);

    let registry = WindowRegistry::init(mirror, channel);
    let (host, handle) = RegistryHost::new(registry);
    let host_task = tokio::spawn(host.run());

    let launcher = config.satellite.launch.then(|| Launcher { config_path });

    println!("{MAIN_HELP}");
    tokio::select! {
        _ = console_loop(&handle, launcher.as_ref()) => {}
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }

    handle.shutdown().await;
    match host_task.await {
        Ok(registry) => registry.shutdown(),
        Err(e) => warn!(error = %e, "Registry host task failed"),
    }
}

async fn console_loop(handle: &RegistryHandle, launcher: Option<&Launcher>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "Console read failed");
                return;
            }
        };
        let cmd = match console::parse_main(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}. {MAIN_HELP}");
                continue;
            }
        };
        if cmd == MainCommand::Quit {
            return;
        }
        if let Err(e) = execute(handle, launcher, cmd).await {
            warn!(error = %e, "Command failed");
            return;
        }
    }
}

async fn execute(
    handle: &RegistryHandle,
    launcher: Option<&Launcher>,
    cmd: MainCommand,
) -> tether_common::Result<()> {
    match cmd {
        MainCommand::Add(kind) => {
            let key = handle.add_window(kind).await?;
            println!("{key}");
        }
        MainCommand::Remove(key) => report(handle.remove_window(key.clone()).await?, &key),
        MainCommand::RemoveAll => {
            println!("removed {}", handle.remove_all_windows().await?);
        }
        MainCommand::Minimize(key) => report(handle.minimize_window(key.clone()).await?, &key),
        MainCommand::MinimizeAll => {
            println!("minimized {}", handle.minimize_all_windows().await?);
        }
        MainCommand::PopOut(key) => {
            let changed = handle.pop_out_window(key.clone()).await?;
            report(changed, &key);
            if changed {
                if let Some(launcher) = launcher {
                    launcher.spawn(&key);
                }
            }
        }
        MainCommand::List => {
            let snapshot = handle.snapshot().await?;
            if snapshot.is_empty() {
                println!("no windows");
            }
            for window in &snapshot {
                println!(
                    "{}  {:<10}  {}",
                    window.key,
                    window.display_state.as_str(),
                    window.kind
                );
            }
        }
        MainCommand::Quit => {}
    }
    Ok(())
}

fn report(changed: bool, key: &WindowKey) {
    if !changed {
        println!("no change for {key}");
    }
}

/// Starts satellite processes for popped-out windows.
struct Launcher {
    config_path: Option<PathBuf>,
}

impl Launcher {
    fn spawn(&self, key: &WindowKey) {
        let exe = match std::env::current_exe() {
            Ok(exe) => exe,
            Err(e) => {
                warn!(error = %e, "Cannot locate own executable, satellite not launched");
                return;
            }
        };

        let mut cmd = tokio::process::Command::new(exe);
        if let Some(path) = &self.config_path {
            cmd.arg("--config").arg(path);
        }
        cmd.args(["satellite", "--key", key.as_str()])
            .stdin(Stdio::null())
            .kill_on_drop(true);

        match cmd.spawn() {
            Ok(mut child) => {
                info!(key = %key, pid = ?child.id(), "Satellite launched");
                let key = key.clone();
                tokio::spawn(async move {
                    match child.wait().await {
                        Ok(status) => info!(key = %key, %status, "Satellite exited"),
                        Err(e) => warn!(key = %key, error = %e, "Satellite wait failed"),
                    }
                });
            }
            Err(e) => warn!(key = %key, error = %e, "Failed to launch satellite"),
        }
    }
}
