//! Event loop that owns the registry in the main window process.

use tether_bus::Subscription;
use tether_common::{RegistrySnapshot, Result, TetherError, WindowKey, WindowKind};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::WindowRegistry;

const COMMAND_QUEUE: usize = 64;

/// A request from the main window's UI to the registry.
#[derive(Debug)]
pub enum RegistryCommand {
    AddWindow {
        kind: WindowKind,
        reply: oneshot::Sender<WindowKey>,
    },
    RemoveWindow {
        key: WindowKey,
        reply: oneshot::Sender<bool>,
    },
    RemoveAll {
        reply: oneshot::Sender<usize>,
    },
    Minimize {
        key: WindowKey,
        reply: oneshot::Sender<bool>,
    },
    MinimizeAll {
        reply: oneshot::Sender<usize>,
    },
    PopOut {
        key: WindowKey,
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<RegistrySnapshot>,
    },
    Shutdown,
}

/// Owns a [`WindowRegistry`] and serializes every mutation to it.
///
/// Local commands and satellite intents are handled one at a time on the
/// same task, so the registry never sees concurrent writers.
pub struct RegistryHost {
    registry: WindowRegistry,
    intents: Subscription,
    commands: mpsc::Receiver<RegistryCommand>,
}

impl RegistryHost {
    /// Wrap `registry`. The intent subscription is taken here, so intents
    /// sent after this call are never missed.
    pub fn new(registry: WindowRegistry) -> (Self, RegistryHandle) {
        let (tx, commands) = mpsc::channel(COMMAND_QUEUE);
        let intents = registry.channel().subscribe();
        (
            Self {
                registry,
                intents,
                commands,
            },
            RegistryHandle { tx },
        )
    }

    /// Run until a `Shutdown` command arrives or every handle is dropped.
    /// Returns the registry so the caller can inspect or shut it down.
    pub async fn run(mut self) -> WindowRegistry {
        info!("Registry host running");
        loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(RegistryCommand::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                msg = self.intents.recv() => match msg {
                    Some(msg) => {
                        self.registry.apply_intent(&msg);
                    }
                    None => {
                        warn!("Sync channel closed, registry host stopping");
                        break;
                    }
                },
            }
        }
        info!("Registry host stopped");
        self.registry
    }

    fn handle_command(&mut self, cmd: RegistryCommand) {
        debug!(?cmd, "Registry command");
        // A dropped reply receiver only means the caller stopped waiting.
        match cmd {
            RegistryCommand::AddWindow { kind, reply } => {
                let _ = reply.send(self.registry.add_window(kind));
            }
            RegistryCommand::RemoveWindow { key, reply } => {
                let _ = reply.send(self.registry.remove_window(&key));
            }
            RegistryCommand::RemoveAll { reply } => {
                let _ = reply.send(self.registry.remove_all_windows());
            }
            RegistryCommand::Minimize { key, reply } => {
                let _ = reply.send(self.registry.minimize_window(&key));
            }
            RegistryCommand::MinimizeAll { reply } => {
                let _ = reply.send(self.registry.minimize_all_windows());
            }
            RegistryCommand::PopOut { key, reply } => {
                let _ = reply.send(self.registry.pop_out_window(&key));
            }
            RegistryCommand::Snapshot { reply } => {
                let _ = reply.send(self.registry.snapshot());
            }
            RegistryCommand::Shutdown => {}
        }
    }
}

/// Cloneable front end to a running [`RegistryHost`].
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    tx: mpsc::Sender<RegistryCommand>,
}

impl RegistryHandle {
    pub async fn add_window(&self, kind: WindowKind) -> Result<WindowKey> {
        self.request(|reply| RegistryCommand::AddWindow { kind, reply })
            .await
    }

    pub async fn remove_window(&self, key: WindowKey) -> Result<bool> {
        self.request(|reply| RegistryCommand::RemoveWindow { key, reply })
            .await
    }

    pub async fn remove_all_windows(&self) -> Result<usize> {
        self.request(|reply| RegistryCommand::RemoveAll { reply })
            .await
    }

    pub async fn minimize_window(&self, key: WindowKey) -> Result<bool> {
        self.request(|reply| RegistryCommand::Minimize { key, reply })
            .await
    }

    pub async fn minimize_all_windows(&self) -> Result<usize> {
        self.request(|reply| RegistryCommand::MinimizeAll { reply })
            .await
    }

    pub async fn pop_out_window(&self, key: WindowKey) -> Result<bool> {
        self.request(|reply| RegistryCommand::PopOut { key, reply })
            .await
    }

    pub async fn snapshot(&self) -> Result<RegistrySnapshot> {
        self.request(|reply| RegistryCommand::Snapshot { reply })
            .await
    }

    /// Ask the host to stop. Safe to call more than once.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(RegistryCommand::Shutdown).await;
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RegistryCommand,
    ) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| host_stopped())?;
        rx.await.map_err(|_| host_stopped())
    }
}

fn host_stopped() -> TetherError {
    TetherError::Registry("registry host is not running".into())
}
