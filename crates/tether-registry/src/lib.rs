//! The window registry: canonical window state, owned by the main window.
//!
//! [`WindowRegistry`] holds the live windows and publishes a fresh
//! snapshot after every effective mutation. [`RegistryHost`] owns the
//! registry inside the main window's event loop and serializes local
//! commands and satellite intents; everything else talks to it through a
//! cloneable [`RegistryHandle`].

mod host;
mod registry;

pub use host::{RegistryCommand, RegistryHandle, RegistryHost};
pub use registry::WindowRegistry;
