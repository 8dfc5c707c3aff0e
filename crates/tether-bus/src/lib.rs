//! Broadcast channel between window processes.
//!
//! [`SyncChannel`] is a fire-and-forget pub/sub handle carrying
//! [`SyncMessage`](tether_common::SyncMessage)s:
//! - at most once per send, no ordering across senders
//! - no delivery to subscribers that join after the send
//! - no history and no persistence
//! - a sender never receives its own messages
//!
//! Within one process, endpoints share a `tokio::sync::broadcast` bus.
//! Across processes, [`SyncChannel::connect`] joins the local
//! `tether-hub`, which fans each frame out to every other process.

mod channel;
mod subscription;
mod ws;

pub use channel::SyncChannel;
pub use subscription::{Subscription, Unsubscribe};
