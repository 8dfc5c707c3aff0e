pub mod errors;
pub mod id;
pub mod protocol;
pub mod types;

pub use errors::{BusError, ConfigError, KindError, MirrorError, TetherError};
pub use id::{new_id, WindowKey};
pub use protocol::SyncMessage;
pub use types::{DisplayState, KindParams, RegistrySnapshot, Window, WindowKind};

pub type Result<T> = std::result::Result<T, TetherError>;
