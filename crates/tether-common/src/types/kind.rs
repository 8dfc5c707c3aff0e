use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::KindError;

/// The closed set of window types, each with its required parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WindowKind {
    Wallet,
    Message,
    Miniapp { url: String },
    Token { chain_id: u64, address: String },
}

/// Flat parameter bag as it appears on the wire (`kindParams`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl WindowKind {
    pub const NAMES: [&'static str; 4] = ["wallet", "message", "miniapp", "token"];

    pub fn name(&self) -> &'static str {
        match self {
            WindowKind::Wallet => "wallet",
            WindowKind::Message => "message",
            WindowKind::Miniapp { .. } => "miniapp",
            WindowKind::Token { .. } => "token",
        }
    }

    /// Singleton kinds may have at most one live window application-wide.
    pub fn is_singleton(&self) -> bool {
        match self {
            WindowKind::Wallet | WindowKind::Message => true,
            WindowKind::Miniapp { .. } | WindowKind::Token { .. } => false,
        }
    }

    /// Whether both values are the same kind, ignoring parameters.
    pub fn same_kind(&self, other: &WindowKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn params(&self) -> KindParams {
        match self {
            WindowKind::Wallet | WindowKind::Message => KindParams::default(),
            WindowKind::Miniapp { url } => KindParams {
                url: Some(url.clone()),
                ..Default::default()
            },
            WindowKind::Token { chain_id, address } => KindParams {
                chain_id: Some(*chain_id),
                address: Some(address.clone()),
                ..Default::default()
            },
        }
    }

    /// Rebuild a kind from its wire name and parameter bag.
    ///
    /// Empty strings count as missing. Parameters that a kind does not use
    /// are ignored.
    pub fn from_parts(name: &str, params: KindParams) -> Result<Self, KindError> {
        fn required(
            value: Option<String>,
            kind: &'static str,
            param: &'static str,
        ) -> Result<String, KindError> {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or(KindError::MissingParam { kind, param })
        }

        match name {
            "wallet" => Ok(WindowKind::Wallet),
            "message" => Ok(WindowKind::Message),
            "miniapp" => Ok(WindowKind::Miniapp {
                url: required(params.url, "miniapp", "url")?,
            }),
            "token" => {
                let chain_id = params.chain_id.ok_or(KindError::MissingParam {
                    kind: "token",
                    param: "chainId",
                })?;
                Ok(WindowKind::Token {
                    chain_id,
                    address: required(params.address, "token", "address")?,
                })
            }
            other => Err(KindError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowKind::Wallet | WindowKind::Message => write!(f, "{}", self.name()),
            WindowKind::Miniapp { url } => write!(f, "miniapp({url})"),
            WindowKind::Token { chain_id, address } => write!(f, "token({chain_id}:{address})"),
        }
    }
}
