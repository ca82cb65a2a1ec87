use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Address = usize; // Using usize for memory addresses

/// A loaded module as reported by the engine's module list push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub name: String,
    #[serde(with = "hex_address")]
    pub base: Address,
}

impl ModuleEntry {
    pub fn new(name: impl Into<String>, base: Address) -> Self {
        Self {
            name: name.into(),
            base,
        }
    }
}

/// One symbol delivered by the engine during enumeration.
/// Either name may be missing; the view leaves the matching cell blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    #[serde(with = "hex_address")]
    pub address: Address,
    #[serde(default)]
    pub decorated: Option<String>,
    #[serde(default)]
    pub undecorated: Option<String>,
}

impl SymbolEntry {
    pub fn new(address: Address, decorated: Option<&str>, undecorated: Option<&str>) -> Self {
        Self {
            address,
            decorated: decorated.map(str::to_string),
            undecorated: undecorated.map(str::to_string),
        }
    }
}

/// Errors that can occur while talking to the debugger engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Engine is unreachable: {0}")]
    Unreachable(String),
    #[error("Engine returned status {status}: {message}")]
    BadStatus { status: u16, message: String },
    #[error("Malformed engine response: {0}")]
    MalformedResponse(String),
    #[error("Symbol enumeration failed for module at 0x{base:X}: {reason}")]
    EnumerationFailed { base: Address, reason: String },
    #[error("Engine error: {0}")]
    Other(String),
}

/// Interface to the debugger engine the view calls into.
///
/// The view never owns the engine's state; it only asks for symbols and hands
/// over opaque command strings. Implementations must be shareable with the
/// view server, hence `Send + Sync`.
#[async_trait]
pub trait DebugEngine: Send + Sync {
    /// Whether a debug session is currently active.
    async fn is_debugging(&self) -> bool;

    /// Enumerates the symbols of the module loaded at `base`.
    ///
    /// `sink` is called once per symbol, in engine order. The call returns only
    /// after every symbol has been delivered.
    async fn enumerate_symbols(
        &self,
        base: Address,
        sink: &mut (dyn FnMut(SymbolEntry) + Send),
    ) -> Result<(), EngineError>;

    /// Executes a command and waits for it to finish.
    /// Returns the engine's success flag.
    async fn exec_direct(&self, command: &str) -> Result<bool, EngineError>;

    /// Queues a command without waiting for its outcome.
    async fn exec(&self, command: &str) -> Result<(), EngineError>;
}

/// Serde codec for addresses as `"0x..."` strings. Plain decimal is accepted on input.
pub mod hex_address {
    use super::Address;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(addr: &Address, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{addr:X}"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse(s: &str) -> Result<Address, std::num::ParseIntError> {
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            usize::from_str_radix(hex, 16)
        } else {
            s.parse::<usize>()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_entry_uses_hex_base() {
        let json = serde_json::to_string(&ModuleEntry::new("ntdll.dll", 0x7FFE0000)).unwrap();
        assert_eq!(json, r#"{"name":"ntdll.dll","base":"0x7FFE0000"}"#);
    }

    #[test]
    fn symbol_entry_accepts_decimal_and_missing_names() {
        let symbol: SymbolEntry = serde_json::from_str(r#"{"address":"4096"}"#).unwrap();
        assert_eq!(symbol.address, 0x1000);
        assert!(symbol.decorated.is_none());
        assert!(symbol.undecorated.is_none());
    }

    #[test]
    fn hex_address_rejects_garbage() {
        assert!(hex_address::parse("0xZZ").is_err());
        assert_eq!(hex_address::parse("0X10").unwrap(), 16);
    }
}
