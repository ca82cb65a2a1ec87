use serde::{Deserialize, Serialize};

use crate::engine::ModuleEntry;

/// Pushes from the debugger engine into the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BridgeEvent {
    /// Full replacement of the module list.
    UpdateSymbolList(Vec<ModuleEntry>),
    AddMsgToSymbolLog(String),
    /// Global log clear; the symbol log follows it.
    ClearLog,
    ClearSymbolLog,
    SetSymbolProgress(i32),
    /// Re-enumerate the currently selected module.
    SymbolRefreshCurrent,
    /// Theme colours changed.
    RepaintTableView,
}

/// Notifications the view sends up to the rest of the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewNotification {
    /// Bring the CPU (disassembler) view to the front.
    ShowCpu,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_use_tagged_json() {
        let event = BridgeEvent::UpdateSymbolList(vec![ModuleEntry::new("ntdll.dll", 0x7FFE0000)]);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"type":"UpdateSymbolList","data":[{"name":"ntdll.dll","base":"0x7FFE0000"}]}"#
        );

        let clear: BridgeEvent = serde_json::from_str(r#"{"type":"ClearLog"}"#).unwrap();
        assert_eq!(clear, BridgeEvent::ClearLog);
    }
}
