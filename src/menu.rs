use serde::{Deserialize, Serialize};

use crate::table::CopyAction;

/// Where a follow action sends the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowTarget {
    Disassembler,
    Dump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuAction {
    FollowSymbol,
    FollowSymbolDump,
    FollowModule,
    DownloadSymbols,
}

impl MenuAction {
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::FollowSymbol | MenuAction::FollowModule => "&Follow in Disassembler",
            MenuAction::FollowSymbolDump => "Follow in &Dump",
            MenuAction::DownloadSymbols => "&Download Symbols",
        }
    }

    /// Widget-local shortcut, if any.
    pub fn shortcut(&self) -> Option<&'static str> {
        match self {
            MenuAction::FollowSymbol | MenuAction::FollowModule => Some("Enter"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub action: MenuAction,
    pub label: &'static str,
    pub shortcut: Option<&'static str>,
}

impl From<MenuAction> for MenuItem {
    fn from(action: MenuAction) -> Self {
        Self {
            action,
            label: action.label(),
            shortcut: action.shortcut(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CopyItem {
    pub action: CopyAction,
    pub label: String,
}

/// A context menu: actions, then (after a separator) an optional copy submenu.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContextMenu {
    pub items: Vec<MenuItem>,
    pub copy: Vec<CopyItem>,
}

impl ContextMenu {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.copy.is_empty()
    }

    pub fn actions(&self) -> Vec<MenuAction> {
        self.items.iter().map(|i| i.action).collect()
    }
}
