/// Target architecture of the debuggee, which decides how wide addresses are shown
use serde::{Deserialize, Serialize};

use crate::engine::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Architecture {
    X86,
    X64,
    Arm64,
}

/// Relative sizes of the panes in the view's splitters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplitterLayout {
    pub module_list: u32,
    pub symbol_list: u32,
    pub log: u32,
    pub lists: u32,
}

impl Architecture {
    /// Detect the current system architecture
    pub fn current() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            Architecture::X64
        }
        #[cfg(target_arch = "aarch64")]
        {
            Architecture::Arm64
        }
        #[cfg(target_arch = "x86")]
        {
            Architecture::X86
        }
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "x86")))]
        {
            compile_error!("Unsupported architecture: only x86, x86_64 and aarch64 are supported");
        }
    }

    /// Size of a pointer on the target, in bytes
    pub fn pointer_size(&self) -> usize {
        match self {
            Architecture::X86 => 4,
            Architecture::X64 | Architecture::Arm64 => 8,
        }
    }

    /// Uppercase hex, zero padded to two digits per pointer byte.
    pub fn format_address(&self, address: Address) -> String {
        format!("{:0width$X}", address, width = self.pointer_size() * 2)
    }

    pub fn splitter_layout(&self) -> SplitterLayout {
        // module list : symbol list is 30:100 on 32-bit targets, 40:100 on 64-bit ones
        let module_list = match self.pointer_size() {
            4 => 30,
            _ => 40,
        };
        SplitterLayout {
            module_list,
            symbol_list: 100,
            log: 2,
            lists: 9,
        }
    }
}
