use std::fmt;

use crate::engine::Address;

/// Distance from a module's base to the first code worth showing; the headers live below it.
pub const MODULE_HEADER_SKIP: Address = 0x1000;

/// Commands the view hands to the engine. The engine parses the rendered
/// text, so address operands are kept as the expressions shown in the tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Disasm(String),
    Dump(String),
    SymDownload(String),
}

impl Command {
    /// `disasm <base>+1000`, skipping the module header.
    pub fn disasm_module(base_cell: &str) -> Self {
        Command::Disasm(format!("{base_cell}+{MODULE_HEADER_SKIP:X}"))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Disasm(expr) => write!(f, "disasm {expr}"),
            Command::Dump(expr) => write!(f, "dump {expr}"),
            Command::SymDownload(module) => write!(f, "symdownload {module}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_render_to_engine_syntax() {
        assert_eq!(Command::Disasm("7FFE1000".into()).to_string(), "disasm 7FFE1000");
        assert_eq!(Command::Dump("7FFE1000".into()).to_string(), "dump 7FFE1000");
        assert_eq!(Command::SymDownload("ntdll.dll".into()).to_string(), "symdownload ntdll.dll");
        assert_eq!(Command::disasm_module("7FFE0000").to_string(), "disasm 7FFE0000+1000");
    }
}
