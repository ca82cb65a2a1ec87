use std::collections::HashMap;
use std::sync::Arc;

use msvc_demangler::DemangleFlags;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::arch::{Architecture, SplitterLayout};
use crate::bridge::{BridgeEvent, ViewNotification};
use crate::command::Command;
use crate::config::{Config, Theme};
use crate::engine::{Address, DebugEngine, ModuleEntry, SymbolEntry};
use crate::log_pane::{LogPane, LogStyle};
use crate::menu::{ContextMenu, CopyItem, FollowTarget, MenuAction, MenuItem};
use crate::search_list::{ActiveList, SearchListView};
use crate::table::StdTable;

const MODULE_BASE_COL: usize = 0;
const MODULE_NAME_COL: usize = 1;
const SYMBOL_ADDRESS_COL: usize = 0;
const SYMBOL_DECORATED_COL: usize = 1;
const SYMBOL_UNDECORATED_COL: usize = 2;

/// Which list owns keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Focus {
    ModuleList,
    SymbolList,
}

/// Keyboard/mouse activation of a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableInput {
    EnterPressed,
    DoubleClicked,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSnapshot {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub selection: usize,
    pub offset: usize,
    pub revision: u64,
}

impl From<&StdTable> for TableSnapshot {
    fn from(table: &StdTable) -> Self {
        Self {
            columns: table.columns().iter().map(|c| c.title.clone()).collect(),
            rows: table.rows().to_vec(),
            selection: table.initial_selection(),
            offset: table.table_offset(),
            revision: table.revision(),
        }
    }
}

/// Everything a front-end needs to paint the panel.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub modules: TableSnapshot,
    /// The symbol list currently shown, filtered while a search is active.
    pub symbols: TableSnapshot,
    pub search_text: String,
    pub filtered: bool,
    pub focus: Focus,
    pub log: String,
    pub log_style: LogStyle,
    pub progress: i32,
    pub layout: SplitterLayout,
}

/// The module/symbol panel: a module table, a searchable symbol table for the
/// selected module, a progress value and the symbol log.
///
/// All operations take `&mut self`; callers serialise access the way a UI
/// thread would.
pub struct SymbolView {
    engine: Arc<dyn DebugEngine>,
    arch: Architecture,
    theme: Theme,
    demangle_missing: bool,
    module_list: StdTable,
    symbols: SearchListView,
    log: LogPane,
    progress: i32,
    module_bases: HashMap<String, Address>,
    focus: Focus,
    notifications: mpsc::UnboundedSender<ViewNotification>,
}

impl SymbolView {
    /// Builds the view around an engine handle. The receiver yields the
    /// notifications the view raises, such as requests to show the CPU view.
    pub fn new(
        engine: Arc<dyn DebugEngine>,
        config: &Config,
    ) -> (Self, mpsc::UnboundedReceiver<ViewNotification>) {
        let arch = config.architecture();
        let address_width = arch.pointer_size() * 2;

        let mut module_list = StdTable::new();
        module_list.add_column(address_width, "Base", false);
        module_list.add_column(0, "Module", true);

        let mut symbols = SearchListView::new(SYMBOL_DECORATED_COL);
        symbols.add_column(address_width, "Address", true);
        symbols.add_column(80, "Symbol", true);
        symbols.add_column(0, "Symbol (undecorated)", true);

        let (tx, rx) = mpsc::unbounded_channel();
        let view = Self {
            engine,
            arch,
            theme: config.theme.clone(),
            demangle_missing: config.demangle_missing,
            module_list,
            symbols,
            log: LogPane::new(),
            progress: 0,
            module_bases: HashMap::new(),
            focus: Focus::ModuleList,
            notifications: tx,
        };
        (view, rx)
    }

    pub fn module_list(&self) -> &StdTable {
        &self.module_list
    }

    pub fn symbols(&self) -> &SearchListView {
        &self.symbols
    }

    pub fn module_bases(&self) -> &HashMap<String, Address> {
        &self.module_bases
    }

    pub fn log(&self) -> &LogPane {
        &self.log
    }

    pub fn progress(&self) -> i32 {
        self.progress
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Routes an engine push to the matching operation.
    pub async fn handle_event(&mut self, event: BridgeEvent) {
        debug!(?event, "Bridge event");
        match event {
            BridgeEvent::UpdateSymbolList(modules) => self.update_symbol_list(modules),
            BridgeEvent::AddMsgToSymbolLog(msg) => self.add_msg_to_symbol_log(&msg),
            BridgeEvent::ClearLog | BridgeEvent::ClearSymbolLog => self.clear_symbol_log(),
            BridgeEvent::SetSymbolProgress(value) => self.set_symbol_progress(value),
            BridgeEvent::SymbolRefreshCurrent => self.symbol_refresh_current().await,
            BridgeEvent::RepaintTableView => self.update_style(),
        }
    }

    /// Replaces the module table and the name to base lookup with `modules`.
    pub fn update_symbol_list(&mut self, modules: Vec<ModuleEntry>) {
        info!(count = modules.len(), "Module list updated");

        self.module_list.set_row_count(modules.len());
        if modules.is_empty() {
            self.symbols.list.set_row_count(0);
            self.symbols.list.set_single_selection(0);
            self.symbols.refilter();
            self.module_list.set_single_selection(0);
        }

        self.module_bases.clear();
        for (row, module) in modules.into_iter().enumerate() {
            let base_cell = self.arch.format_address(module.base);
            self.module_list.set_cell_content(row, MODULE_BASE_COL, base_cell);
            self.module_list.set_cell_content(row, MODULE_NAME_COL, module.name.as_str());
            self.module_bases.insert(module.name, module.base);
        }
        self.module_list.reload_data();
    }

    /// Selects a module row, which re-enumerates its symbols.
    pub async fn select_module(&mut self, row: usize) {
        self.module_list.set_single_selection(row);
        self.module_selection_changed(row).await;
    }

    /// Fills the symbol list with the symbols of the module shown at `row`.
    /// Rows whose module is not in the lookup table are ignored.
    pub async fn module_selection_changed(&mut self, row: usize) {
        let Some(name) = self.module_list.cell_content(row, MODULE_NAME_COL) else {
            return;
        };
        let Some(&base) = self.module_bases.get(name) else {
            debug!(row, module = name, "Selected module is not in the module table");
            return;
        };
        let name = name.to_string();

        self.symbols.list.set_row_count(0);

        let engine = Arc::clone(&self.engine);
        let arch = self.arch;
        let demangle = self.demangle_missing;
        let list = &mut self.symbols.list;
        let result = engine
            .enumerate_symbols(base, &mut |symbol: SymbolEntry| {
                list.push_row(symbol_row(arch, demangle, symbol));
            })
            .await;
        match result {
            Ok(()) => info!(
                module = %name,
                base = format_args!("0x{base:X}"),
                count = self.symbols.list.row_count(),
                "Enumerated symbols"
            ),
            Err(e) => warn!(module = %name, error = %e, "Symbol enumeration failed"),
        }

        self.symbols.list.reload_data();
        self.symbols.list.set_single_selection(0);
        self.symbols.list.set_table_offset(0);
        self.focus = Focus::SymbolList;
        self.symbols.set_search_text("");
    }

    /// Re-applies the current module selection.
    pub async fn symbol_refresh_current(&mut self) {
        let row = self.module_list.initial_selection();
        self.select_module(row).await;
    }

    pub fn search(&mut self, text: &str) {
        self.symbols.set_search_text(text);
    }

    pub fn select_symbol(&mut self, row: usize) {
        self.symbols.cur_list_mut().set_single_selection(row);
    }

    pub async fn symbol_follow(&mut self) {
        self.follow_symbol(FollowTarget::Disassembler).await;
    }

    pub async fn symbol_follow_dump(&mut self) {
        self.follow_symbol(FollowTarget::Dump).await;
    }

    /// Sends the address of the selected symbol (in the list currently shown) to `target`.
    pub async fn follow_symbol(&mut self, target: FollowTarget) {
        let list = self.symbols.cur_list();
        let Some(address) = list.cell_content(list.initial_selection(), SYMBOL_ADDRESS_COL) else {
            debug!("No symbol selected, nothing to follow");
            return;
        };
        let command = match target {
            FollowTarget::Disassembler => Command::Disasm(address.to_string()),
            FollowTarget::Dump => Command::Dump(address.to_string()),
        };
        self.exec_direct(command).await;
        self.notify(ViewNotification::ShowCpu);
    }

    /// Disassembles the selected module just past its header.
    pub async fn module_follow(&mut self) {
        let row = self.module_list.initial_selection();
        let Some(base) = self.module_list.cell_content(row, MODULE_BASE_COL) else {
            debug!(row, "No module selected, nothing to follow");
            return;
        };
        let command = Command::disasm_module(base);
        self.exec_direct(command).await;
        self.notify(ViewNotification::ShowCpu);
    }

    /// Asks the engine to fetch symbols for the selected module. No result comes back here.
    pub async fn module_download_symbols(&mut self) {
        let row = self.module_list.initial_selection();
        let Some(name) = self.module_list.cell_content(row, MODULE_NAME_COL) else {
            return;
        };
        let command = Command::SymDownload(name.to_string()).to_string();
        info!(command = %command, "Queueing symbol download");
        if let Err(e) = self.engine.exec(&command).await {
            warn!(command = %command, error = %e, "Failed to queue command");
        }
    }

    pub async fn module_input(&mut self, input: TableInput) {
        match input {
            TableInput::EnterPressed | TableInput::DoubleClicked => self.module_follow().await,
        }
    }

    pub async fn symbol_input(&mut self, input: TableInput) {
        if input == TableInput::EnterPressed {
            self.symbol_follow().await;
        }
    }

    /// Follow actions, offered only when the shown symbol list has rows.
    pub fn symbol_context_menu(&self) -> ContextMenu {
        if self.symbols.cur_list().row_count() == 0 {
            return ContextMenu::default();
        }
        ContextMenu {
            items: vec![
                MenuAction::FollowSymbol.into(),
                MenuAction::FollowSymbolDump.into(),
            ],
            copy: Vec::new(),
        }
    }

    /// Module actions plus the module table's copy submenu.
    /// `None` while no debug session is active.
    pub async fn module_context_menu(&self) -> Option<ContextMenu> {
        if !self.engine.is_debugging().await {
            return None;
        }
        let copy = self
            .module_list
            .copy_actions()
            .into_iter()
            .map(|action| CopyItem {
                action,
                label: self.module_list.copy_label(action),
            })
            .collect();
        Some(ContextMenu {
            items: vec![
                MenuItem::from(MenuAction::FollowModule),
                MenuItem::from(MenuAction::DownloadSymbols),
            ],
            copy,
        })
    }

    pub async fn trigger(&mut self, action: MenuAction) {
        match action {
            MenuAction::FollowSymbol => self.symbol_follow().await,
            MenuAction::FollowSymbolDump => self.symbol_follow_dump().await,
            MenuAction::FollowModule => self.module_follow().await,
            MenuAction::DownloadSymbols => self.module_download_symbols().await,
        }
    }

    pub fn add_msg_to_symbol_log(&mut self, msg: &str) {
        self.log.append(msg);
    }

    pub fn clear_symbol_log(&mut self) {
        self.log.clear();
    }

    /// Values outside 0..=100 are ignored and the previous value is kept.
    pub fn set_symbol_progress(&mut self, value: i32) {
        if !(0..=100).contains(&value) {
            debug!(value, "Ignoring out-of-range progress");
            return;
        }
        self.progress = value;
    }

    pub fn update_style(&mut self) {
        self.log.apply_theme(&self.theme);
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            modules: TableSnapshot::from(&self.module_list),
            symbols: TableSnapshot::from(self.symbols.cur_list()),
            search_text: self.symbols.search_text().to_string(),
            filtered: self.symbols.active() == ActiveList::Filtered,
            focus: self.focus,
            log: self.log.text().to_string(),
            log_style: self.log.style().clone(),
            progress: self.progress,
            layout: self.arch.splitter_layout(),
        }
    }

    async fn exec_direct(&self, command: Command) {
        let command = command.to_string();
        info!(command = %command, "Executing command");
        match self.engine.exec_direct(&command).await {
            Ok(true) => {}
            Ok(false) => warn!(command = %command, "Engine reported command failure"),
            Err(e) => warn!(command = %command, error = %e, "Failed to execute command"),
        }
    }

    fn notify(&self, notification: ViewNotification) {
        // A closed receiver only means nobody is listening anymore.
        let _ = self.notifications.send(notification);
    }
}

fn symbol_row(arch: Architecture, demangle: bool, symbol: SymbolEntry) -> Vec<String> {
    let mut row = vec![String::new(); 3];
    row[SYMBOL_ADDRESS_COL] = arch.format_address(symbol.address);
    let undecorated = match (symbol.undecorated, &symbol.decorated) {
        (Some(name), _) => Some(name),
        (None, Some(decorated)) if demangle => demangle_msvc(decorated),
        (None, _) => None,
    };
    if let Some(decorated) = symbol.decorated {
        row[SYMBOL_DECORATED_COL] = decorated;
    }
    if let Some(undecorated) = undecorated {
        row[SYMBOL_UNDECORATED_COL] = undecorated;
    }
    row
}

fn demangle_msvc(name: &str) -> Option<String> {
    if !name.starts_with('?') {
        return None;
    }
    msvc_demangler::demangle(name, DemangleFlags::llvm()).ok()
}
