use serde::Serialize;
use tracing::trace;

/// A column header. `width` is in characters, 0 means "take the remaining space".
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub title: String,
    pub width: usize,
    pub sortable: bool,
}

/// Entries of a table's copy submenu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "column")]
pub enum CopyAction {
    Line,
    Table,
    Column(usize),
}

/// Row/cell model behind a list widget: cells are display strings,
/// selection is a single row anchored at the initial selection.
#[derive(Debug, Clone, Default)]
pub struct StdTable {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    selection: usize,
    offset: usize,
    revision: u64,
}

impl StdTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_column(&mut self, width: usize, title: &str, sortable: bool) {
        self.columns.push(Column {
            title: title.to_string(),
            width,
            sortable,
        });
        for row in &mut self.rows {
            row.push(String::new());
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Grows with blank rows or truncates; surviving rows keep their content.
    pub fn set_row_count(&mut self, count: usize) {
        let width = self.columns.len();
        self.rows.resize_with(count, || vec![String::new(); width]);
    }

    pub fn set_cell_content(&mut self, row: usize, col: usize, content: impl Into<String>) {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => *cell = content.into(),
            None => trace!(row, col, "Ignoring write outside of table"),
        }
    }

    pub fn cell_content(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn push_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.columns.len(), String::new());
        self.rows.push(cells);
    }

    pub fn set_single_selection(&mut self, row: usize) {
        self.selection = row;
    }

    pub fn initial_selection(&self) -> usize {
        self.selection
    }

    pub fn set_table_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn table_offset(&self) -> usize {
        self.offset
    }

    /// Marks the content as changed so a front-end repaints it.
    pub fn reload_data(&mut self) {
        self.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Copy submenu entries; nothing to copy from an empty table.
    pub fn copy_actions(&self) -> Vec<CopyAction> {
        if self.rows.is_empty() {
            return Vec::new();
        }
        let mut actions = vec![CopyAction::Line, CopyAction::Table];
        actions.extend(
            self.columns
                .iter()
                .enumerate()
                .filter(|(_, c)| !c.title.is_empty())
                .map(|(i, _)| CopyAction::Column(i)),
        );
        actions
    }

    pub fn copy_label(&self, action: CopyAction) -> String {
        match action {
            CopyAction::Line => "&Line".to_string(),
            CopyAction::Table => "Cop&y table".to_string(),
            CopyAction::Column(col) => self
                .columns
                .get(col)
                .map(|c| c.title.clone())
                .unwrap_or_default(),
        }
    }

    /// Text placed on the clipboard for `action`, relative to the selected row.
    pub fn copy_text(&self, action: CopyAction) -> Option<String> {
        match action {
            CopyAction::Line => self.row(self.selection).map(|r| r.join("\t")),
            CopyAction::Table => {
                if self.rows.is_empty() {
                    return None;
                }
                let header = self
                    .columns
                    .iter()
                    .map(|c| c.title.as_str())
                    .collect::<Vec<_>>()
                    .join("\t");
                let body = self
                    .rows
                    .iter()
                    .map(|r| r.join("\t"))
                    .collect::<Vec<_>>()
                    .join("\r\n");
                Some(format!("{header}\r\n{body}"))
            }
            CopyAction::Column(col) => self.cell_content(self.selection, col).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_column_table() -> StdTable {
        let mut table = StdTable::new();
        table.add_column(16, "Base", false);
        table.add_column(0, "Module", true);
        table
    }

    #[test]
    fn row_count_resizes_with_blank_cells() {
        let mut table = two_column_table();
        table.set_row_count(2);
        table.set_cell_content(1, 1, "kernel32.dll");
        assert_eq!(table.cell_content(0, 0), Some(""));
        assert_eq!(table.cell_content(1, 1), Some("kernel32.dll"));

        table.set_row_count(0);
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.cell_content(1, 1), None);
    }

    #[test]
    fn writes_outside_the_table_are_dropped() {
        let mut table = two_column_table();
        table.set_row_count(1);
        table.set_cell_content(3, 0, "x");
        table.set_cell_content(0, 5, "x");
        assert_eq!(table.rows(), &[vec![String::new(), String::new()]]);
    }

    #[test]
    fn copy_menu_follows_the_selected_row() {
        let mut table = two_column_table();
        assert!(table.copy_actions().is_empty());

        table.push_row(vec!["00400000".into(), "app.exe".into()]);
        table.push_row(vec!["7FFE0000".into(), "ntdll.dll".into()]);
        table.set_single_selection(1);

        assert_eq!(
            table.copy_actions(),
            vec![
                CopyAction::Line,
                CopyAction::Table,
                CopyAction::Column(0),
                CopyAction::Column(1)
            ]
        );
        assert_eq!(table.copy_label(CopyAction::Column(1)), "Module");
        assert_eq!(table.copy_text(CopyAction::Line).unwrap(), "7FFE0000\tntdll.dll");
        assert_eq!(table.copy_text(CopyAction::Column(1)).unwrap(), "ntdll.dll");
        assert_eq!(
            table.copy_text(CopyAction::Table).unwrap(),
            "Base\tModule\r\n00400000\tapp.exe\r\n7FFE0000\tntdll.dll"
        );
    }
}
