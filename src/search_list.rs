use crate::table::StdTable;

/// Which of the two tables a `SearchListView` is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveList {
    Full,
    Filtered,
}

/// A table with a search box. While the search text is non-empty the view
/// shows a filtered copy of the table instead of the table itself.
#[derive(Debug, Clone)]
pub struct SearchListView {
    pub list: StdTable,
    pub search_list: StdTable,
    /// First column the search text is matched against.
    pub search_start_col: usize,
    search_text: String,
}

impl SearchListView {
    pub fn new(search_start_col: usize) -> Self {
        Self {
            list: StdTable::new(),
            search_list: StdTable::new(),
            search_start_col,
            search_text: String::new(),
        }
    }

    /// Adds the same column to both the full and the filtered table.
    pub fn add_column(&mut self, width: usize, title: &str, sortable: bool) {
        self.list.add_column(width, title, sortable);
        self.search_list.add_column(width, title, sortable);
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn active(&self) -> ActiveList {
        if self.search_text.is_empty() {
            ActiveList::Full
        } else {
            ActiveList::Filtered
        }
    }

    pub fn cur_list(&self) -> &StdTable {
        match self.active() {
            ActiveList::Full => &self.list,
            ActiveList::Filtered => &self.search_list,
        }
    }

    pub fn cur_list_mut(&mut self) -> &mut StdTable {
        match self.active() {
            ActiveList::Full => &mut self.list,
            ActiveList::Filtered => &mut self.search_list,
        }
    }

    /// Replaces the search text and rebuilds the filtered table.
    /// Matching is a case-insensitive substring test on columns from `search_start_col`.
    pub fn set_search_text(&mut self, text: &str) {
        self.search_text = text.to_string();
        self.refilter();
    }

    pub fn refilter(&mut self) {
        self.search_list.set_row_count(0);
        if !self.search_text.is_empty() {
            let needle = self.search_text.to_lowercase();
            let start = self.search_start_col;
            for row in self.list.rows() {
                let hit = row
                    .iter()
                    .skip(start)
                    .any(|cell| cell.to_lowercase().contains(&needle));
                if hit {
                    self.search_list.push_row(row.clone());
                }
            }
        }
        self.search_list.set_single_selection(0);
        self.search_list.set_table_offset(0);
        self.search_list.reload_data();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols() -> SearchListView {
        let mut view = SearchListView::new(1);
        view.add_column(16, "Address", true);
        view.add_column(80, "Symbol", true);
        view.add_column(0, "Symbol (undecorated)", true);
        view.list.push_row(vec!["1000".into(), "NtOpenFile".into(), String::new()]);
        view.list.push_row(vec!["2000".into(), "?Open@@YAXXZ".into(), "void Open(void)".into()]);
        view.list.push_row(vec!["3000".into(), "RtlExitUserThread".into(), String::new()]);
        view
    }

    #[test]
    fn empty_search_shows_the_full_list() {
        let view = symbols();
        assert_eq!(view.active(), ActiveList::Full);
        assert_eq!(view.cur_list().row_count(), 3);
    }

    #[test]
    fn search_is_case_insensitive_and_skips_the_address_column() {
        let mut view = symbols();
        view.set_search_text("open");
        assert_eq!(view.active(), ActiveList::Filtered);
        let hits: Vec<_> = view.cur_list().rows().iter().map(|r| r[0].clone()).collect();
        assert_eq!(hits, vec!["1000", "2000"]);

        // "3000" only appears in the address column
        view.set_search_text("3000");
        assert_eq!(view.cur_list().row_count(), 0);
    }

    #[test]
    fn clearing_the_search_returns_to_the_full_list() {
        let mut view = symbols();
        view.set_search_text("rtl");
        view.set_search_text("");
        assert_eq!(view.active(), ActiveList::Full);
        assert_eq!(view.search_list.row_count(), 0);
    }
}
