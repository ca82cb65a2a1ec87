use serde::Serialize;

use crate::config::Theme;

/// Colours a front-end paints the log pane with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogStyle {
    pub text_color: Option<String>,
    pub background_color: String,
}

impl Default for LogStyle {
    fn default() -> Self {
        Self {
            text_color: None,
            background_color: "#FFFBF0".to_string(),
        }
    }
}

/// Read-only text buffer for symbol loading messages. Text is only ever
/// appended at the end or cleared as a whole; there is no undo history.
#[derive(Debug, Clone, Default)]
pub struct LogPane {
    text: String,
    style: LogStyle,
}

impl LogPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragments are inserted verbatim, callers supply their own newlines.
    pub fn append(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_read_only(&self) -> bool {
        true
    }

    pub fn is_undo_enabled(&self) -> bool {
        false
    }

    pub fn style(&self) -> &LogStyle {
        &self.style
    }

    pub fn apply_theme(&mut self, theme: &Theme) {
        self.style = LogStyle {
            text_color: Some(theme.table_text_color.clone()),
            background_color: theme.table_background_color.clone(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_accumulate_until_cleared() {
        let mut log = LogPane::new();
        log.append("Loading symbols for ntdll.dll");
        log.append("... done\n");
        assert_eq!(log.text(), "Loading symbols for ntdll.dll... done\n");

        log.clear();
        assert!(log.text().is_empty());
        assert!(log.is_read_only());
        assert!(!log.is_undo_enabled());
    }

    #[test]
    fn theme_replaces_the_default_background() {
        let mut log = LogPane::new();
        assert_eq!(log.style().background_color, "#FFFBF0");

        log.apply_theme(&Theme {
            table_text_color: "#000000".into(),
            table_background_color: "#FFFFFF".into(),
        });
        assert_eq!(log.style().text_color.as_deref(), Some("#000000"));
        assert_eq!(log.style().background_color, "#FFFFFF");
    }
}
