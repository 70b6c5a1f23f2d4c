//! Stateful accumulation of a markdown table into a pipe-table fragment
//! (spec §4.4 step 5).

/// Accumulates rows and cells for a single table while the walker is
/// inside it, then renders a GFM-style pipe table on close.
#[derive(Debug, Default)]
pub struct TableBuilder {
    rows: Vec<Vec<String>>,
    current_row: Vec<String>,
}

impl TableBuilder {
    /// Starts a new, empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a finished cell's text to the row currently being built.
    pub fn push_cell(&mut self, text: String) {
        self.current_row.push(text.trim().to_string());
    }

    /// Closes the current row, starting a fresh one.
    pub fn end_row(&mut self) {
        if !self.current_row.is_empty() {
            self.rows.push(std::mem::take(&mut self.current_row));
        }
    }

    /// Renders the accumulated rows as a pipe table. The first row is
    /// treated as the header; a separator row is synthesized beneath it.
    #[must_use]
    pub fn render(mut self) -> String {
        if !self.current_row.is_empty() {
            self.end_row();
        }
        if self.rows.is_empty() {
            return String::new();
        }

        let col_count = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut out = String::new();
        for (i, row) in self.rows.iter().enumerate() {
            out.push('|');
            for col in 0..col_count {
                out.push(' ');
                out.push_str(row.get(col).map(String::as_str).unwrap_or(""));
                out.push_str(" |");
            }
            out.push('\n');
            if i == 0 {
                out.push('|');
                for _ in 0..col_count {
                    out.push_str(" --- |");
                }
                out.push('\n');
            }
        }
        out.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_header_and_separator_and_body_rows() {
        let mut t = TableBuilder::new();
        t.push_cell("A".into());
        t.push_cell("B".into());
        t.end_row();
        t.push_cell("1".into());
        t.push_cell("2".into());
        t.end_row();
        let rendered = t.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].chars().all(|c| matches!(c, '|' | '-' | ' ')));
    }

    #[test]
    fn empty_table_renders_empty_string() {
        assert_eq!(TableBuilder::new().render(), "");
    }
}
