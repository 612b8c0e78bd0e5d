//! Plain-text tables for CLI output. Columns grow to fit their widest cell;
//! ANSI escapes in cells do not count towards the width.

use crate::utils::colors::visible_width;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Short rows are padded with empty cells; extra cells are dropped.
    pub fn add_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .map(|r| visible_width(&r[i]))
                    .chain(std::iter::once(visible_width(h)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn line(cells: &[String], widths: &[usize]) -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{c}{}", " ".repeat(w.saturating_sub(visible_width(c)))))
            .collect();
        padded.join("  ").trim_end().to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

        let mut out = Self::line(&self.headers, &widths);
        out.push('\n');
        out.push_str(&Self::line(&rule, &widths));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&Self::line(row, &widths));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::colors::{GREEN, RESET};

    #[test]
    fn columns_fit_widest_cell() {
        let mut t = Table::new(&["Date", "Method"]);
        t.add_row(vec!["2024-01-01".into(), format!("{GREEN}Student App{RESET}")]);
        t.add_row(vec!["2024-01-02".into()]);

        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Date        Method");
        assert_eq!(lines[1], "----------  -----------");
        assert!(lines[2].starts_with("2024-01-01  "));
        assert_eq!(lines[3], "2024-01-02");
    }

    #[test]
    fn wide_and_combining_cells_keep_columns_aligned() {
        let mut t = Table::new(&["Method", "Days"]);
        t.add_row(vec!["Student App".into(), "1".into()]);
        t.add_row(vec!["教师登记".into(), "2".into()]);
        t.add_row(vec!["Cafe\u{301} kiosk".into(), "3".into()]);

        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2], "Student App  1");
        assert_eq!(lines[3], "教师登记     2");
        assert_eq!(lines[4], "Cafe\u{301} kiosk   3");
        for line in &lines[2..] {
            assert_eq!(visible_width(line), 14);
        }
    }

    #[test]
    fn wide_header_sets_the_width() {
        let mut t = Table::new(&["日期", "x"]);
        t.add_row(vec!["a".into(), "b".into()]);
        let out = t.render();
        assert_eq!(out.lines().nth(1), Some("----  -"));
    }

    #[test]
    fn extra_cells_are_dropped() {
        let mut t = Table::new(&["A"]);
        t.add_row(vec!["x".into(), "y".into()]);
        assert!(!t.render().contains('y'));
        assert!(!t.is_empty());
    }
}
