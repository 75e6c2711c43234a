//! Header-keyed rows from delimited text.

use std::path::Path;

use anyhow::{bail, Context, Result};

/// One data line, cells keyed by header column in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    line: usize,
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new(line: usize, cells: Vec<(String, String)>) -> Self {
        Self { line, cells }
    }

    /// 1-based line of the source text this row was read from.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// `;` when the header contains one, otherwise `,`.
pub fn detect_delimiter(header: &str) -> char {
    if header.contains(';') {
        ';'
    } else {
        ','
    }
}

/// Splits one line. Double quotes toggle a quoted section in which the
/// delimiter is literal; the quotes themselves are dropped. A trailing empty
/// cell is not emitted.
pub fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    for ch in line.chars() {
        match ch {
            '"' => quoted = !quoted,
            c if c == delimiter && !quoted => cells.push(std::mem::take(&mut cell)),
            c => cell.push(c),
        }
    }
    if !cell.is_empty() {
        cells.push(cell);
    }
    cells
}

/// Parses `text` with its first line as header.
///
/// A leading byte-order mark and carriage returns are removed; blank lines are
/// skipped. Cells beyond the header width are ignored and missing trailing
/// cells are simply absent from the row.
pub fn parse_rows(text: &str, delimiter: Option<char>) -> Result<Vec<Row>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text).replace('\r', "");
    let mut lines = text.lines().zip(1..);
    let Some((header, _)) = lines.next().filter(|(h, _)| !h.trim().is_empty()) else {
        bail!("input has no header line");
    };

    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(header));
    let columns = split_line(header, delimiter);

    Ok(lines
        .filter(|(line, _)| !line.trim().is_empty())
        .map(|(line, number)| {
            let cells = columns
                .iter()
                .cloned()
                .zip(split_line(line, delimiter))
                .collect();
            Row::new(number, cells)
        })
        .collect())
}

pub fn read_rows(path: &Path, delimiter: Option<char>) -> Result<Vec<Row>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_rows(&text, delimiter).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semicolon_header_selects_semicolon() {
        let rows = parse_rows("a;b;c\n1;2;3\n", None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("b"), Some("2"));
    }

    #[test]
    fn comma_is_the_fallback() {
        let rows = parse_rows("location_id,key2\nasd,asd2\nqwe,qwe2", None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("location_id"), Some("qwe"));
    }

    #[test]
    fn quotes_protect_delimiters() {
        let cells = split_line(r#""Main St, 4",Stockholm"#, ',');
        assert_eq!(cells, ["Main St, 4", "Stockholm"]);
    }

    #[test]
    fn bom_and_carriage_returns_are_stripped() {
        let rows = parse_rows("\u{feff}id;name\r\n7;Centrum\r\n\r\n", None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id"), Some("7"));
        assert_eq!(rows[0].get("name"), Some("Centrum"));
    }

    #[test]
    fn rows_remember_their_source_line() {
        let rows = parse_rows("a;b\n1;2\n\n\n3;4\n", None).unwrap();
        let lines: Vec<_> = rows.iter().map(Row::line).collect();
        assert_eq!(lines, [2, 5]);
    }

    #[test]
    fn short_rows_leave_columns_absent() {
        let rows = parse_rows("a;b;c\n1;2;\n", None).unwrap();
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0].get("c"), None);
    }

    #[test]
    fn explicit_delimiter_wins() {
        let rows = parse_rows("a|b\n1|2\n", Some('|')).unwrap();
        assert_eq!(rows[0].get("a"), Some("1"));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(parse_rows("", None).is_err());
        assert!(parse_rows("\n\n", None).is_err());
    }
}
