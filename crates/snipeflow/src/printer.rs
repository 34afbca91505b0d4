//! ターミナル向けの表出力

use colored::Colorize;
use serde_json::Value;
use snipeflow_core::{Table, field};

const GAP: &str = "  ";

fn cell(value: &Value) -> String {
    field::display(value)
}

fn width(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

/// 各列の表示幅（見出しとセルの最大文字数）
fn column_widths(table: &Table) -> Vec<usize> {
    let mut widths: Vec<usize> = table.headings.iter().map(|h| width(h)).collect();
    for row in &table.rows {
        for (i, value) in row.iter().enumerate() {
            let w = width(&cell(value));
            match widths.get_mut(i) {
                Some(current) => *current = (*current).max(w),
                None => widths.push(w),
            }
        }
    }
    widths
}

fn join_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(c, w)| pad(c, *w))
        .collect::<Vec<_>>()
        .join(GAP)
        .trim_end()
        .to_string()
}

/// 色なしで行を組み立てる（見出し、区切り線、データ行、合計）
pub fn render(table: &Table) -> Vec<String> {
    let widths = column_widths(table);
    let mut lines = Vec::new();

    if !table.headings.is_empty() {
        lines.push(join_row(&table.headings, &widths));
        let total = widths.iter().sum::<usize>() + GAP.len() * widths.len().saturating_sub(1);
        lines.push("─".repeat(total));
    }
    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(cell).collect();
        lines.push(join_row(&cells, &widths));
    }
    lines.push(format!("Total: {}", table.len()));
    lines
}

pub fn print_table(table: &Table) {
    if let Some(title) = &table.title {
        println!("{}", title.cyan().bold());
    }
    let has_headings = !table.headings.is_empty();
    for (i, line) in render(table).into_iter().enumerate() {
        if has_headings && i == 0 {
            println!("{}", line.bold());
        } else if has_headings && i == 1 {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }
    if table.is_empty() {
        println!("{}", "(該当なし)".dimmed());
    }
    println!();
}

pub fn print_tables(tables: &[Table]) {
    if tables.is_empty() {
        println!("{}", "(なし)".dimmed());
        return;
    }
    for table in tables {
        print_table(table);
    }
}

/// 資産の詳細ページ URL
pub fn deep_link(base_url: &str, id: &Value) -> String {
    format!("{}hardware/{}", base_url, cell(id))
}

pub fn print_link(base_url: &str, id: &Value) {
    println!("Link: {}", deep_link(base_url, id).underline());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Table {
        let mut table = Table::new(&["ID", "Username"]);
        table.rows.push(vec![json!(10), json!("alice")]);
        table.rows.push(vec![json!(7), Value::Null]);
        table
    }

    #[test]
    fn test_render_aligns_columns() {
        let lines = render(&sample());
        assert_eq!(lines[0], "ID  Username");
        assert_eq!(lines[1], "─".repeat(12));
        assert_eq!(lines[2], "10  alice");
        assert_eq!(lines[3], "7");
        assert_eq!(lines[4], "Total: 2");
    }

    #[test]
    fn test_render_empty_table() {
        let table = Table::new(&["Asset Tag"]);
        let lines = render(&table);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "─".repeat("Asset Tag".len()));
        assert_eq!(lines[2], "Total: 0");
    }

    #[test]
    fn test_render_multibyte_width() {
        let mut table = Table::new(&["Name"]);
        table.rows.push(vec![json!("営業用")]);
        table.rows.push(vec![json!("x")]);
        let lines = render(&table);
        assert_eq!(lines[0], "Name");
        assert_eq!(lines[2], "営業用");
    }

    #[test]
    fn test_deep_link() {
        assert_eq!(
            deep_link("https://snipeit.example.org/", &json!(42)),
            "https://snipeit.example.org/hardware/42"
        );
    }
}
