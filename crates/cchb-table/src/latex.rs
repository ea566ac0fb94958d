//! LaTeX emission for decorated tables.
//!
//! Only the structural contract is owned here: booktabs rules, `\multirow`
//! group labels, `\bfseries` minima, and `\cellcolor` heat fills. Column
//! headers are caller-supplied preamble text.

use std::fmt::Write as _;

use crate::build::FormattedTable;

/// Emits the table body between a caller-supplied preamble (everything up
/// to and including the header rows) and the closing rules.
pub fn render_latex(table: &FormattedTable, preamble: &str, color: &str) -> String {
    let mut out = String::new();
    out.push_str(preamble);
    if !preamble.ends_with('\n') {
        out.push('\n');
    }
    for row in &table.rows {
        if let Some(group) = &row.group {
            out.push_str("\\midrule\n");
            let _ = write!(
                out,
                "\\multirow{{{}}}{{*}}{{\\begin{{sideways}}{} \\end{{sideways}}}}",
                group.span, group.text
            );
        }
        for cell in &row.cells {
            out.push_str(" & ");
            if let Some(fill) = cell.fill {
                let _ = write!(out, "\\cellcolor{{{color}!{fill}}}");
            }
            if cell.bold {
                let _ = write!(out, "\\bfseries{{{}}}", cell.text);
            } else {
                out.push_str(&cell.text);
            }
        }
        out.push_str("\\\\\n");
    }
    out.push_str("\\bottomrule\n\\end{tabular}\n");
    out
}

#[cfg(test)]
mod tests {
    use crate::build::{Cell, FormattedTable, GroupLabel, TableRow};

    #[test]
    fn group_rows_open_with_midrule_and_multirow() {
        let table = FormattedTable {
            rows: vec![TableRow {
                group: Some(GroupLabel {
                    text: "Col".to_string(),
                    span: 2,
                }),
                cells: vec![
                    Cell {
                        text: "F3".to_string(),
                        bold: false,
                        fill: None,
                    },
                    Cell {
                        text: "1,234".to_string(),
                        bold: true,
                        fill: Some(100),
                    },
                ],
            }],
        };
        let latex = super::render_latex(&table, "\\begin{tabular}{lrr}\n\\toprule", "cyan");
        assert!(latex.contains("\\multirow{2}{*}{\\begin{sideways}Col \\end{sideways}}"));
        assert!(latex.contains("\\cellcolor{cyan!100}\\bfseries{1,234}"));
        assert!(latex.ends_with("\\bottomrule\n\\end{tabular}\n"));
    }
}
