//! Comparative result table rendering: rescaling, minimum highlighting,
//! heat-map bucketing, grouped rows, and LaTeX emission.

mod build;
pub mod format;
mod latex;
mod pareto;

pub use build::{
    build_table, Cell, ColumnKind, ColumnSpec, FormattedTable, GroupLabel, TableOptions, TableRow,
};
pub use latex::render_latex;
pub use pareto::render_pareto_table;
