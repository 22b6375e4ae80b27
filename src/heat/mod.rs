pub mod aggregate;
pub mod exec;
pub mod grid;
pub mod output;

pub use aggregate::aggregate;
pub use exec::exec;
pub use grid::{GridCell, HeatGrid, Window};
pub use output::{grid_output, output_grid, output_json, output_ndjson, render_grid};
