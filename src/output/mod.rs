mod exports;
mod styling;
mod summary;
mod tables;

pub use exports::export_json;
pub use styling::{dim, magenta_bold};
pub use summary::print_summary;

/// Prints the `boardgraph` banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🕸 boardgraph"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("GitHub Projects → knowledge graph")
    );
}
