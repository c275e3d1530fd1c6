use clap::{Command, arg};

pub const PANEL_CMD: &str = "panel";
pub const DEFAULT_OUT: &str = "cardiac_genes.bed";

pub fn create_panel_cli() -> Command {
    Command::new(PANEL_CMD)
        .about("Write the built-in cardiac gene panel as BED (gzipped if the path ends in .gz).")
        .arg(arg!(--output <output> "Output BED path").default_value(DEFAULT_OUT))
}
