use clap::{ArgAction, Command, arg};

pub const VERIFY_CMD: &str = "verify";

pub fn create_verify_cli() -> Command {
    Command::new(VERIFY_CMD)
        .about("Check that expected output files and directories exist and are not empty.")
        .arg(arg!(--file <file> "File that must exist and be non-empty").action(ArgAction::Append))
        .arg(arg!(--dir <dir> "Directory that must contain at least one file").action(ArgAction::Append))
}
