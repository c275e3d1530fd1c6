use std::path::Path;

use anyhow::Result;
use clap::ArgMatches;
use log::{error, info};

fn file_ok(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.len() > 0)
}

fn dir_ok(path: &Path) -> bool {
    match std::fs::read_dir(path) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .any(|e| e.path().is_file()),
        Err(_) => false,
    }
}

///
/// Returns `false` if any expected output is missing or empty. Every path is
/// checked so all failures get reported in one run.
///
pub fn run_verify(matches: &ArgMatches) -> Result<bool> {
    let mut ok = true;

    for file in matches.get_many::<String>("file").into_iter().flatten() {
        if file_ok(Path::new(file)) {
            info!("OK {file}");
        } else {
            error!("Missing or empty file: {file}");
            ok = false;
        }
    }

    for dir in matches.get_many::<String>("dir").into_iter().flatten() {
        if dir_ok(Path::new(dir)) {
            info!("OK {dir}/");
        } else {
            error!("Missing or empty directory: {dir}");
            ok = false;
        }
    }

    Ok(ok)
}
