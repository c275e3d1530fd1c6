mod annotate;
mod expression;
mod features;
mod inspect;
mod panel;
mod predict;
mod relabel;
mod subset;
mod verify;

use anyhow::Result;
use clap::{ArgAction, ArgMatches, Command, arg};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "cardiovar";
    pub const VERBOSE_FLAG: &str = "verbose";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("cardiovar developers")
        .about("Turn annotated variants into pathogenicity features and prepare the reference resources they are annotated from.")
        .subcommand_required(true)
        .arg(
            arg!(-v --verbose "Log debug messages")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(features::cli::create_features_cli())
        .subcommand(relabel::cli::create_relabel_cli())
        .subcommand(subset::cli::create_subset_cli())
        .subcommand(inspect::cli::create_inspect_cli())
        .subcommand(expression::cli::create_expression_cli())
        .subcommand(predict::cli::create_predict_cli())
        .subcommand(annotate::cli::create_annotate_cli())
        .subcommand(verify::cli::create_verify_cli())
        .subcommand(panel::cli::create_panel_cli())
}

fn init_logging(matches: &ArgMatches) {
    let level = match matches.get_flag(consts::VERBOSE_FLAG) {
        true => "debug",
        false => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();
    init_logging(&matches);

    match matches.subcommand() {
        //
        // FEATURE TABLE
        //
        Some((features::cli::FEATURES_CMD, matches)) => {
            features::handlers::run_features(matches)?;
        }

        Some((relabel::cli::RELABEL_CMD, matches)) => {
            relabel::handlers::run_relabel(matches)?;
        }

        //
        // REFERENCE SUBSET
        //
        Some((subset::cli::SUBSET_CMD, matches)) => {
            let status = subset::handlers::run_subset(matches)?;
            if status != 0 {
                std::process::exit(status);
            }
        }

        //
        // ANNOTATION
        //
        Some((inspect::cli::INSPECT_CMD, matches)) => {
            inspect::handlers::run_inspect(matches)?;
        }

        Some((annotate::cli::ANNOTATE_CMD, matches)) => {
            annotate::handlers::run_annotate(matches)?;
        }

        //
        // EXPRESSION
        //
        Some((expression::cli::EXPRESSION_CMD, matches)) => {
            expression::handlers::run_expression(matches)?;
        }

        //
        // SCORING
        //
        Some((predict::cli::PREDICT_CMD, matches)) => {
            predict::handlers::run_predict(matches)?;
        }

        //
        // HOUSEKEEPING
        //
        Some((verify::cli::VERIFY_CMD, matches)) => {
            if !verify::handlers::run_verify(matches)? {
                std::process::exit(1);
            }
        }

        Some((panel::cli::PANEL_CMD, matches)) => {
            panel::handlers::run_panel(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
