//! Entry point for the `odata-query` inspector.

use std::io::{self, Write};

use clap::Parser;
use odata_query_cli::cli::{Cli, run};
use odata_query_cli::config::CliConfig;
use odata_query_cli::error::{EXIT_CONFIG, exit_code};
use odata_query_cli::logging::init_logging;

fn main() {
    let cli = Cli::parse();

    let config = match cli.config() {
        Ok(config) => config,
        Err(e) => {
            init_logging(&CliConfig::default());
            tracing::error!(error = %e, "failed to load configuration");
            std::process::exit(EXIT_CONFIG);
        }
    };

    init_logging(&config);

    let mut stdout = io::stdout().lock();
    let outcome = run(&cli, &config, &mut stdout).and_then(|()| Ok(stdout.flush()?));
    if let Err(report) = outcome {
        tracing::error!(
            option = cli.command.option_name(),
            error = %report,
            "query option rejected"
        );
        std::process::exit(exit_code(&report));
    }
}
