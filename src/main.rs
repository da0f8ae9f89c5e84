use agmip2monica::cli::{self, Args};
use agmip2monica::constants::EXIT_FAILURE;
use std::process;

fn main() {
    // Parse command line arguments, accepting -filename/-out
    let (args, ignored) = Args::parse_legacy();

    cli::setup_logging(&args);

    match cli::run(&args, &ignored) {
        Ok(stats) => {
            cli::print_summary(&stats);
            process::exit(0);
        }
        Err(error) => {
            // Single catch point for every failed run
            eprintln!("An error occurred:");
            eprintln!("{:#}", error);
            process::exit(EXIT_FAILURE);
        }
    }
}
