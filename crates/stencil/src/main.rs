use std::io;
use std::process::ExitCode;

use clap::Parser;
use stencil::{logging, run, Cli};
use stencil_input::RealStdin;
use stencil_render::RealEnv;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let stdout = io::stdout();
    match run(&cli, &RealStdin, RealEnv, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", console::style("error:").red().bold().for_stderr(), err);
            ExitCode::FAILURE
        }
    }
}
