use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

/// Replays a recorded gesture script on a blank canvas and saves the result.
#[derive(Parser, Debug)]
#[command(name = "easel", version, about = "Headless gesture replay for the easel canvas")]
struct CliArgs {
    /// Gesture script (JSON) to replay.
    #[arg(value_name = "SCRIPT.json")]
    script: PathBuf,

    /// Output file. The extension picks the format: png, jpg, gif or easel.
    /// Anything else is written as png.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let result = easel::run(&args.script, &args.output)
        .with_context(|| format!("failed to replay {}", args.script.display()));

    match result {
        Ok(saved) => {
            println!("{}", saved.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("easel: {err:#}");
            ExitCode::FAILURE
        }
    }
}
