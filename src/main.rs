mod error;
mod parser;
mod retime;
mod serialiser;
mod srt;

use crate::error::RetimeError;
use crate::parser::Parser;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;

fn main() {
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Rescale and clamp SRT subtitle timing for a changed playback speed")]
struct Cli {
    #[arg(value_name = "INPUT", help = "The SRT file to read.")]
    input: PathBuf,
    #[arg(
        value_name = "SPEED",
        help = "Playback-speed multiplier. Every timestamp is divided by this value."
    )]
    speed: String,
    #[arg(value_name = "OUTPUT", help = "The file to write the retimed subtitles to.")]
    output: PathBuf,
    #[arg(
        value_name = "ENDTIME",
        help = "Cutoff in seconds past which no cue may start or end."
    )]
    endtime: String,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let speed = parse_number("SPEED", &cli.speed)?;
    let endtime = parse_number("ENDTIME", &cli.endtime)?;

    let data = std::fs::read_to_string(&cli.input).context(format!(
        "Failed to open input file: '{}'",
        cli.input.display()
    ))?;

    let mut parser = Parser::new();
    let cues = parser.parse(&data).context(format!(
        "Failed to parse SRT file: '{}'",
        cli.input.display()
    ))?;

    // A zero-cue file is fine; it serialises to an empty output.
    let cues = retime::retime(cues, speed, endtime)?;

    serialiser::serialise(cues, &cli.output)
}

fn parse_number(arg: &'static str, value: &str) -> Result<f64> {
    value.parse().map_err(|_| {
        RetimeError::InvalidNumber {
            arg,
            value: value.to_string(),
        }
        .into()
    })
}
