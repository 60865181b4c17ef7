use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the CLI surface from src/main.rs
// Build scripts can't access src/ modules, so the shape is duplicated here.
fn completion_cli() -> Command {
    Command::new("restify")
        .about("A tool for converting plain-text PEPs to reStructuredText")
        .arg(
            Arg::new("config")
                .long("config")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .arg(Arg::new("input").required(true).value_hint(ValueHint::FilePath))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("batch")
                .arg(Arg::new("dir").required(true).value_hint(ValueHint::DirPath))
                .arg(Arg::new("copy").long("copy").num_args(0..=1))
                .arg(Arg::new("output-dir").long("output-dir").value_hint(ValueHint::DirPath))
                .arg(Arg::new("backup-dir").long("backup-dir").value_hint(ValueHint::DirPath))
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("revert")
                .arg(Arg::new("dir").required(true).value_hint(ValueHint::DirPath))
                .arg(Arg::new("backup-dir").long("backup-dir").value_hint(ValueHint::DirPath)),
        )
        .subcommand(
            Command::new("open")
                .arg(Arg::new("backup-dir").long("backup-dir").value_hint(ValueHint::DirPath))
                .arg(Arg::new("base-url").long("base-url").value_hint(ValueHint::Url))
                .arg(Arg::new("print").long("print").action(ArgAction::SetTrue)),
        )
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = completion_cli();

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "restify", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "restify", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "restify", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
