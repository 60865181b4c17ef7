// Command-line interface for restify
//
// This binary drives the restify-convert crate over plain-text PEP files.
//
// The main role of the restify program is to turn PEP source files that still
// use the legacy plain-text layout into reStructuredText, either one file at a
// time or as a batch sweep over a PEP checkout.
//
// Usage:
//  restify convert <input> [--output <file>]  - Convert one document
//  restify batch <dir> [--copy] [--json]      - Convert every plain-text PEP in a checkout
//  restify revert <dir>                       - Restore backed-up originals
//  restify open                               - Open converted PEPs in a browser
//
// Batch behavior:
//
// A batch run scans the checkout for files shaped pep-*.txt that either
// declare a plain-text content type or carry no content-type header, converts
// each one into the configured output directory, and prints a summary. With
// --copy, the shortest conversions are written back over their originals
// after the originals are backed up; revert undoes that.

use restify_cli::batch;

use clap::{Arg, ArgAction, Command, ValueHint};
use restify_config::{Loader, RestifyConfig};
use restify_convert::{convert_file, ConvertError, ConvertOptions};
use std::path::Path;

fn build_cli() -> Command {
    Command::new("restify")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting plain-text PEPs to reStructuredText")
        .long_about(
            "restify is a command-line tool for migrating PEP source files from\n\
            the legacy plain-text layout to reStructuredText.\n\n\
            Commands:\n  \
            - convert: Convert a single document\n  \
            - batch:   Convert every plain-text PEP in a checkout\n  \
            - revert:  Restore backed-up originals overwritten by --copy\n  \
            - open:    Open the rendered pages of converted PEPs\n\n\
            Examples:\n  \
            restify convert pep-0020.txt               # Convert to stdout\n  \
            restify convert pep-0020.txt -o out.txt    # Convert to a file\n  \
            restify batch ~/peps                       # Sweep a checkout\n  \
            restify batch ~/peps --copy                # Also overwrite the shortest original",
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a restify.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a single plain-text PEP to reStructuredText")
                .long_about(
                    "Convert one PEP source file.\n\n\
                    A document that already declares text/x-rst is reported as\n\
                    up to date and left alone. Output goes to stdout by default,\n\
                    or use -o to write a file.\n\n\
                    Examples:\n  \
                    restify convert pep-0020.txt              # Convert to stdout\n  \
                    restify convert pep-0020.txt -o out.txt   # Convert to a file",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("batch")
                .about("Convert every plain-text PEP in a checkout")
                .long_about(
                    "Scan a PEP checkout for files shaped pep-*.txt that are still\n\
                    plain text, convert each one into the output directory, and\n\
                    print a summary sorted by document length.\n\n\
                    With --copy, the shortest conversions (up to the configured\n\
                    copy limit) are written back over their originals after the\n\
                    originals are backed up. Use 'restify revert' to undo that.",
                )
                .arg(
                    Arg::new("dir")
                        .help("Path to the PEP checkout")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("copy")
                        .long("copy")
                        .value_name("N")
                        .help(
                            "Back up and overwrite the N shortest originals with their \
                            conversions (N defaults to the configured copy limit)",
                        )
                        .num_args(0..=1)
                        .default_missing_value("configured"),
                )
                .arg(
                    Arg::new("output-dir")
                        .long("output-dir")
                        .help("Directory for converted documents (overrides configuration)")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("backup-dir")
                        .long("backup-dir")
                        .help("Directory for backed-up originals (overrides configuration)")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Emit the report as JSON instead of text")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("revert")
                .about("Restore backed-up originals overwritten by a --copy run")
                .arg(
                    Arg::new("dir")
                        .help("Path to the PEP checkout")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("backup-dir")
                        .long("backup-dir")
                        .help("Directory holding backed-up originals (overrides configuration)")
                        .value_hint(ValueHint::DirPath),
                ),
        )
        .subcommand(
            Command::new("open")
                .about("Open the rendered pages of converted PEPs")
                .long_about(
                    "Build the rendered-page URL for every backed-up document and\n\
                    open each one in a browser. With --print the URLs are written\n\
                    to stdout instead.",
                )
                .arg(
                    Arg::new("backup-dir")
                        .long("backup-dir")
                        .help("Directory holding backed-up originals (overrides configuration)")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("base-url")
                        .long("base-url")
                        .help("Base URL of the rendered PEP pages (overrides configuration)")
                        .value_hint(ValueHint::Url),
                )
                .arg(
                    Arg::new("print")
                        .long("print")
                        .help("Print the URLs instead of launching a browser")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, output, &config);
        }
        Some(("batch", sub_matches)) => {
            let dir = sub_matches
                .get_one::<String>("dir")
                .expect("dir is required");
            let json = sub_matches.get_flag("json");
            let mut batch_config = config.batch.clone();
            if let Some(output_dir) = sub_matches.get_one::<String>("output-dir") {
                batch_config.output_dir = output_dir.clone();
            }
            if let Some(backup_dir) = sub_matches.get_one::<String>("backup-dir") {
                batch_config.backup_dir = backup_dir.clone();
            }
            let copy = sub_matches
                .get_one::<String>("copy")
                .map(|raw| parse_copy_limit(raw, batch_config.copy_limit));
            handle_batch_command(dir, &batch_config, &(&config.convert).into(), copy, json);
        }
        Some(("revert", sub_matches)) => {
            let dir = sub_matches
                .get_one::<String>("dir")
                .expect("dir is required");
            let mut batch_config = config.batch.clone();
            if let Some(backup_dir) = sub_matches.get_one::<String>("backup-dir") {
                batch_config.backup_dir = backup_dir.clone();
            }
            handle_revert_command(dir, &batch_config);
        }
        Some(("open", sub_matches)) => {
            let mut batch_config = config.batch.clone();
            if let Some(backup_dir) = sub_matches.get_one::<String>("backup-dir") {
                batch_config.backup_dir = backup_dir.clone();
            }
            let base_url = sub_matches
                .get_one::<String>("base-url")
                .cloned()
                .unwrap_or_else(|| config.open.base_url.clone());
            let print = sub_matches.get_flag("print");
            handle_open_command(&batch_config, &base_url, print);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Handle the convert command
fn handle_convert_command(input: &str, output: Option<&str>, config: &RestifyConfig) {
    let options: ConvertOptions = (&config.convert).into();

    let doc = match convert_file(input, &options) {
        Ok(doc) => doc,
        Err(ConvertError::ConversionNotRequired(name)) => {
            eprintln!("{name} is already reStructuredText, nothing to do");
            return;
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    match output {
        Some(path) => {
            restify_convert::output::write_document(path, &doc.text).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => {
            print!("{}", doc.text);
        }
    }
}

/// Handle the batch command
fn parse_copy_limit(raw: &str, configured: usize) -> usize {
    if raw == "configured" {
        return configured;
    }
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid copy count '{raw}'");
        std::process::exit(1);
    })
}

fn handle_batch_command(
    dir: &str,
    batch_config: &restify_config::BatchConfig,
    options: &ConvertOptions,
    copy: Option<usize>,
    json: bool,
) {
    let report = batch::run(Path::new(dir), batch_config, options, copy).unwrap_or_else(|e| {
        eprintln!("Batch error: {e}");
        std::process::exit(1);
    });

    if json {
        let rendered = serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
            eprintln!("Error rendering report: {e}");
            std::process::exit(1);
        });
        println!("{rendered}");
        if !report.failed.is_empty() {
            std::process::exit(1);
        }
        return;
    }

    println!("Found {} PEPs still in plain text", report.found);
    println!();
    println!("{} text PEPs converted :D", report.converted.len());
    for entry in &report.converted {
        println!("  {}, {} lines", entry.summary.name, entry.summary.lines);
    }
    for skipped in &report.skipped {
        println!("  {skipped} already reStructuredText, skipped");
    }

    if !report.failed.is_empty() {
        println!();
        println!("Failed to reSTify {} PEPs :(", report.failed.len());
        for failure in &report.failed {
            println!("  {} because: {} :(", failure.input, failure.error);
        }
    }

    for copied in &report.copied {
        println!("backed up and copied {copied}");
    }

    if !report.failed.is_empty() {
        std::process::exit(1);
    }
}

/// Handle the revert command
fn handle_revert_command(dir: &str, batch_config: &restify_config::BatchConfig) {
    let restored = batch::revert(Path::new(dir), batch_config).unwrap_or_else(|e| {
        eprintln!("Revert error: {e}");
        std::process::exit(1);
    });

    for name in &restored {
        println!("restored {name}");
    }
    println!("{} PEPs restored", restored.len());
}

/// Handle the open command
fn handle_open_command(batch_config: &restify_config::BatchConfig, base_url: &str, print: bool) {
    let urls = batch::page_urls(batch_config, base_url).unwrap_or_else(|e| {
        eprintln!("Error listing backups: {e}");
        std::process::exit(1);
    });

    if urls.is_empty() {
        eprintln!("No backed-up documents to open");
        return;
    }

    if print {
        for url in &urls {
            println!("{url}");
        }
        return;
    }

    open_in_browser(&urls);
}

#[cfg(feature = "browser-open")]
fn open_in_browser(urls: &[String]) {
    const BROWSERS: &[&str] = &["xdg-open", "open", "firefox", "chromium"];

    let Some(browser) = BROWSERS.iter().find_map(|name| which::which(name).ok()) else {
        eprintln!("No browser launcher found; URLs were:");
        for url in urls {
            eprintln!("  {url}");
        }
        std::process::exit(1);
    };

    for url in urls {
        if let Err(e) = std::process::Command::new(&browser).arg(url).status() {
            eprintln!("Error launching '{}': {e}", browser.display());
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "browser-open"))]
fn open_in_browser(urls: &[String]) {
    for url in urls {
        println!("{url}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> RestifyConfig {
    let loader = Loader::new().with_optional_file("restify.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn load_cli_config_falls_back_to_defaults() {
        let config = load_cli_config(None);
        assert_eq!(config.batch.source_prefix, "pep-");
    }

    #[test]
    fn copy_limit_defaults_to_the_configured_value() {
        assert_eq!(parse_copy_limit("configured", 3), 3);
        assert_eq!(parse_copy_limit("5", 3), 5);
    }
}
