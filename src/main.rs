use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use log::{error, info};
use simplelog::{LevelFilter, WriteLogger};

use corpusmark::config::ConvertOptions;
use corpusmark::convert::{convert_file, corpus_tag_inventory, expand_inputs, output_path};
use corpusmark::panic_handler;

const USAGE: &str = "Usage: corpusmark [--config FILE] [--width N] [--out DIR] [--log FILE] [--tags] PATH...";

struct Args {
    config: Option<String>,
    width: Option<usize>,
    out_dir: Option<PathBuf>,
    log_file: String,
    list_tags: bool,
    inputs: Vec<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        width: None,
        out_dir: None,
        log_file: "corpusmark.log".to_string(),
        list_tags: false,
        inputs: Vec::new(),
    };

    let mut raw = std::env::args().skip(1);
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--config" => args.config = Some(raw.next().context(USAGE)?),
            "--width" => {
                let value = raw.next().context(USAGE)?;
                args.width = Some(
                    value
                        .parse()
                        .with_context(|| format!("Invalid --width value: {value}"))?,
                );
            }
            "--out" => args.out_dir = Some(PathBuf::from(raw.next().context(USAGE)?)),
            "--log" => args.log_file = raw.next().context(USAGE)?,
            "--tags" => args.list_tags = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("Unknown option {flag}\n{USAGE}"),
            path => args.inputs.push(PathBuf::from(path)),
        }
    }

    if args.inputs.is_empty() {
        bail!(USAGE);
    }
    Ok(args)
}

fn main() -> Result<ExitCode> {
    panic_handler::initialize_panic_handler();
    let args = parse_args()?;

    // Initialize logging with html5ever DEBUG logs filtered out
    WriteLogger::init(
        LevelFilter::Debug,
        simplelog::ConfigBuilder::new()
            .set_max_level(LevelFilter::Debug)
            .add_filter_ignore_str("html5ever")
            .build(),
        File::create(&args.log_file)
            .with_context(|| format!("Failed to create log file {}", args.log_file))?,
    )?;

    let mut options = ConvertOptions::load_or_default(args.config.as_deref());
    if let Some(width) = args.width {
        options.wrap_width = width;
    }

    let files = expand_inputs(&args.inputs).context("Failed to read input directory")?;
    info!("Processing {} files", files.len());

    if args.list_tags {
        return list_tags(&files);
    }

    if let Some(out_dir) = &args.out_dir {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    }

    let mut failures = 0;
    for file in &files {
        if let Err(err) = convert_one(file, args.out_dir.as_deref(), &options) {
            error!("{}: {err:?}", file.display());
            eprintln!("{}: {err:#}", file.display());
            failures += 1;
        }
    }

    info!("Converted {} of {} files", files.len() - failures, files.len());
    if failures > 0 {
        eprintln!("{failures} of {} files failed", files.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn convert_one(
    file: &Path,
    out_dir: Option<&Path>,
    options: &ConvertOptions,
) -> Result<()> {
    let markdown = convert_file(file, options)
        .with_context(|| format!("Failed to convert {}", file.display()))?;

    match out_dir {
        Some(dir) => {
            let target = output_path(file, dir);
            fs::write(&target, markdown)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            info!("Wrote {}", target.display());
        }
        None => print!("{markdown}"),
    }
    Ok(())
}

fn list_tags(files: &[PathBuf]) -> Result<ExitCode> {
    let inventory = corpus_tag_inventory(files);

    for (file, err) in &inventory.failures {
        error!("{}: {err:?}", file.display());
        eprintln!("{}: {err}", file.display());
    }

    for tag in &inventory.tags {
        let marker = if corpusmark::parsing::vocabulary::is_recognized(tag) {
            ' '
        } else {
            '!'
        };
        println!("{marker} {tag}");
    }

    if !inventory.failures.is_empty() {
        eprintln!(
            "{} of {} files could not be read",
            inventory.failures.len(),
            files.len()
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
