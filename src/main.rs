use clap::Parser;
use std::io::{IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use dataconv::cli::{handle_error, Args, CliConfig, CliUtils};
use dataconv::conversion::batch::{self, BatchOptions};
use dataconv::{Conversion, ConversionError, ConversionRequest, Converter, InputSource};

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    init_logging(&args);

    let config = match CliConfig::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            handle_error(&e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&config) {
        match e.downcast_ref::<ConversionError>() {
            Some(error) => handle_error(error),
            None => CliUtils::show_error(&format!("{:#}", e)),
        }
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(args: &Args) {
    let filter = if args.verbose { "debug" } else { "error" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();
}

fn run(config: &CliConfig) -> Result<()> {
    let args = &config.args;

    if let Some(data) = &args.data {
        convert_single(InputSource::inline(data.as_str()), config)
    } else if args.stdin {
        convert_single(InputSource::from_stdin()?, config)
    } else if let Some(input) = &args.input {
        if input.is_dir() {
            convert_directory(input, config)
        } else if input.is_file() {
            convert_single(InputSource::from_path(input)?, config)
        } else {
            Err(anyhow::anyhow!("Input path does not exist: {}", input.display()))
        }
    } else {
        Err(anyhow::anyhow!(
            "No input provided. Use --data, --stdin or provide an input path"
        ))
    }
}

fn convert_single(source: InputSource, config: &CliConfig) -> Result<()> {
    let args = &config.args;
    let converter = Converter::new(config.conversion_config.clone())?;

    let mut request = ConversionRequest::new(source, args.to);
    request.input_format = args.from;
    let input_size = request.source.len();

    let conversion = converter.convert(&request)?;

    // Output result
    if let Some(output_path) = &args.output {
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(output_path, conversion.bytes())
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        CliUtils::show_success(
            &format!(
                "Converted {} ({}) to {}",
                config.input_description(),
                conversion.source_format,
                config.output_description()
            ),
            config.is_quiet(),
        );
    } else {
        write_stdout(&conversion, config.is_quiet())?;
    }

    // Output statistics if requested
    if config.want_stats() {
        output_statistics(&conversion, input_size);
    }

    Ok(())
}

fn write_stdout(conversion: &Conversion, quiet: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();

    if !conversion.artifact.format().is_textual() && stdout.is_terminal() {
        CliUtils::show_warning(
            &format!(
                "Refusing to print {} bytes to a terminal; use -o {}",
                conversion.artifact.format(),
                conversion.filename()
            ),
            quiet,
        );
        return Ok(());
    }

    stdout.write_all(conversion.bytes())?;
    if conversion.artifact.as_text().is_some_and(|text| !text.ends_with('\n')) {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

fn convert_directory(input_dir: &Path, config: &CliConfig) -> Result<()> {
    let args = &config.args;
    let output_dir = args
        .output
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Output directory required for directory conversion"))?;

    // Create output directory
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let total = batch::discover(input_dir, args.recursive)?.len();
    if total == 0 {
        CliUtils::show_warning(
            &format!("No supported input files found in {}", input_dir.display()),
            config.is_quiet(),
        );
        return Ok(());
    }

    let converter = Converter::new(config.conversion_config.clone())?;
    let options = BatchOptions {
        recursive: args.recursive,
        continue_on_error: config.continue_on_error(),
        input_format: args.from,
    };

    let progress = (!config.is_quiet()).then(|| CliUtils::create_progress_bar(total as u64));
    let started = std::time::Instant::now();

    let result = batch::convert_directory(
        &converter,
        input_dir,
        output_dir,
        args.to,
        &options,
        |file| {
            if let Some(pb) = &progress {
                pb.set_message(file.display().to_string());
                pb.inc(1);
            }
        },
    );

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }
    let report = result?;

    for (file, error) in &report.failed {
        CliUtils::show_error(&format!("{}: {}", file.display(), error.user_message()));
    }

    CliUtils::show_success(
        &format!(
            "Converted {}/{} files into {} in {}",
            report.converted.len(),
            report.total(),
            output_dir.display(),
            CliUtils::format_duration(started.elapsed())
        ),
        config.is_quiet(),
    );

    if config.want_stats() {
        eprintln!("Cache hits: {}", report.cache_hits);
    }

    Ok(())
}

fn output_statistics(conversion: &Conversion, input_size: usize) {
    eprintln!("\nConversion Statistics:");
    eprintln!("Input format: {}", conversion.source_format);
    eprintln!("Output format: {}", conversion.artifact.format());
    eprintln!("Input size: {}", CliUtils::format_file_size(input_size as u64));
    eprintln!(
        "Output size: {}",
        CliUtils::format_file_size(conversion.bytes().len() as u64)
    );
    eprintln!("Cache hit: {}", conversion.cache_hit);
    eprintln!(
        "Processing time: {}",
        CliUtils::format_duration(conversion.elapsed)
    );
}
