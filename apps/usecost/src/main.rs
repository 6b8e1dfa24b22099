use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::{debug, info};
use std::{
    fs::File,
    io::{BufWriter, Write},
    time::Instant,
};
use usecost_analyzer::{Config, OutputFormat};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cfg = Config::parse();
    debug!("Parsed CLI arguments: {:?}", cfg);

    let start = Instant::now();
    let format = cfg.format;
    let output = cfg.output.clone();

    info!(
        "Running import cost analysis (format: {:?}, concurrency: {}, cache: {})",
        format,
        cfg.concurrency,
        if cfg.no_cache { "off" } else { "on" }
    );
    let result = usecost_analyzer::run_import_cost_analysis(cfg)?;
    debug!("Measured {} unique imports", result.imports.len());

    match &output {
        Some(path) => {
            colored::control::set_override(false);
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            usecost_analyzer::render(&mut writer, format, &result)?;
            colored::control::unset_override();

            writeln!(stdout, "{} Report written to {}", "✓".green().bold(), path.display())?;
        }
        None => usecost_analyzer::render(&mut stdout, format, &result)?,
    }

    // JSON and HTML on stdout stay free of trailing chatter
    if output.is_some() || format == OutputFormat::Table {
        writeln!(
            stdout,
            "\n{} Finished in {}ms on {} imports from {} packages.",
            "●".bright_blue(),
            start.elapsed().as_millis().to_string().cyan(),
            result.imports.len().to_string().cyan(),
            result.summary.total_packages.to_string().cyan()
        )?;
    }
    stdout.flush()?;

    Ok(())
}
