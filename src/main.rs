use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::ProgressBar;

use png2jpg::cli::Args;
use png2jpg::conversion::{ConversionEngine, ConversionEvent, ConversionSummary};
use png2jpg::json_output::{self, JsonMessage};
use png2jpg::report::{self, LineKind, LogLine};
use png2jpg::utils::{create_progress_bar, format_duration, verbose_println};

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "warn,png2jpg=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn print_line(line: &LogLine) {
    match line.kind {
        LineKind::Info => println!("{}", line.text),
        LineKind::Warning => println!("{} {}", style("Warning:").yellow().bold(), line.text),
        LineKind::Error => println!("{} {}", style("Error:").red().bold(), line.text),
    }
}

/// Text mode: header, one line per file, summary
fn run_text(args: &Args, engine: &ConversionEngine) -> Result<ConversionSummary> {
    for line in report::header_lines(engine.config()) {
        println!("{}", line);
    }
    println!("{}", report::separator());

    let pb = if args.progress {
        create_progress_bar(0)
    } else {
        ProgressBar::hidden()
    };

    let summary = engine.run(|event| match event {
        ConversionEvent::Discovered { candidates } => {
            pb.set_length(*candidates as u64);
            pb.suspend(|| {
                verbose_println(args.verbose, &format!("Found {} candidates", candidates))
            });
        }
        ConversionEvent::File(file) => {
            pb.suspend(|| print_line(&report::event_line(file)));
            pb.set_message(file.source_name());
            pb.inc(1);
        }
    })?;
    pb.finish_and_clear();

    println!("{}", report::separator());
    println!("{}", style(report::summary_line(&summary)).bold());
    if let Some(line) = report::failure_line(&summary) {
        println!("{}", style(line).red());
    }

    verbose_println(
        args.verbose,
        &format!(
            "Total processing time: {}",
            format_duration(summary.elapsed)
        ),
    );

    if args.report && !summary.events.is_empty() {
        println!();
        report::build_table(&summary).printstd();
    }

    Ok(summary)
}

/// JSON mode: config, engine events and summary as JSON lines
fn run_json(engine: &ConversionEngine) -> Result<ConversionSummary> {
    JsonMessage::Config(engine.config()).emit();
    let summary = engine.run(json_output::emit_event)?;
    JsonMessage::Summary(&summary).emit();
    Ok(summary)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Configuration errors abort before any file is touched
    let result = args
        .to_config()
        .and_then(ConversionEngine::new)
        .map_err(anyhow::Error::from)
        .and_then(|engine| {
            if args.json_progress {
                run_json(&engine)
            } else {
                run_text(&args, &engine)
            }
        });

    if let Err(err) = &result {
        if args.json_progress {
            JsonMessage::Error {
                message: err.to_string(),
            }
            .emit();
        }
    }

    // Per-file failures are reported but do not change the exit status
    result.map(|_| ())
}
