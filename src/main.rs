use clap::Parser;
use pagescript::{EngineConfig, Interpreter, PipelineError, RenderReport, RunState};
use std::path::PathBuf;
use std::process::ExitCode;

/// Renders a pagescript document to PDF.
#[derive(Parser)]
#[command(name = "pagescript", version, about = "Render a pagescript document to PDF")]
struct Cli {
    /// The document to interpret
    input: PathBuf,

    /// Write the PDF to this exact path instead of `<title>.pdf`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for the generated PDF
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// JSON engine configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log every instruction as it runs
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli) {
        Ok(report) => {
            print_report(&report);
            if report.final_state == RunState::NoPages {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<RenderReport, PipelineError> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(dir) = cli.output_dir {
        config = config.with_output_dir(dir);
    }

    let mut interpreter = Interpreter::new(config);
    if let Some(output) = cli.output {
        interpreter = interpreter.with_output_path(output);
    }
    interpreter.run_file(&cli.input)
}

fn print_report(report: &RenderReport) {
    for diagnostic in report.diagnostics.iter() {
        eprintln!("warning: {diagnostic}");
    }
    match &report.output_path {
        Some(path) => println!(
            "Wrote {} ({} page{})",
            path.display(),
            report.page_count,
            if report.page_count == 1 { "" } else { "s" }
        ),
        None => println!("No pages to render, nothing written"),
    }
}
