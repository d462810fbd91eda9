//! CLI entry point for `rpc2xlsx`.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use rpc2xlsx::config::{ConfigError, ReportConfig};
use rpc2xlsx::output::XlsxSink;
use rpc2xlsx::pipeline::{PipelineError, ReportPipeline, report_failure};
use rpc2xlsx::transport::HttpTransport;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "rpc2xlsx",
    about = "Run an analytics query over JSON-RPC and save the result as a spreadsheet"
)]
struct Cli {
    /// JSON run configuration
    #[arg(long, default_value = "report.json")]
    config: PathBuf,

    /// Read the SQL query from this file instead of the configuration
    #[arg(long)]
    query_file: Option<PathBuf>,

    /// Output directory (defaults to the executable's directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print verbose diagnostics
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let pipeline = match setup(cli) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            report_failure(&mut std::io::stdout().lock(), &e);
            process::exit(2);
        }
    };

    let outcome = pipeline.run(&mut std::io::stdout().lock());
    if outcome.is_err() {
        process::exit(2);
    }
}

fn setup(cli: Cli) -> Result<ReportPipeline<HttpTransport, XlsxSink>, PipelineError> {
    let mut config = ReportConfig::load(&cli.config)?;

    if let Some(path) = cli.query_file {
        let query = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path, source })?;
        config = config.with_query(query);
    }
    if let Some(dir) = cli.output_dir {
        config = config.with_output_dir(dir);
    }

    let transport = HttpTransport::new(config.endpoint.clone(), config.timeout())?;
    ReportPipeline::new(config, transport, XlsxSink::default())
}
