use std::io::Write;
use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ConfigError, ReportConfig};
use crate::output::formatter::{OutputError, write_output};
use crate::output::preview::write_preview;
use crate::output::xlsx::TableSink;
use crate::parser::extract_columns;
use crate::table::{TableError, build_table};
use crate::temporal::TemporalNormalizer;
use crate::transport::{QueryTransport, RpcRequest, TransportError};

/// Key of the success payload in the endpoint's reply.
pub const RESULT_KEY: &str = "result";

/// Terminal failure of a report run.
///
/// Every variant ends the run; nothing is retried and no partial table is written.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// No response could be obtained.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The endpoint answered with a non-2xx status.
    #[error("endpoint returned HTTP {status}")]
    HttpStatus {
        /// Status code.
        status: u16,
        /// Response body.
        body: String,
    },
    /// The body is not JSON.
    #[error("response is not valid JSON: {reason}")]
    MalformedResponse {
        /// Decoder message.
        reason: String,
        /// Raw body.
        body: String,
    },
    /// The reply has no `result` sequence.
    #[error("response has no 'result' sequence")]
    MissingPayload {
        /// Decoded reply.
        response: Value,
    },
    /// The payload could not be turned into a table.
    #[error(transparent)]
    Table(#[from] TableError),
    /// The report file could not be written.
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Written report file.
    pub output_path: PathBuf,
    /// Number of data rows written.
    pub rows: usize,
    /// Header row of the report.
    pub columns: Vec<String>,
    /// Columns converted to the target timezone.
    pub temporal_columns: Vec<String>,
}

/// One query → one spreadsheet.
///
/// Stages run strictly in order: infer column names from the query text, send
/// the query, decode the reply, build the table, normalize temporal columns,
/// write the file. Human-readable progress and failure diagnostics go to the
/// writer passed to [`ReportPipeline::run`].
#[derive(Debug)]
pub struct ReportPipeline<T, S> {
    config: ReportConfig,
    normalizer: TemporalNormalizer,
    transport: T,
    sink: S,
}

impl<T: QueryTransport, S: TableSink> ReportPipeline<T, S> {
    /// Validate `config` and assemble a pipeline.
    pub fn new(config: ReportConfig, transport: T, sink: S) -> Result<Self, PipelineError> {
        config.validate()?;
        let timezone = config.timezone()?;
        let normalizer = TemporalNormalizer::with_classifier(config.classifier(), timezone);
        Ok(Self {
            config,
            normalizer,
            transport,
            sink,
        })
    }

    /// Run once, naming the report after the current local time.
    pub fn run<W: Write + ?Sized>(&self, out: &mut W) -> Result<RunSummary, PipelineError> {
        self.run_at(out, Local::now().naive_local())
    }

    /// Run once, naming the report after `started_at`.
    pub fn run_at<W: Write + ?Sized>(
        &self,
        out: &mut W,
        started_at: NaiveDateTime,
    ) -> Result<RunSummary, PipelineError> {
        let result = self.execute(out, started_at);
        if let Err(error) = &result {
            warn!(%error, "report run failed");
            report_failure(out, error);
        }
        result
    }

    fn execute<W: Write + ?Sized>(
        &self,
        out: &mut W,
        started_at: NaiveDateTime,
    ) -> Result<RunSummary, PipelineError> {
        let columns = extract_columns(&self.config.query);
        debug!(?columns, "inferred column names from query");

        let request = RpcRequest::execute(
            self.config.token.as_str(),
            self.config.query.as_str(),
            self.config.request_id,
        );
        let response = self.transport.send(&request)?;
        if !response.is_success() {
            return Err(PipelineError::HttpStatus {
                status: response.status,
                body: response.body,
            });
        }

        let reply: Value =
            serde_json::from_str(&response.body).map_err(|e| PipelineError::MalformedResponse {
                reason: e.to_string(),
                body: response.body.clone(),
            })?;

        let Some(mut table) = build_table(reply.get(RESULT_KEY), &columns)? else {
            return Err(PipelineError::MissingPayload { response: reply });
        };
        debug!(
            rows = table.row_count(),
            columns = table.column_count(),
            "built table"
        );

        let temporal_columns = self.normalizer.normalize(&mut table);

        let _ = writeln!(out, "Data with corrected timezones:");
        let _ = write_preview(out, &table, self.config.preview_rows);

        let output_path = write_output(
            &self.sink,
            &self.config.resolve_output_dir(),
            &self.config.file_prefix,
            started_at,
            &table,
        )?;

        let _ = writeln!(out, "\nData saved to {}", output_path.display());
        let _ = writeln!(out, "Total rows: {}", table.row_count());

        Ok(RunSummary {
            output_path,
            rows: table.row_count(),
            columns: table.columns().to_vec(),
            temporal_columns,
        })
    }
}

/// Write the human-readable diagnostic for a terminal failure.
///
/// Includes the raw body or decoded reply when one is available.
pub fn report_failure<W: Write + ?Sized>(out: &mut W, error: &PipelineError) {
    let _ = match error {
        PipelineError::HttpStatus { status, body } => {
            writeln!(out, "Request failed with HTTP {status}. Response:\n{body}")
        }
        PipelineError::MalformedResponse { body, .. } => {
            writeln!(out, "Response is not valid JSON. Raw response:\n{body}")
        }
        PipelineError::MissingPayload { response } => writeln!(
            out,
            "No '{RESULT_KEY}' key found or data is not a list. Full response:\n{response}"
        ),
        PipelineError::Transport(e) => writeln!(out, "Could not reach endpoint: {e}"),
        PipelineError::Table(e) => writeln!(out, "Could not build table: {e}"),
        PipelineError::Output(e) => writeln!(out, "Could not save report: {e}"),
        PipelineError::Config(e) => writeln!(out, "{e}"),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::xlsx::XlsxSink;
    use crate::transport::TransportResponse;

    #[derive(Debug)]
    struct FixedTransport(TransportResponse);

    impl QueryTransport for FixedTransport {
        fn send(&self, _request: &RpcRequest) -> Result<TransportResponse, TransportError> {
            Ok(self.0.clone())
        }
    }

    fn pipeline(status: u16, body: &str) -> ReportPipeline<FixedTransport, XlsxSink> {
        let config = ReportConfig::new("http://localhost/sql", "t", "SELECT a, b FROM t")
            .with_output_dir(std::env::temp_dir().join("rpc2xlsx_pipeline_unit"));
        let transport = FixedTransport(TransportResponse {
            status,
            body: body.to_string(),
        });
        ReportPipeline::new(config, transport, XlsxSink::default()).expect("config is valid")
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = ReportConfig::new("http://localhost/sql", "", "SELECT a FROM t");
        let transport = FixedTransport(TransportResponse {
            status: 200,
            body: String::new(),
        });
        let err = ReportPipeline::new(config, transport, XlsxSink::default())
            .expect_err("blank token should be rejected");
        assert!(matches!(
            err,
            PipelineError::Config(ConfigError::Invalid { field: "token", .. })
        ));

        let mut out = Vec::new();
        report_failure(&mut out, &err);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Invalid configuration value for `token`: must not be empty\n"
        );
    }

    #[test]
    fn non_json_body_reports_the_raw_body() {
        let mut out = Vec::new();
        let err = pipeline(200, "<html>maintenance</html>")
            .run(&mut out)
            .expect_err("html is not json");

        assert!(matches!(err, PipelineError::MalformedResponse { .. }));
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Response is not valid JSON. Raw response:"));
        assert!(printed.contains("<html>maintenance</html>"));
    }

    #[test]
    fn positional_width_mismatch_is_terminal() {
        let mut out = Vec::new();
        let err = pipeline(200, r#"{"result": [[1, 2, 3]]}"#)
            .run(&mut out)
            .expect_err("three values for two columns");

        assert!(matches!(err, PipelineError::Table(TableError::RowWidthMismatch { .. })));
        assert!(String::from_utf8(out).unwrap().contains("Could not build table"));
    }
}
