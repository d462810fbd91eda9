#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use rpc2xlsx::output::{OutputError, TableSink, XlsxSink};
use rpc2xlsx::table::LabeledTable;
use rpc2xlsx::transport::{QueryTransport, RpcRequest, TransportError, TransportResponse};

pub(crate) fn fixture_dir(fixture: &str) -> PathBuf {
    PathBuf::from("tests/fixtures").join(fixture)
}

pub(crate) fn read_fixture_query(fixture: &str) -> String {
    std::fs::read_to_string(fixture_dir(fixture).join("query.sql"))
        .expect("fixture query should be readable")
}

pub(crate) fn read_fixture_response(fixture: &str) -> String {
    std::fs::read_to_string(fixture_dir(fixture).join("response.json"))
        .expect("fixture response should be readable")
}

pub(crate) fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{nanos}"))
}

pub(crate) fn dir_entries(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.flatten().map(|entry| entry.path()).collect(),
        Err(_) => Vec::new(),
    }
}

/// Cells of the single `Sheet1` worksheet of a written report.
pub(crate) fn read_report_sheet(path: &Path) -> Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("report should open");
    workbook
        .worksheet_range("Sheet1")
        .expect("report should have Sheet1")
}

pub(crate) fn text_cells(names: &[&str]) -> Vec<Data> {
    names
        .iter()
        .map(|name| Data::String((*name).to_string()))
        .collect()
}

/// Transport that answers every request with the same canned reply and
/// remembers what it was sent.
pub(crate) struct StubTransport {
    reply: Result<TransportResponse, String>,
    pub(crate) sent: RefCell<Vec<RpcRequest>>,
}

impl StubTransport {
    pub(crate) fn replying(status: u16, body: impl Into<String>) -> Self {
        Self {
            reply: Ok(TransportResponse {
                status,
                body: body.into(),
            }),
            sent: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl QueryTransport for StubTransport {
    fn send(&self, request: &RpcRequest) -> Result<TransportResponse, TransportError> {
        self.sent.borrow_mut().push(request.clone());
        self.reply.clone().map_err(TransportError::Request)
    }
}

/// Sink that writes a real spreadsheet and keeps a copy of the table.
#[derive(Default)]
pub(crate) struct RecordingSink {
    inner: XlsxSink,
    pub(crate) tables: RefCell<Vec<LabeledTable>>,
}

impl TableSink for RecordingSink {
    fn write_table(&self, table: &LabeledTable, path: &Path) -> Result<(), OutputError> {
        self.tables.borrow_mut().push(table.clone());
        self.inner.write_table(table, path)
    }
}

/// Single-connection HTTP server on the loopback interface.
pub(crate) struct StubServer {
    pub(crate) url: String,
    handle: JoinHandle<String>,
}

impl StubServer {
    /// Answer the first connection with `status_line` and `body`.
    pub(crate) fn replying(status_line: &'static str, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::spawn(move |stream| {
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .expect("stub should write response");
        })
    }

    /// Accept the first connection and stay silent for `delay`.
    pub(crate) fn silent_for(delay: Duration) -> Self {
        Self::spawn(move |_stream| thread::sleep(delay))
    }

    fn spawn<F>(respond: F) -> Self
    where
        F: FnOnce(&mut std::net::TcpStream) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("should bind loopback port");
        let addr = listener.local_addr().expect("listener should have an address");
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("client should connect");
            let request = read_request(&stream);
            respond(&mut stream);
            request
        });
        Self {
            url: format!("http://{addr}/powerbi/sql"),
            handle,
        }
    }

    /// Wait for the server thread and return the raw request body it received.
    pub(crate) fn received_body(self) -> String {
        self.handle.join().expect("stub server should not panic")
    }
}

fn read_request(stream: &std::net::TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .expect("request header should be readable");
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().expect("content length is numeric");
            }
        }
    }
    let mut body = vec![0u8; content_length];
    reader
        .read_exact(&mut body)
        .expect("request body should be readable");
    String::from_utf8(body).expect("request body should be UTF-8")
}

/// Client that ignores proxy settings from the environment.
pub(crate) fn loopback_client(timeout: Duration) -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .no_proxy()
        .timeout(timeout)
        .build()
        .expect("client should build")
}
