//! Logger module
//!
//! Writes access and error lines to stdout/stderr or to configured log
//! files. Access lines use the Common Log Format.

use crate::config::Config;
use chrono::{DateTime, Local};
use hyper::Method;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

/// Thread-safe log writer
struct LogWriter {
    access: LogTarget,
    error: LogTarget,
}

impl LogWriter {
    fn new(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        let access = match access_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stdout,
        };
        let error = match error_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stderr,
        };

        Ok(Self { access, error })
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn write_to_target(target: &LogTarget, message: &str) {
    match target {
        LogTarget::Stdout => println!("{message}"),
        LogTarget::Stderr => eprintln!("{message}"),
        LogTarget::File(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{message}");
            }
        }
    }
}

/// Write to the info/access log
fn write_info(message: &str) {
    match LOG_WRITER.get() {
        Some(writer) => write_to_target(&writer.access, message),
        None => println!("{message}"),
    }
}

/// Write to the error log
fn write_error(message: &str) {
    match LOG_WRITER.get() {
        Some(writer) => write_to_target(&writer.error, message),
        None => eprintln!("{message}"),
    }
}

/// Initialize the global log writer
///
/// Should be called once at application startup. Fails if a configured log
/// file cannot be opened.
pub fn init(config: &Config) -> io::Result<()> {
    let writer = LogWriter::new(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Item server started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    write_info(&format!("Data file: {}", config.files.data_file));
    write_info(&format!("Public directory: {}", config.files.public_dir));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("Using Tokio runtime for concurrency");
    write_info("======================================\n");
}

/// Log one served request in Common Log Format
pub fn log_access(
    remote_addr: &SocketAddr,
    method: &Method,
    path: &str,
    status: u16,
    body_bytes: u64,
) {
    write_info(&format_access_line(
        remote_addr,
        &Local::now(),
        method,
        path,
        status,
        body_bytes,
    ));
}

/// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
fn format_access_line(
    remote_addr: &SocketAddr,
    time: &DateTime<Local>,
    method: &Method,
    path: &str,
    status: u16,
    body_bytes: u64,
) -> String {
    format!(
        "{} - - [{}] \"{} {} HTTP/1.1\" {} {}",
        remote_addr.ip(),
        time.format("%d/%b/%Y:%H:%M:%S %z"),
        method,
        path,
        status,
        body_bytes,
    )
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_line_common_format() {
        let addr: SocketAddr = "127.0.0.1:51234".parse().unwrap();
        let line = format_access_line(&addr, &Local::now(), &Method::GET, "/api/items", 200, 123);

        assert!(line.starts_with("127.0.0.1 - - ["));
        assert!(line.ends_with("\"GET /api/items HTTP/1.1\" 200 123"));
    }
}
