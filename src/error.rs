use std::io;
use std::panic::Location;

use thiserror::Error;

/// 端末操作の失敗。どの呼び出しがどこで失敗したかを保持する
#[derive(Debug, Error)]
pub enum Error {
    #[error("Call {op} failed in {location}: {cause}")]
    Io {
        op: &'static str,
        location: &'static Location<'static>,
        cause: io::Error,
    },
    #[error("Call {op} failed in {location}: malformed cursor position report {report:?}")]
    MalformedReport {
        op: &'static str,
        location: &'static Location<'static>,
        report: Vec<u8>,
    },
}

impl Error {
    #[track_caller]
    pub fn malformed_report(op: &'static str, report: &[u8]) -> Self {
        Error::MalformedReport {
            op,
            location: Location::caller(),
            report: report.to_vec(),
        }
    }

    pub fn op(&self) -> &'static str {
        match self {
            Error::Io { op, .. } | Error::MalformedReport { op, .. } => op,
        }
    }

    pub fn location(&self) -> &'static Location<'static> {
        match self {
            Error::Io { location, .. } | Error::MalformedReport { location, .. } => location,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// `io::Result` に失敗した操作名と呼び出し位置を付ける
pub trait Failed<T> {
    fn failed(self, op: &'static str) -> Result<T>;
}

impl<T> Failed<T> for io::Result<T> {
    #[track_caller]
    fn failed(self, op: &'static str) -> Result<T> {
        let location = Location::caller();
        self.map_err(|cause| Error::Io {
            op,
            location,
            cause,
        })
    }
}
