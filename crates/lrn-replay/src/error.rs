use lrn_core::Name;
use lrn_store::TransferError;

/// Malformed sample table.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unit is not utf-8 text: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("row {row} column {column}: invalid number {token:?}")]
    Token {
        row: usize,
        column: usize,
        token: String,
    },
    #[error("row {row}: expected {expected} columns, found {found}")]
    Width {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// A backward-fill walk that stopped before committing anything.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to fetch unit {unit}: {source}")]
    Transfer { unit: Name, source: TransferError },
    #[error("failed to parse unit {unit}: {source}")]
    Parse { unit: Name, source: ParseError },
}

/// Snapshot file could not be written or read back.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a replay buffer snapshot")]
    Magic,
    #[error("unsupported snapshot version {0}")]
    Version(u32),
    #[error("snapshot shape ({state}, {action}) does not match this build")]
    Shape { state: u32, action: u32 },
    #[error("snapshot cursor of {0} bytes is implausibly long")]
    CursorLength(u32),
    #[error("snapshot cursor is not utf-8")]
    Cursor(#[from] std::string::FromUtf8Error),
}
