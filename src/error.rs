//! エラーハンドリング
//!
//! ファイル内容コンテナの読み書きで発生するエラー型を定義
//! 失敗は常に `Result` で返し、コンテナ自身がプロセスを終了させることはない

use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

/// ファイル操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("Encoding error in {path}: {message}")]
    Encoding { path: String, message: String },

    #[error("{path}: {len} bytes is not a multiple of the {width}-byte unit width")]
    TrailingBytes {
        path: String,
        len: usize,
        width: usize,
    },

    #[error("IO error on {path}: {message}")]
    Io { path: String, message: String },
}

impl FileError {
    /// `std::io::Error` を対象パス付きのエラーに変換
    pub fn from_io(error: std::io::Error, path: &Path) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            ErrorKind::NotFound => FileError::NotFound { path },
            ErrorKind::PermissionDenied => FileError::PermissionDenied { path },
            ErrorKind::IsADirectory | ErrorKind::NotADirectory | ErrorKind::InvalidInput => {
                FileError::InvalidPath { path }
            }
            _ => FileError::Io {
                path,
                message: error.to_string(),
            },
        }
    }

    /// デコード失敗
    pub fn encoding(path: &Path, message: impl Into<String>) -> Self {
        FileError::Encoding {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// 0/非0 のステータス規約を必要とする呼び出し元向けの終了コード
    ///
    /// 1: オープン失敗（パス不正を含む）、2: 読み書き中のI/O失敗、3: デコード失敗。
    pub fn status(&self) -> i32 {
        match self {
            FileError::NotFound { .. }
            | FileError::PermissionDenied { .. }
            | FileError::InvalidPath { .. } => 1,
            FileError::Io { .. } => 2,
            FileError::Encoding { .. } | FileError::TrailingBytes { .. } => 3,
        }
    }

    /// デコード由来のエラーかどうか
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            FileError::Encoding { .. } | FileError::TrailingBytes { .. }
        )
    }
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, FileError>;
