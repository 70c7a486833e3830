//! ファイル内容モジュール
//!
//! - `content`: パスに束縛された要素列コンテナ（形式に依存しないコア）
//! - `text`: 行単位のテキスト形式（1バイト幅／2バイト幅）
//! - `binary`: 固定幅ユニットのバイナリ形式
//! - `options`: 読み書き設定

pub mod binary;
pub mod content;
pub mod options;
pub mod text;

pub use binary::{Binary, BinaryFile, Unit};
pub use content::{ContentFormat, FileContent};
pub use options::{WriteOptions, DEBUG_ENV_VAR, DEFAULT_RESERVE};
pub use text::{CharWidth, Narrow, Text, TextFile, Wide};
