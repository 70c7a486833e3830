//! filecontent - ファイル内容コンテナ
//!
//! ファイル全体を要素列（テキストなら行、バイナリなら固定幅ユニット）として
//! メモリ上に読み込み、編集して書き戻すための小さなライブラリ

// コアモジュール
pub mod error;
pub mod logging;

// データ層
pub mod file;

// 公開API
pub use error::{FileError, Result};
pub use file::{
    Binary, BinaryFile, CharWidth, ContentFormat, FileContent, Narrow, Text, TextFile, Unit, Wide,
    WriteOptions,
};
