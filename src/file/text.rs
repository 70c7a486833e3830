//! テキスト形式
//!
//! ファイル内容を指定の文字幅でデコードし、行単位の要素列として扱う。
//! 読み込み時に改行は除去され、書き込み時は各行の後ろに `\n` を1つ付ける。

use crate::error::{FileError, Result};
use crate::file::content::{ContentFormat, FileContent};
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

const BOM: char = '\u{FEFF}';

/// 文字幅（エンコーディング）
pub trait CharWidth {
    /// 1文字単位のバイト数
    const WIDTH: usize;

    /// ログ表示用の名前
    const NAME: &'static str;

    /// ファイル内容を文字列にデコード
    fn decode(bytes: &[u8], path: &Path) -> Result<String>;

    /// 文字列をエンコードして `out` に追加
    fn encode(text: &str, out: &mut Vec<u8>);
}

/// 1バイト幅（UTF-8）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Narrow;

impl CharWidth for Narrow {
    const WIDTH: usize = 1;
    const NAME: &'static str = "text/narrow";

    fn decode(bytes: &[u8], path: &Path) -> Result<String> {
        let content = std::str::from_utf8(bytes).map_err(|e| {
            FileError::encoding(
                path,
                format!("invalid UTF-8 at byte {}", e.valid_up_to()),
            )
        })?;

        Ok(strip_bom(content, path).to_string())
    }

    fn encode(text: &str, out: &mut Vec<u8>) {
        out.extend_from_slice(text.as_bytes());
    }
}

/// 2バイト幅（UTF-16 リトルエンディアン）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Wide;

impl CharWidth for Wide {
    const WIDTH: usize = 2;
    const NAME: &'static str = "text/wide";

    fn decode(bytes: &[u8], path: &Path) -> Result<String> {
        if bytes.len() % Self::WIDTH != 0 {
            return Err(FileError::encoding(
                path,
                format!("odd byte count {} for UTF-16 content", bytes.len()),
            ));
        }

        let units: Vec<u16> = bytes
            .chunks_exact(Self::WIDTH)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        let content = String::from_utf16(&units)
            .map_err(|_| FileError::encoding(path, "unpaired UTF-16 surrogate"))?;

        Ok(strip_bom(&content, path).to_string())
    }

    fn encode(text: &str, out: &mut Vec<u8>) {
        for unit in text.encode_utf16() {
            out.extend_from_slice(&unit.to_le_bytes());
        }
    }
}

/// 先頭のBOMを除去
fn strip_bom<'a>(content: &'a str, path: &Path) -> &'a str {
    match content.strip_prefix(BOM) {
        Some(rest) => {
            log::warn!("Byte order mark stripped from {}", path.display());
            rest
        }
        None => content,
    }
}

/// 行単位のテキスト形式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Text<W = Narrow>(PhantomData<W>);

impl<W: CharWidth> ContentFormat for Text<W> {
    type Element = String;

    const NAME: &'static str = W::NAME;
    const DISPLAY_SEPARATOR: &'static str = "\n";

    fn decode(bytes: &[u8], path: &Path, out: &mut Vec<String>) -> Result<()> {
        let content = W::decode(bytes, path)?;

        if content.contains("\r\n") {
            log::warn!("CRLF line endings in {} read as LF", path.display());
        }

        // 最終行の改行は任意、各行末尾の \r は除去される（\r で終わる行は往復しない）
        out.extend(content.lines().map(str::to_string));
        Ok(())
    }

    fn encode(elements: &[String], out: &mut Vec<u8>) {
        for line in elements {
            W::encode(line, out);
            W::encode("\n", out);
        }
    }

    fn fmt_element(element: &String, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(element)
    }
}

/// 行単位のテキストファイル（既定は1バイト幅）
pub type TextFile<W = Narrow> = FileContent<Text<W>>;
