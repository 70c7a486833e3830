//! バイナリ形式
//!
//! ファイル内容を固定幅ユニットの連続として扱う（区切りなし、リトルエンディアン）

use crate::error::{FileError, Result};
use crate::file::content::{ContentFormat, FileContent};
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

/// 固定幅ユニット
pub trait Unit: Copy + PartialEq + fmt::Debug + fmt::LowerHex {
    /// 1ユニットのバイト数
    const WIDTH: usize;

    /// `WIDTH` バイトのスライスから復元
    fn from_le_slice(bytes: &[u8]) -> Self;

    /// リトルエンディアンで `out` に追加
    fn extend_le(self, out: &mut Vec<u8>);
}

macro_rules! impl_unit {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Unit for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn from_le_slice(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(buf)
                }

                fn extend_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_unit!(u8, i8, u16, i16, u32, i32, u64, i64);

/// 固定幅ユニットのバイナリ形式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Binary<U = u8>(PhantomData<U>);

impl<U: Unit> ContentFormat for Binary<U> {
    type Element = U;

    const NAME: &'static str = "binary";
    const DISPLAY_SEPARATOR: &'static str = " ";

    fn decode(bytes: &[u8], path: &Path, out: &mut Vec<U>) -> Result<()> {
        if bytes.len() % U::WIDTH != 0 {
            return Err(FileError::TrailingBytes {
                path: path.display().to_string(),
                len: bytes.len(),
                width: U::WIDTH,
            });
        }

        out.extend(bytes.chunks_exact(U::WIDTH).map(U::from_le_slice));
        Ok(())
    }

    fn encode(elements: &[U], out: &mut Vec<u8>) {
        out.reserve(elements.len() * U::WIDTH);
        for unit in elements {
            unit.extend_le(out);
        }
    }

    fn fmt_element(element: &U, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$x}", element, width = U::WIDTH * 2)
    }
}

/// 固定幅バイナリファイル（既定は1バイト単位）
pub type BinaryFile<U = u8> = FileContent<Binary<U>>;
