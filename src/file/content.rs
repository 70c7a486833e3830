//! ファイル内容コンテナのコア
//!
//! パスに束縛された要素列を保持し、読み込み・書き込み・比較を仲介する。
//! 要素列の生成方法（行分割か固定幅ユニットか）は `ContentFormat` が決める。

use crate::error::{FileError, Result};
use crate::file::options::WriteOptions;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// ファイル操作用デバッグマクロ
macro_rules! file_debug_log {
    ($self:expr, $($arg:tt)*) => {
        if $self.options.debug {
            log::debug!("{} {}: {}", F::NAME, $self.path.display(), format!($($arg)*));
        }
    };
}

/// 生バイト列と要素列の相互変換
pub trait ContentFormat {
    /// 要素型（テキストなら1行、バイナリなら1ユニット）
    type Element: Clone + PartialEq + fmt::Debug;

    /// ログ表示用の形式名
    const NAME: &'static str;

    /// 表示時の要素区切り
    const DISPLAY_SEPARATOR: &'static str;

    /// ファイル内容を要素列にデコードし `out` に追加
    fn decode(bytes: &[u8], path: &Path, out: &mut Vec<Self::Element>) -> Result<()>;

    /// 要素列をファイル内容にエンコード
    fn encode(elements: &[Self::Element], out: &mut Vec<u8>);

    /// 1要素の表示
    fn fmt_element(element: &Self::Element, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// ファイル内容コンテナ
pub struct FileContent<F: ContentFormat> {
    path: PathBuf,
    elements: Vec<F::Element>,
    options: WriteOptions,
    format: PhantomData<fn() -> F>,
}

impl<F: ContentFormat> FileContent<F> {
    /// パスに束縛された空のコンテナを作成
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, WriteOptions::from_env())
    }

    /// 設定付きで作成
    pub fn with_options(path: impl Into<PathBuf>, options: WriteOptions) -> Self {
        Self {
            path: path.into(),
            elements: Vec::new(),
            options,
            format: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// 束縛パスに通常ファイルが存在するか
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// ファイルを読み込み、要素列を置き換える
    ///
    /// 失敗した場合、要素列は変更されない。
    pub fn read(&mut self) -> Result<()> {
        file_debug_log!(self, "read called");

        let bytes = self.read_bytes()?;
        file_debug_log!(self, "read {} bytes", bytes.len());

        let mut decoded = Vec::with_capacity(self.options.reserve);
        F::decode(&bytes, &self.path, &mut decoded).map_err(|e| {
            file_debug_log!(self, "decode failed: {}", e);
            e
        })?;

        file_debug_log!(self, "decoded {} elements", decoded.len());
        self.elements = decoded;
        Ok(())
    }

    fn read_bytes(&self) -> Result<Vec<u8>> {
        let mut file = File::open(&self.path).map_err(|e| FileError::from_io(e, &self.path))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| FileError::from_io(e, &self.path))?;
        Ok(bytes)
    }

    /// 要素列をファイルへ書き込む（既存内容は切り詰め）
    pub fn write(&self) -> Result<()> {
        file_debug_log!(self, "write called with {} elements", self.elements.len());

        let mut bytes = Vec::new();
        F::encode(&self.elements, &mut bytes);
        file_debug_log!(self, "encoded {} bytes", bytes.len());

        let result = if self.options.atomic {
            file_debug_log!(self, "using atomic save");
            self.atomic_write(&bytes)
        } else {
            file_debug_log!(self, "using direct save");
            Self::direct_write(&self.path, &bytes)
        };

        match &result {
            Ok(_) => file_debug_log!(self, "write completed successfully"),
            Err(e) => file_debug_log!(self, "write failed: {}", e),
        }

        result
    }

    /// 要素列を置き換えてから書き込む
    pub fn write_data(&mut self, elements: Vec<F::Element>) -> Result<()> {
        self.elements = elements;
        self.write()
    }

    fn direct_write(path: &Path, bytes: &[u8]) -> Result<()> {
        let mut file = File::create(path).map_err(|e| match FileError::from_io(e, path) {
            // 親ディレクトリが無い場合は「ファイルが無い」ではなくパス不正
            FileError::NotFound { path: shown } if !Self::parent_exists(path) => {
                FileError::InvalidPath { path: shown }
            }
            other => other,
        })?;
        file.write_all(bytes).map_err(|e| FileError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        file.flush().map_err(|e| FileError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn parent_exists(path: &Path) -> bool {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.is_dir(),
            _ => true,
        }
    }

    /// アトミック保存（一時ファイル経由）
    fn atomic_write(&self, bytes: &[u8]) -> Result<()> {
        let temp_path = self.temp_path()?;
        file_debug_log!(self, "atomic_save: temp_path: {}", temp_path.display());

        if let Err(e) = Self::direct_write(&temp_path, bytes) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e);
        }

        std::fs::rename(&temp_path, &self.path).map_err(|e| {
            file_debug_log!(self, "atomic_save: rename failed: {}", e);
            // 一時ファイル削除を試行
            let _ = std::fs::remove_file(&temp_path);
            FileError::from_io(e, &self.path)
        })
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let invalid = || FileError::InvalidPath {
            path: self.path.display().to_string(),
        };
        let parent = self.path.parent().ok_or_else(invalid)?;
        let filename = self.path.file_name().ok_or_else(invalid)?;

        let temp_name = format!(".{}_{}", filename.to_string_lossy(), std::process::id());
        Ok(parent.join(temp_name))
    }

    /// 要素列のコピーを返す
    pub fn data(&self) -> Vec<F::Element> {
        self.elements.clone()
    }

    pub fn elements(&self) -> &[F::Element] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut Vec<F::Element> {
        &mut self.elements
    }

    /// 要素列をコピーで置き換える
    pub fn set_data(&mut self, elements: &[F::Element]) {
        self.elements = elements.to_vec();
    }

    /// 要素列を取り出し、コンテナを空にする
    pub fn take_data(&mut self) -> Vec<F::Element> {
        std::mem::take(&mut self.elements)
    }

    /// 呼び出し元のベクタを移動して取り込み、`elements` を空にする
    pub fn move_data(&mut self, elements: &mut Vec<F::Element>) {
        self.elements = std::mem::take(elements);
    }

    /// 要素列を所有権ごと置き換え、以前の要素列を返す
    pub fn replace_data(&mut self, elements: Vec<F::Element>) -> Vec<F::Element> {
        std::mem::replace(&mut self.elements, elements)
    }

    /// 要素列が長さ・内容ともに一致するか
    pub fn equal(&self, other: &Self) -> bool {
        self.elements == other.elements
    }

    /// 先頭 `limit` 要素のみ比較
    ///
    /// どちらかの要素数が `limit` 未満なら `false`。
    pub fn equal_prefix(&self, other: &Self, limit: usize) -> bool {
        match (self.elements.get(..limit), other.elements.get(..limit)) {
            (Some(lhs), Some(rhs)) => lhs == rhs,
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn reserve(&mut self, additional: usize) {
        self.elements.reserve(additional);
    }

    pub fn push(&mut self, element: F::Element) {
        self.elements.push(element);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, F::Element> {
        self.elements.iter()
    }
}

impl<F: ContentFormat> Clone for FileContent<F> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            elements: self.elements.clone(),
            options: self.options,
            format: PhantomData,
        }
    }
}

impl<F: ContentFormat> fmt::Debug for FileContent<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileContent")
            .field("format", &F::NAME)
            .field("path", &self.path)
            .field("elements", &self.elements)
            .field("options", &self.options)
            .finish()
    }
}

impl<F: ContentFormat> fmt::Display for FileContent<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(F::DISPLAY_SEPARATOR)?;
            }
            F::fmt_element(element, f)?;
        }
        Ok(())
    }
}

/// パスは比較せず、要素列のみを比較
impl<F: ContentFormat> PartialEq for FileContent<F> {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl<'a, F: ContentFormat> IntoIterator for &'a FileContent<F> {
    type Item = &'a F::Element;
    type IntoIter = std::slice::Iter<'a, F::Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// 1バイト1要素のテスト用形式
    struct Raw;

    impl ContentFormat for Raw {
        type Element = u8;
        const NAME: &'static str = "raw";
        const DISPLAY_SEPARATOR: &'static str = ",";

        fn decode(bytes: &[u8], _path: &Path, out: &mut Vec<u8>) -> Result<()> {
            out.extend_from_slice(bytes);
            Ok(())
        }

        fn encode(elements: &[u8], out: &mut Vec<u8>) {
            out.extend_from_slice(elements);
        }

        fn fmt_element(element: &u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", element)
        }
    }

    fn raw(path: &Path, data: &[u8]) -> FileContent<Raw> {
        let mut content = FileContent::with_options(path, WriteOptions::default());
        content.set_data(data);
        content
    }

    #[test]
    fn test_new_container_is_empty() {
        let content: FileContent<Raw> = FileContent::new("unused.bin");
        assert!(content.is_empty());
        assert_eq!(content.path(), Path::new("unused.bin"));
        assert!(!content.exists());
    }

    #[test]
    fn test_write_truncates_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("truncate.bin");
        std::fs::write(&path, [9u8; 32]).unwrap();

        raw(&path, &[1, 2]).write().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_read_replaces_elements() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("replace.bin");
        std::fs::write(&path, [4u8, 5]).unwrap();

        let mut content = raw(&path, &[1, 2, 3]);
        content.read().unwrap();
        assert_eq!(content.elements(), &[4, 5]);
    }

    #[test]
    fn test_failed_read_keeps_elements() {
        let temp_dir = TempDir::new().unwrap();
        let mut content = raw(&temp_dir.path().join("missing.bin"), &[7, 8]);

        let err = content.read().unwrap_err();
        assert!(matches!(err, FileError::NotFound { .. }));
        assert_eq!(err.status(), 1);
        assert_eq!(content.elements(), &[7, 8]);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no_such_dir").join("out.bin");

        let err = raw(&path, &[1]).write().unwrap_err();
        assert!(
            matches!(err, FileError::InvalidPath { .. }),
            "Expected InvalidPath, got {:?}",
            err
        );
        assert_eq!(err.status(), 1);
        assert!(!path.exists());

        // アトミック保存でも同じ
        let options = WriteOptions::default().atomic(true);
        let mut content: FileContent<Raw> = FileContent::with_options(&path, options);
        content.set_data(&[1]);
        assert!(matches!(
            content.write().unwrap_err(),
            FileError::InvalidPath { .. }
        ));
    }

    #[test]
    fn test_read_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut content: FileContent<Raw> = FileContent::new(temp_dir.path());
        assert!(content.read().is_err());
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("atomic.bin");
        let options = WriteOptions::default().atomic(true).debug(true);

        let mut content: FileContent<Raw> = FileContent::with_options(&path, options);
        content.set_data(&[3, 1, 4]);
        content.write().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![3, 1, 4]);
        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_reserve_grows_capacity_only() {
        let mut content = raw(Path::new("reserve.bin"), &[1]);
        content.reserve(64);
        assert!(content.elements_mut().capacity() >= 65);
        assert_eq!(content.elements(), &[1]);
    }

    #[test]
    fn test_take_and_move_data() {
        let mut source = raw(Path::new("a.bin"), &[1, 2, 3]);
        let before = source.data();

        let mut taken = source.take_data();
        assert!(source.is_empty());
        assert_eq!(taken, before);

        let mut target: FileContent<Raw> = FileContent::new("b.bin");
        target.move_data(&mut taken);
        assert!(taken.is_empty());
        assert_eq!(target.elements(), &[1, 2, 3]);

        let previous = target.replace_data(vec![9]);
        assert_eq!(previous, vec![1, 2, 3]);
        assert_eq!(target.elements(), &[9]);
    }

    #[test]
    fn test_equal_prefix_limits() {
        let long = raw(Path::new("long.bin"), &[1, 2, 3, 4, 5]);
        let short = raw(Path::new("short.bin"), &[1, 2, 3]);

        assert!(long.equal_prefix(&short, 3));
        assert!(short.equal_prefix(&long, 3));
        assert!(long.equal_prefix(&short, 0));
        assert!(!long.equal(&short));

        // limit が短い方の要素数を超える場合は false
        assert!(!long.equal_prefix(&short, 4));
        assert!(!long.equal_prefix(&long.clone(), 6));

        let other = raw(Path::new("other.bin"), &[1, 9, 3]);
        assert!(long.equal_prefix(&other, 1));
        assert!(!long.equal_prefix(&other, 2));
    }

    #[test]
    fn test_partial_eq_ignores_path() {
        let lhs = raw(Path::new("x.bin"), &[1, 2]);
        let rhs = raw(Path::new("y.bin"), &[1, 2]);
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_display_and_iteration() {
        let mut content = raw(Path::new("show.bin"), &[1, 2]);
        content.push(3);
        assert_eq!(content.to_string(), "1,2,3");
        assert_eq!((&content).into_iter().copied().sum::<u8>(), 6);
        assert_eq!(content.iter().count(), content.len());

        content.clear();
        assert_eq!(content.to_string(), "");
    }
}
