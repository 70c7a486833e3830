//! ロギングシステム
//!
//! ライブラリ本体は `log` ファサード経由で出力する。
//! このモジュールはその出力先（stderr／ファイル）となる開発者向けバックエンドを提供

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// ロガー
///
/// * 開発者向け詳細ログをstderrへ出力
/// * 任意でファイルへ追記
#[derive(Debug, Clone)]
pub struct Logger {
    level: LevelFilter,
    output_stderr: bool,
    output_file: Option<PathBuf>,
}

impl Logger {
    /// デフォルト構築
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            output_stderr: true,
            output_file: None,
        }
    }

    /// 開発者向けロガー
    pub fn for_development() -> Self {
        Self::new(LevelFilter::Debug)
    }

    /// ログレベルを取得
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// ログレベルを変更
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// ファイル出力を設定
    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// 標準エラー出力を無効化
    pub fn without_stderr(mut self) -> Self {
        self.output_stderr = false;
        self
    }

    fn should_log(&self, level: Level) -> bool {
        level <= self.level
    }

    fn format_record(record: &Record) -> String {
        format!("{} [{}]: {}", record.level(), record.target(), record.args())
    }

    fn write_line(&self, message: &str) {
        if self.output_stderr {
            eprintln!("{}", message);
        }

        if let Some(path) = &self.output_file {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(file, "{}", message);
            }
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LevelFilter::Info)
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.should_log(metadata.level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.write_line(&Self::format_record(record));
        }
    }

    fn flush(&self) {}
}

/// グローバルロガーとしてインストール
///
/// 既に別のロガーが設定済みの場合は何もしない（2回目以降の呼び出しも無害）。
pub fn init(level: LevelFilter) {
    install(Logger::new(level));
}

/// 設定済みロガーをグローバルにインストール
pub fn install(logger: Logger) {
    let level = logger.level();
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}
