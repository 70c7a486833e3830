//! 読み書き設定

/// デバッグトレースを有効にする環境変数
pub const DEBUG_ENV_VAR: &str = "FILECONTENT_DEBUG";

/// `read` 時に確保する要素数の既定値
pub const DEFAULT_RESERVE: usize = 100;

/// コンテナの読み書き設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// 一時ファイル経由のアトミック保存
    pub atomic: bool,
    /// 読み込み時の容量ヒント
    pub reserve: usize,
    /// 各ステップを `log::debug!` でトレース
    pub debug: bool,
}

impl WriteOptions {
    /// 環境変数から設定を構築
    pub fn from_env() -> Self {
        Self {
            debug: std::env::var_os(DEBUG_ENV_VAR).is_some(),
            ..Self::default()
        }
    }

    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn reserve(mut self, reserve: usize) -> Self {
        self.reserve = reserve;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: false,
            reserve: DEFAULT_RESERVE,
            debug: false,
        }
    }
}
