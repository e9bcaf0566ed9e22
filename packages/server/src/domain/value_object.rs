//! 値オブジェクト
//!
//! - `ParticipantId`: セッション ID（外部のセッション発行処理が割り当てる不透明な文字列）
//! - `ConnectionId`: 物理コネクションごとの ID
//! - `DisplayName`: 表示名（trim 済み、1〜50 文字）
//! - `Timestamp`: Unix タイムスタンプ（JST, ミリ秒）

use std::fmt;

use uuid::Uuid;

use super::error::ValidationError;

/// 表示名の最大文字数
pub const MAX_DISPLAY_NAME_CHARS: usize = 50;

/// 参加者 ID
///
/// 同じ ID を持つ複数のコネクション（複数タブ・複数デバイス）は同一の参加者として扱われる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// 新しい ParticipantId を作成
    ///
    /// 空文字列（空白のみを含む）の場合はエラー
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyParticipantId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// コネクション ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// ConnectionId の生成
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// UUID v4 で新しい ConnectionId を生成
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4())
    }
}

/// 表示名
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayName(String);

impl DisplayName {
    /// 入力文字列から表示名を作成
    ///
    /// 前後の空白は取り除かれる。文字数は Unicode スカラー値で数える。
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if trimmed.chars().count() > MAX_DISPLAY_NAME_CHARS {
            return Err(ValidationError::NameTooLong);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// 参加順の通し番号から既定の表示名を作る（例: `user3`）
    ///
    /// セッション ID は他の参加者に見せないので、名前には含めない。
    pub fn numbered(number: u64) -> Self {
        Self(format!("user{}", number))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix タイムスタンプ（JST, ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
