//! 受信した 1 行のコマンド解釈
//!
//! 大文字小文字を区別する前方一致で、次の順に判定する（最初に一致したものが採用される）。
//!
//! 1. `/who`
//! 2. `/user`（接頭辞を取り除いて trim した残りが新しい名前）
//! 3. `/help`
//! 4. その他の `/` で始まる行（先頭の空白区切りトークンを未知のコマンドとして扱う）
//! 5. それ以外はすべて発言

const WHO_PREFIX: &str = "/who";
const USER_PREFIX: &str = "/user";
const HELP_PREFIX: &str = "/help";
const COMMAND_PREFIX: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 参加者一覧を本人に返す
    Who,
    /// 表示名の変更（trim 済み、未検証）
    Rename(String),
    /// コマンド一覧を本人に返す
    Help,
    /// 未知のコマンド（先頭のトークン）
    Unknown(String),
    /// 発言（行全体）
    Chat(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        if line.starts_with(WHO_PREFIX) {
            Command::Who
        } else if let Some(rest) = line.strip_prefix(USER_PREFIX) {
            Command::Rename(rest.trim().to_string())
        } else if line.starts_with(HELP_PREFIX) {
            Command::Help
        } else if line.starts_with(COMMAND_PREFIX) {
            let token = line.split(char::is_whitespace).next().unwrap_or(line);
            Command::Unknown(token.to_string())
        } else {
            Command::Chat(line.to_string())
        }
    }
}
