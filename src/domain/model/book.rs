use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 蔵書1冊分のレコード。永続化フォーマットのフィールド名をそのまま使う。
///
/// 手書きのファイルも読めるよう、欠けた項目は空、数値の項目は文字列として受け入れる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default, deserialize_with = "lenient_text")]
    title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    author: String,
    #[serde(default, deserialize_with = "lenient_text")]
    publication_year: String,
    #[serde(default, deserialize_with = "lenient_text")]
    genre: String,
    #[serde(default)]
    has_read_book: bool,
}

/// 文字列・数値・真偽値・nullをテキストとして読む。配列・オブジェクトはエラー。
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        v @ (Value::Number(_) | Value::Bool(_)) => Ok(v.to_string()),
        other => Err(D::Error::custom(format!("expected text, found {other}"))),
    }
}

/// 新規登録リクエスト
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publication_year: String,
    pub genre: String,
    pub has_read_book: bool,
}

/// 更新リクエスト（None・空文字のフィールドは変更しない）
///
/// `has_read_book` だけは常に上書きされる。
#[derive(Debug, Clone, Default)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publication_year: Option<String>,
    pub genre: Option<String>,
    pub has_read_book: bool,
}

impl From<NewBook> for Book {
    fn from(req: NewBook) -> Self {
        Self {
            title: req.title,
            author: req.author,
            publication_year: req.publication_year,
            genre: req.genre,
            has_read_book: req.has_read_book,
        }
    }
}

impl Book {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn publication_year(&self) -> &str {
        &self.publication_year
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn has_read_book(&self) -> bool {
        self.has_read_book
    }

    /// タイトルが大文字小文字を無視して一致するか。
    pub fn title_matches(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }

    /// タイトルまたは著者に検索語が含まれるか（case-insensitive）。
    /// 空文字は常にマッチする。
    pub fn matches_text(&self, search_text: &str) -> bool {
        let query = search_text.to_lowercase();
        self.title.to_lowercase().contains(&query) || self.author.to_lowercase().contains(&query)
    }

    // --- 内部操作（Library経由でのみ呼ばれる） ---

    pub(crate) fn apply(&mut self, update: BookUpdate) {
        replace_unless_blank(&mut self.title, update.title);
        replace_unless_blank(&mut self.author, update.author);
        replace_unless_blank(&mut self.publication_year, update.publication_year);
        replace_unless_blank(&mut self.genre, update.genre);
        self.has_read_book = update.has_read_book;
    }
}

fn replace_unless_blank(field: &mut String, value: Option<String>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        *field = v;
    }
}
