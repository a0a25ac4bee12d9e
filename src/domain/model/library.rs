use serde::{Deserialize, Serialize};

use super::book::{Book, BookUpdate, NewBook};

/// 読書進捗の集計結果。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReadingProgress {
    pub total: usize,
    pub read: usize,
    /// 0.0〜100.0。蔵書0冊なら0.0
    pub percentage: f64,
}

/// 蔵書コレクション — 集約ルート。挿入順を保持し、タイトルの重複は許容する。
///
/// JSON上は素の配列として表現される。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    books: Vec<Book>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// 末尾に追加する。重複チェックは行わない。
    pub fn add(&mut self, req: NewBook) {
        self.books.push(Book::from(req));
    }

    /// タイトルが一致する最初の1冊を削除して返す。
    pub fn remove(&mut self, title: &str) -> Option<Book> {
        let pos = self.position_of(title)?;
        Some(self.books.remove(pos))
    }

    /// タイトルが一致する最初の1冊を更新する。見つからなければfalse。
    pub fn update(&mut self, title: &str, update: BookUpdate) -> bool {
        match self.position_of(title) {
            Some(pos) => {
                self.books[pos].apply(update);
                true
            }
            None => false,
        }
    }

    /// タイトル・著者の部分一致検索（コレクション順）。
    pub fn find(&self, search_text: &str) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| book.matches_text(search_text))
            .collect()
    }

    pub fn progress(&self) -> ReadingProgress {
        let total = self.books.len();
        let read = self.books.iter().filter(|b| b.has_read_book()).count();
        let percentage = if total == 0 {
            0.0
        } else {
            read as f64 / total as f64 * 100.0
        };
        ReadingProgress {
            total,
            read,
            percentage,
        }
    }

    fn position_of(&self, title: &str) -> Option<usize> {
        self.books.iter().position(|book| book.title_matches(title))
    }
}
