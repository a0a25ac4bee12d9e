use crate::domain::model::book::Book;
use crate::domain::model::library::ReadingProgress;

const EMPTY_COLLECTION: &str = "Your collection is empty.";
const PROGRESS_BAR_WIDTH: usize = 20;

/// 蔵書・検索結果・進捗をテキストに整形する（ツール出力用）。
pub struct LibraryView;

impl LibraryView {
    /// コレクション全体を番号付きで一覧表示する。
    pub fn render_list(books: &[Book]) -> String {
        if books.is_empty() {
            return EMPTY_COLLECTION.to_string();
        }

        let mut buf = format!("# Your Book Collection ({} books)\n\n", books.len());
        Self::render_lines(books.iter(), &mut buf);
        buf
    }

    /// 検索結果を表示する。
    pub fn render_search(results: &[&Book]) -> String {
        if results.is_empty() {
            return "No matching books found.".to_string();
        }

        let mut buf = format!("Found {} book(s):\n\n", results.len());
        Self::render_lines(results.iter().copied(), &mut buf);
        buf
    }

    /// 読書進捗を表示する。
    pub fn render_progress(progress: &ReadingProgress) -> String {
        if progress.total == 0 {
            return EMPTY_COLLECTION.to_string();
        }

        format!(
            "# Your Reading Progress\n\n\
             Total Books: {}\n\
             Books Read: {}\n\
             Completion: {:.1}%\n\
             {}\n",
            progress.total,
            progress.read,
            progress.percentage,
            Self::progress_bar(progress.percentage)
        )
    }

    /// 1冊分の表示行（番号なし）。
    pub fn book_line(book: &Book) -> String {
        let status = if book.has_read_book() {
            "Read"
        } else {
            "Unread"
        };
        format!(
            "**{}** by {} ({}) - {} - {}",
            book.title(),
            book.author(),
            book.publication_year(),
            book.genre(),
            status
        )
    }

    fn render_lines<'a>(books: impl Iterator<Item = &'a Book>, buf: &mut String) {
        for (i, book) in books.enumerate() {
            buf.push_str(&format!("{}. {}\n", i + 1, Self::book_line(book)));
        }
    }

    fn progress_bar(percentage: f64) -> String {
        let filled = ((percentage / 100.0) * PROGRESS_BAR_WIDTH as f64).round() as usize;
        let filled = filled.min(PROGRESS_BAR_WIDTH);
        format!(
            "[{}{}]",
            "#".repeat(filled),
            "-".repeat(PROGRESS_BAR_WIDTH - filled)
        )
    }
}
