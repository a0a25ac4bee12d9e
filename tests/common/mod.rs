//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use library_mcp::application::service::LibraryService;
use library_mcp::domain::model::book::NewBook;
use library_mcp::domain::model::library::Library;
use library_mcp::domain::repository::LibraryRepository;

// =============================================================================
// InMemoryRepo — テスト用リポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("in-memory store error")]
pub struct InMemoryError;

/// ファイルI/O不要のインメモリリポジトリ。保存回数も数える。
pub struct InMemoryRepo {
    store: RefCell<Option<String>>,
    saves: Cell<usize>,
    fail_saves: bool,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            store: RefCell::new(None),
            saves: Cell::new(0),
            fail_saves: false,
        }
    }

    /// saveが常に失敗するリポジトリ。
    pub fn failing() -> Self {
        Self::new().fail_saves()
    }

    /// 以降のsaveを失敗させる。
    pub fn fail_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn with_library(library: &Library) -> Self {
        let repo = Self::new();
        *repo.store.borrow_mut() = Some(serde_json::to_string(library).unwrap());
        repo
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    /// 最後に保存されたコレクション。
    pub fn saved(&self) -> Option<Library> {
        self.store
            .borrow()
            .as_ref()
            .map(|json| serde_json::from_str(json).unwrap())
    }
}

impl LibraryRepository for InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Option<Library>, Self::Error> {
        Ok(self.saved())
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        if self.fail_saves {
            return Err(InMemoryError);
        }
        let json = serde_json::to_string(library).unwrap();
        *self.store.borrow_mut() = Some(json);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

impl LibraryRepository for &InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Option<Library>, Self::Error> {
        (*self).load()
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        (*self).save(library)
    }
}

// =============================================================================
// TestLibrary — テスト用コレクション作成ヘルパー
// =============================================================================

pub fn new_book(
    title: &str,
    author: &str,
    publication_year: &str,
    genre: &str,
    has_read_book: bool,
) -> NewBook {
    NewBook {
        title: title.into(),
        author: author.into(),
        publication_year: publication_year.into(),
        genre: genre.into(),
        has_read_book,
    }
}

pub struct TestLibrary;

impl TestLibrary {
    /// 標準的なテスト用コレクション（4冊中3冊読了）:
    /// ```text
    /// 1. Dune / Frank Herbert (1965) Sci-Fi — read
    /// 2. The Hobbit / J.R.R. Tolkien (1937) Fantasy — read
    /// 3. Emma / Jane Austen (1815) Romance — unread
    /// 4. Neuromancer / William Gibson (1984) Cyberpunk — read
    /// ```
    pub fn standard() -> Library {
        let mut library = Library::new();
        library.add(new_book("Dune", "Frank Herbert", "1965", "Sci-Fi", true));
        library.add(new_book(
            "The Hobbit",
            "J.R.R. Tolkien",
            "1937",
            "Fantasy",
            true,
        ));
        library.add(new_book("Emma", "Jane Austen", "1815", "Romance", false));
        library.add(new_book(
            "Neuromancer",
            "William Gibson",
            "1984",
            "Cyberpunk",
            true,
        ));
        library
    }

    /// 保存済みのコレクションからLibraryServiceを開く。
    pub fn service_with(library: &Library) -> LibraryService<InMemoryRepo> {
        LibraryService::open(InMemoryRepo::with_library(library)).unwrap()
    }
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
