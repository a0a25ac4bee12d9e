use crate::domain::model::book::{Book, BookUpdate, NewBook};
use crate::domain::model::library::{Library, ReadingProgress};
use crate::domain::repository::LibraryRepository;

use super::error::AppError;

/// 蔵書に対するユースケース。
/// 起動時に一度だけload → 以降はメモリ上で変更し、変更のたびに全体をsaveする。
pub struct LibraryService<R: LibraryRepository> {
    repo: R,
    library: Library,
}

impl<R: LibraryRepository> LibraryService<R> {
    /// 保存済みコレクションを読み込んでServiceを作る。未保存なら空で始める。
    pub fn open(repo: R) -> Result<Self, AppError> {
        let library = repo
            .load()
            .map_err(|e| AppError::Load(Box::new(e)))?
            .unwrap_or_default();
        tracing::info!(books = library.len(), "library loaded");
        Ok(Self { repo, library })
    }

    /// 現在のコレクション（一覧表示用）。
    pub fn books(&self) -> &[Book] {
        self.library.books()
    }

    /// 本を末尾に追加する。
    pub fn create(&mut self, req: NewBook) -> Result<(), AppError> {
        tracing::info!(title = %req.title, "adding book");
        let previous = self.library.clone();
        self.library.add(req);
        self.commit(previous)
    }

    /// タイトルが一致する最初の1冊を削除する。見つからなければOk(false)。
    pub fn delete(&mut self, title: &str) -> Result<bool, AppError> {
        let previous = self.library.clone();
        match self.library.remove(title) {
            Some(removed) => {
                tracing::info!(title = %removed.title(), "deleted book");
                self.commit(previous)?;
                Ok(true)
            }
            None => {
                tracing::debug!(title, "delete: no matching book");
                Ok(false)
            }
        }
    }

    /// タイトル・著者の部分一致検索。
    pub fn find(&self, search_text: &str) -> Vec<&Book> {
        self.library.find(search_text)
    }

    /// タイトルが一致する最初の1冊を更新する。見つからなければOk(false)。
    pub fn update(&mut self, old_title: &str, update: BookUpdate) -> Result<bool, AppError> {
        let previous = self.library.clone();
        if !self.library.update(old_title, update) {
            tracing::debug!(title = old_title, "update: no matching book");
            return Ok(false);
        }
        tracing::info!(title = old_title, "updated book");
        self.commit(previous)?;
        Ok(true)
    }

    pub fn statistics(&self) -> ReadingProgress {
        self.library.progress()
    }

    // --- private ---

    /// 保存する。失敗したらメモリ上のコレクションを変更前に戻す。
    fn commit(&mut self, previous: Library) -> Result<(), AppError> {
        let result = self.persist();
        if result.is_err() {
            self.library = previous;
        }
        result
    }

    fn persist(&self) -> Result<(), AppError> {
        self.repo.save(&self.library).map_err(|e| {
            tracing::error!(error = %e, "failed to save library");
            AppError::Save(Box::new(e))
        })
    }
}
