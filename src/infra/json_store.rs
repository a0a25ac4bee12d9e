use std::io::ErrorKind;
use std::path::PathBuf;

use crate::domain::model::library::Library;
use crate::domain::repository::LibraryRepository;

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSONファイルによるLibraryRepository実装。
/// 1 Library = 1 JSONファイル（Bookオブジェクトの配列）。
pub struct JsonLibraryRepository {
    path: PathBuf,
}

impl JsonLibraryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LibraryRepository for JsonLibraryRepository {
    type Error = JsonStoreError;

    /// ファイルが無い・空・JSONとして壊れている場合はNone（新規インストール扱い）。
    /// JSONとしては正しいが蔵書として読めない場合と、それ以外のI/Oエラーは
    /// 呼び出し側へ返す（次の保存でファイルを上書きしないため）。
    fn load(&self) -> Result<Option<Library>, Self::Error> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "library file not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<Library>(&content) {
            Ok(library) => Ok(Some(library)),
            Err(e) if e.is_syntax() || e.is_eof() => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "library file is not valid JSON, starting empty"
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(library)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
