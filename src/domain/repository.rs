use super::model::library::Library;

/// 永続化の抽象。Infra層が実装する。
pub trait LibraryRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    /// 保存済みコレクションを読み込む。未保存・空ファイルならNone。
    fn load(&self) -> Result<Option<Library>, Self::Error>;
    /// コレクション全体で上書き保存する。
    fn save(&self, library: &Library) -> Result<(), Self::Error>;
}
