//! MCP Server for library-mcp
//!
//! MCP Protocol (stdio) <-> application::LibraryService / LibraryView
//!
//! 6 tools: list_books, add_book, search_books, update_book, delete_book, reading_progress

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use rmcp::{
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::error::AppError;
use crate::application::render::LibraryView;
use crate::application::service::LibraryService;
use crate::domain::model::book::{BookUpdate, NewBook};
use crate::infra::json_store::JsonLibraryRepository;

type Store = LibraryService<JsonLibraryRepository>;

// =============================================================================
// Public entry point
// =============================================================================

/// MCP Serverを起動する。library_pathは蔵書JSONファイル。
pub async fn run(library_path: PathBuf) -> anyhow::Result<()> {
    let repo = JsonLibraryRepository::new(&library_path);
    let store = LibraryService::open(repo)?;
    tracing::info!(path = %library_path.display(), "starting library MCP server");

    let server = LibraryMcpServer::new(store);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

#[derive(Clone)]
struct LibraryMcpServer {
    store: Arc<Mutex<Store>>,
    tool_router: ToolRouter<Self>,
}

impl LibraryMcpServer {
    fn new(store: Store) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            tool_router: Self::tool_router(),
        }
    }

    /// Storeのロックを取る。読み取り→変更→保存は全てこのロック内で行う。
    fn store(&self) -> Result<MutexGuard<'_, Store>, McpError> {
        self.store
            .lock()
            .map_err(|_| McpError::internal_error("Lock poisoned", None))
    }

    fn to_mcp_error(e: AppError) -> McpError {
        McpError::internal_error(format!("{e}"), None)
    }
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for LibraryMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "library-mcp".to_string(),
                title: Some("Personal Library Manager".to_string()),
                description: Some(
                    "Personal book catalog: record books, track what you have read, \
                     and see your reading progress."
                        .to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Manage a personal book collection.\n\
                 \n\
                 Books are identified by title (case-insensitive). Duplicate titles are allowed; \
                 update and delete act on the first match in collection order.\n\
                 \n\
                 Tools: `list_books` → `add_book`/`update_book`/`delete_book`, \
                 `search_books` by title or author, `reading_progress` for statistics."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_ctx).await
    }
}

// =============================================================================
// Request types
// =============================================================================

/// 必須入力が空でないことを検証する。
fn require_present(field: &str, value: &str) -> Result<(), McpError> {
    if value.is_empty() {
        return Err(McpError::invalid_params(
            format!("{field} must not be empty"),
            None,
        ));
    }
    Ok(())
}

fn book_not_found(title: &str) -> McpError {
    McpError::invalid_params(
        format!("No book titled '{title}'. Use `list_books` to see available titles."),
        None,
    )
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpListBooksRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpAddBookRequest {
    #[schemars(description = "Book title (required)")]
    pub title: String,
    #[schemars(description = "Author (required)")]
    pub author: String,
    #[schemars(description = "Publication year, free text (e.g. '1965')")]
    #[serde(default)]
    pub publication_year: String,
    #[schemars(description = "Genre (e.g. 'Sci-Fi')")]
    #[serde(default)]
    pub genre: String,
    #[schemars(description = "Whether you have read this book (default: false)")]
    #[serde(default)]
    pub has_read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpSearchBooksRequest {
    #[schemars(description = "Text to look for in titles and authors (case-insensitive)")]
    pub search_term: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpUpdateBookRequest {
    #[schemars(description = "Current title of the book to update (case-insensitive)")]
    pub title: String,
    #[schemars(description = "New title (omit or leave blank to keep current)")]
    pub new_title: Option<String>,
    #[schemars(description = "New author (omit or leave blank to keep current)")]
    pub author: Option<String>,
    #[schemars(description = "New publication year (omit or leave blank to keep current)")]
    pub publication_year: Option<String>,
    #[schemars(description = "New genre (omit or leave blank to keep current)")]
    pub genre: Option<String>,
    #[schemars(description = "Read status (required, always applied)")]
    pub has_read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpDeleteBookRequest {
    #[schemars(description = "Title of the book to delete (case-insensitive)")]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpReadingProgressRequest {}

// =============================================================================
// Tool implementations
// =============================================================================

#[tool_router]
impl LibraryMcpServer {
    #[tool(
        name = "list_books",
        description = "Show every book in the collection, numbered in the order they were added, with read status.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn list_books(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpListBooksRequest>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store()?;
        Ok(CallToolResult::success(vec![Content::text(
            LibraryView::render_list(store.books()),
        )]))
    }

    #[tool(
        name = "add_book",
        description = "Add a new book to the end of the collection. Title and author are required. Duplicate titles are allowed.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn add_book(
        &self,
        Parameters(req): Parameters<McpAddBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        require_present("title", &req.title)?;
        require_present("author", &req.author)?;

        let mut store = self.store()?;
        let title = req.title.clone();
        store
            .create(NewBook {
                title: req.title,
                author: req.author,
                publication_year: req.publication_year,
                genre: req.genre,
                has_read_book: req.has_read,
            })
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Book added successfully: {} ({} books in collection)",
            title,
            store.books().len()
        ))]))
    }

    #[tool(
        name = "search_books",
        description = "Find books whose title or author contains the search term (case-insensitive).",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn search_books(
        &self,
        Parameters(req): Parameters<McpSearchBooksRequest>,
    ) -> Result<CallToolResult, McpError> {
        // 空の検索語はStoreに渡さない（全件一致になるため）
        if req.search_term.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "Enter a search term. Use `list_books` to see the whole collection.",
            )]));
        }

        let store = self.store()?;
        let results = store.find(&req.search_term);
        Ok(CallToolResult::success(vec![Content::text(
            LibraryView::render_search(&results),
        )]))
    }

    #[tool(
        name = "update_book",
        description = "Edit a book selected by its current title. Blank or omitted fields keep their value; has_read is always applied.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn update_book(
        &self,
        Parameters(req): Parameters<McpUpdateBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        require_present("title", &req.title)?;

        let update = BookUpdate {
            title: req.new_title,
            author: req.author,
            publication_year: req.publication_year,
            genre: req.genre,
            has_read_book: req.has_read,
        };

        let mut store = self.store()?;
        let updated = store
            .update(&req.title, update)
            .map_err(Self::to_mcp_error)?;
        if !updated {
            return Err(book_not_found(&req.title));
        }

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Book updated successfully: {}",
            req.title
        ))]))
    }

    #[tool(
        name = "delete_book",
        description = "Delete the first book whose title matches (case-insensitive).",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn delete_book(
        &self,
        Parameters(req): Parameters<McpDeleteBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        require_present("title", &req.title)?;

        let mut store = self.store()?;
        let deleted = store.delete(&req.title).map_err(Self::to_mcp_error)?;
        if !deleted {
            return Err(book_not_found(&req.title));
        }

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Book deleted successfully: {} ({} books left)",
            req.title,
            store.books().len()
        ))]))
    }

    #[tool(
        name = "reading_progress",
        description = "Show total books, books read, and completion percentage.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn reading_progress(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpReadingProgressRequest>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.store()?;
        Ok(CallToolResult::success(vec![Content::text(
            LibraryView::render_progress(&store.statistics()),
        )]))
    }
}
