//! Personal library catalog served over MCP.
//!
//! domain (Book / Library) → application (LibraryService) → infra (JSON file) → interface (MCP)

pub mod application;
pub mod domain;
pub mod infra;
pub mod interface;
