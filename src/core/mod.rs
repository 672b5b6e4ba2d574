//! Core business logic, independent of the bot layer.
//!
//! Payment intake produces receipt records; the renderer turns a record into a
//! visual receipt; the export modules turn that receipt into PDF, Word and print
//! output. The content store backs the informational commands.

/// In-memory site content collections and queries
pub mod content;
/// Structured Word document export
pub mod document;
/// Export channel orchestration
pub mod export;
/// Payment form validation and the receipt book
pub mod payment;
/// Paginated PDF assembly
pub mod pdf;
/// Print-ready HTML documents
pub mod print;
/// Rasterizing the visual receipt
pub mod raster;
/// Visual receipt layout
pub mod render;
