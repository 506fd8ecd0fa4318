//! # insync-render
//!
//! Rendering backends for insync leave calendars.
//!
//! This crate provides:
//! - Excel calendar workbooks with totals formulas and highlight rules
//! - Aligned plain-text tables for terminal preview
//! - JSON output for scripting
//!
//! ## Example
//!
//! ```rust,ignore
//! use insync_core::Renderer;
//! use insync_render::{ExcelRenderer, TextRenderer};
//!
//! // Calendar workbook
//! let xlsx_bytes = ExcelRenderer::new().render(&report)?;
//! std::fs::write(report.suggested_file_name(), xlsx_bytes)?;
//!
//! // Terminal preview of days with entries
//! let text = TextRenderer::new().compact().render(&report)?;
//! println!("{text}");
//! ```

pub mod excel;
pub mod json;
pub mod text;

pub use excel::{ExcelRenderer, HighlightRule};
pub use json::JsonRenderer;
pub use text::TextRenderer;
