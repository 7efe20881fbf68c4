//! Page rendering types and functions.
//!
//! Rendering a page is split into three layers:
//!
//! 1. [`HtmlWriter`] collects body lines and keeps track of open tags, so
//!    that nested output can be closed by depth and is always well formed.
//! 2. [`PageRenderer`] walks a transformed page element tree and writes the
//!    HTML of every element into a writer.
//! 3. [`shell`] wraps the collected head and body lines into a complete HTML
//!    document.
//!
//! The renderer expects placeholder elements (page inclusions, the table of
//! contents, and so on) to have been replaced by the
//! [`transform`](crate::transform) passes already. Any placeholder left in
//! the tree is skipped with a warning.

pub use page::PageRenderer;
pub use writer::{FormMethod, HtmlWriter};

mod emitters;
mod page;
pub mod shell;
mod writer;
