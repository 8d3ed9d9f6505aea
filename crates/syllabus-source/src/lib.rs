//! Sidebar sources for syllabus.
//!
//! This crate provides:
//! - [`load_sidebar`] / [`parse_sidebar`]: docsify-style Markdown sidebars
//!   to section declarations
//! - [`Scanner`]: page discovery in a docs directory

mod error;
mod scanner;
mod sidebar;

pub use error::SourceError;
pub use scanner::Scanner;
pub use sidebar::{SidebarError, load_sidebar, normalize_target, parse_sidebar};
