//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod merge;
pub(crate) mod project;
pub(crate) mod render;

pub(crate) use check::CheckArgs;
pub(crate) use merge::MergeArgs;
pub(crate) use render::RenderArgs;
