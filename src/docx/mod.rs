//! Minimal WordprocessingML (.docx) support for the merge engine.
//!
//! This module implements only the surface the merge needs: opening a
//! package from bytes, enumerating `<w:t>` run text, discovering
//! `{placeholder}` tokens, rewriting run text with literal replacements,
//! and re-serializing the package.
//!
//! Placeholder matching is run-bounded by design: a token split across two
//! runs (for example by autocorrect history in the authoring tool) is not
//! discovered and not replaced. Authored templates must keep each token
//! inside a single run.

mod package;
mod text;

pub use package::DocxPackage;
