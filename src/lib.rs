//! Rendering of parsed wiki pages to HTML.
//!
//! A page arrives as a [`tree::Tree`] of page elements, either from a wiki
//! markup parser or decoded from JSON with [`tree::json`]. The
//! [`transform`] passes replace placeholders with generated content, the
//! [`renderer`] turns the result into HTML lines, and
//! [`renderer::shell`] wraps those lines into a complete document. Code
//! blocks are highlighted by [`highlight`].

pub mod common;
pub mod config;
pub mod highlight;
pub mod path;
pub mod renderer;
pub mod repository;
pub mod transform;
pub mod tree;
