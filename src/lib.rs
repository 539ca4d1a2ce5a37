//! Folio: the client of a minimal blogging platform.
//!
//! A hash router and render loop over a REST backend, kept free of any
//! particular host. Hosts supply a [`router::Location`], a
//! [`document::Document`], a [`core::storage::Storage`], and an
//! [`api::BlogApi`].

pub mod api;
pub mod core;
pub mod document;
pub mod render;
pub mod router;
pub mod shell;
pub mod view;

#[cfg(test)]
pub mod test_support;
