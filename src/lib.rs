//! Letterpress - Document Template Rendering Service
//!
//! This crate renders markdown letter templates with handlebars-style
//! placeholders against JSON data, producing HTML or (through an external
//! HTML-to-PDF service) PDF documents.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
