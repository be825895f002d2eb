//! Expression type checking
//!
//! `analyzer` resolves each expression kind and hosts the access rules
//! (calls, indexing, member access, casts); `binary` and `unary` hold the
//! operator rules.

mod analyzer;
mod binary;
mod unary;
