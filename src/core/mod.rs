//! Core domain logic: the query/command facade over the data store and the
//! patch-document interpreter.

pub mod patch;
pub mod repository;
