//! Core runtime for the Rolecall declarative UI toolkit.
//!
//! Content is written as plain functions annotated with `#[composable]`. Each
//! call opens a group in the slot table, which is how `useState` and
//! `remember` find their values again on the next pass, and nodes emitted with
//! [`emit_node`] keep stable [`NodeId`]s between passes.

#![allow(non_snake_case)]

extern crate self as rolecall_core;

pub mod collections;
mod composer;
mod composition;
mod error;
mod node;
mod state;

pub use composer::{
    emit_node, is_composing, mutableStateOf, remember, useState, with_current_composer, with_group,
    with_key, Composer, Owned,
};
pub use composition::Composition;
pub use error::NodeError;
pub use node::{Applier, MemoryApplier, Node, RootNode};
pub use state::{
    current_reader, live_state_count, peek_recompose_request, request_recomposition,
    take_recompose_request, CompositionId, MutableState, StateId,
};

use std::hash::{Hash, Hasher};
use std::panic::Location;

pub type NodeId = usize;
pub type Key = u64;

/// Hashes any value into a group key.
pub fn hash_key<T: Hash + ?Sized>(value: &T) -> Key {
    let mut hasher = rustc_hash::FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Key for a source location, as produced by `file!()`, `line!()`, `column!()`.
pub fn location_key(file: &str, line: u32, column: u32) -> Key {
    hash_key(&(file, line, column))
}

/// Key for the location a `#[track_caller]` function was called from.
pub fn caller_key(location: &'static Location<'static>) -> Key {
    location_key(location.file(), location.line(), location.column())
}
