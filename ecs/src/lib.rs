//! # Skein ECS
//!
//! Scene graph of entities and typed components, plus subtree operations on
//! the models, materials and skeletons attached to it.
//!
//! ## Core Types
//!
//! - [`Entity`] — Lightweight generational entity identifier
//! - [`World`] — Container owning entities and their component storages
//! - [`Component`] / [`ComponentKind`] — Component trait and its type-erased tag
//! - [`TraversalReport`] — Per-entity outcome of a subtree operation
//!
//! ## Scene Operations
//!
//! - [`hierarchy`] — Parent/child links and enabled state
//! - [`traversal`] — Pre-order subtree walks and ancestor searches
//! - [`spatial`] — World matrices, space conversion, bounds and pivots
//! - [`materials`] — Material backup/restore and shader-graph parameters
//! - [`meshes`] — Outline, double-side and mesh detachment passes
//! - [`debug`] — Marker boxes and bone visualization

pub mod component;
pub mod components;
pub mod debug;
mod entity;
mod error;
pub mod hierarchy;
pub mod materials;
pub mod meshes;
mod report;
mod sparse_set;
pub mod spatial;
pub mod traversal;
mod world;

pub use component::{Component, ComponentKind};
pub use entity::Entity;
pub use error::{Error, Result};
pub use report::TraversalReport;
pub use world::World;
