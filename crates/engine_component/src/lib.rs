//! # engine_component
//!
//! The "E" and "C" in ECS: entity handles, per-type component storage, and
//! the compile-time component-set machinery the registry is built on.
//!
//! This crate provides:
//!
//! - [`Entity`] — generational `index + generation` handles.
//! - [`EntityAllocator`] — hands out handles and recycles killed slots.
//! - [`Component`] trait — the contract all ECS data must satisfy.
//! - [`ComponentStore`] — dense array of optional values, one slot per entity index.
//! - [`ComponentSet`] / [`Contains`] — a closed tuple of component types with
//!   statically resolved store slots.
//! - [`EcsError`] — errors shared by the whole ECS core.

pub mod component;
pub mod entity;
pub mod error;
pub mod storage;

pub use component::{At, Component, ComponentSet, Contains, Slot};
pub use entity::{Entity, EntityAllocator};
pub use error::EcsError;
pub use storage::ComponentStore;
