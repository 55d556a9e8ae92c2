//! In-memory domain records used by the bundled controllers.
//!
//! Stores are plain values constructed at startup and handed to controllers
//! behind an `Arc`; they synchronize internally and need no outer lock.

mod item;
mod member;
mod store;

pub use item::{Item, ItemRepository};
pub use member::{Member, MemberRepository};
pub use store::{Entity, MemoryStore};
