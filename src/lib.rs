//! Layout core for the team pages.
//!
//! Two independent computations over the same member list:
//! - [`layout::place`] packs one bubble per member into a container
//! - [`hierarchy::build_tree`] reduces "reports-to" relations to an org tree
//!
//! Both are pure and hold no state between calls. [`wasm`] exposes them to
//! the frontend as JSON-in/JSON-out functions.

pub mod error;
pub mod hierarchy;
pub mod layout;
pub mod model;
pub mod output;
pub mod roster;
pub mod wasm;

pub use error::LayoutError;
pub use hierarchy::{build_tree, HierarchyNode};
pub use layout::{place, place_with, Bubble, PackConfig, Placement, SearchStrategy};
pub use model::Member;
