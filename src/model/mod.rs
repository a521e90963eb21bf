//! # Overlap Model
//!
//! Plain data shared by the sweep, the graph and the exporters.
//!
//! Design rule: no I/O and no state here. Everything in this module is
//! a value type with predicates.

pub mod interval;
pub mod node;
pub mod relationship;
pub mod value;
pub mod property_map;

pub use interval::{Interval, StayRecord};
pub use node::{EventKey, Node, NodeClass, NodeId, NodeKey};
pub use relationship::{Relationship, RelId};
pub use value::Value;
pub use property_map::PropertyMap;
