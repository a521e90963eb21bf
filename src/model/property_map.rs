//! PropertyMap — the key-value store on nodes and relationships.

use std::collections::BTreeMap;
use super::Value;

/// A map of property names to values.
///
/// Ordered so that exporters emit attributes in a stable order.
pub type PropertyMap = BTreeMap<String, Value>;
