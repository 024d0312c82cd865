// Domain layer: value objects, entities and the repository port.
// Pure computations only; nothing in here performs I/O.

pub mod handling;
pub mod itinerary;
pub mod leg;
pub mod model;
pub mod ports;

use std::hash::Hash;

/// Objects compared by a stable identifier rather than by their attributes.
pub trait Entity {
    type Id: Eq + Hash;

    fn id(&self) -> &Self::Id;

    fn same_identity_as(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

/// Objects compared by the value of all their attributes.
pub trait ValueObject: PartialEq {
    fn same_value_as(&self, other: &Self) -> bool {
        self == other
    }
}
