use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A car maker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    /// Unique identifier assigned by the storage layer.
    pub id: Uuid,
    /// Brand name, e.g. "Toyota".
    pub name: String,
    /// Country of origin.
    #[serde(default)]
    pub country: String,
}

/// A car in the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    /// Unique identifier assigned by the storage layer.
    pub id: Uuid,
    /// Model name, e.g. "Corolla".
    pub model: String,
    /// Identifier of the car's [`Manufacturer`].
    pub manufacturer: Uuid,
    /// Identifiers of the drivers assigned to this car.
    #[serde(default)]
    pub drivers: BTreeSet<Uuid>,
}
