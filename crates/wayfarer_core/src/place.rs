use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// A resolved destination candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Place {
    /// Name and address on one line, for lists and banners.
    pub fn label(&self) -> String {
        match &self.address {
            Some(address) if !address.is_empty() && address != &self.name => {
                format!("{}, {}", self.name, address)
            }
            _ => self.name.clone(),
        }
    }
}

/// First half of the two-step search protocol. A suggestion carries no
/// coordinates and has to be retrieved by id before it can be routed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}
