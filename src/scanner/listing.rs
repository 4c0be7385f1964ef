use serde::{Deserialize, Serialize};

/// Badge texts the listing page uses for a price change.
pub const REPRICE_LABELS: [&str; 2] = ["New Price", "Nouveau prix"];

/// The top entry of the listing page. Equality covers both fields, so a
/// reprice of the same address is a different listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub address: String,
    pub is_repriced: bool,
}

impl Listing {
    pub fn new(address: impl Into<String>, is_repriced: bool) -> Self {
        Self {
            address: address.into(),
            is_repriced,
        }
    }

    pub fn is_reprice_label(label: &str) -> bool {
        REPRICE_LABELS.contains(&label)
    }
}
