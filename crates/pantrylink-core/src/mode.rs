//! Transaction modes.
//!
//! The scanner operates in one of a fixed set of transaction modes that
//! decide what a product scan does (consume stock, purchase, open a
//! package, ...). Modes are stored as small integers; `setmode` accepts
//! the numeric range bounded by [`TransactionMode::LOWEST`] and
//! [`TransactionMode::HIGHEST`].

use serde::{Deserialize, Serialize};

/// Scanner transaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i64)]
pub enum TransactionMode {
    /// Consume stock on scan.
    Consume = 0,
    /// Consume stock as spoiled.
    ConsumeSpoiled = 1,
    /// Add stock on scan.
    Purchase = 2,
    /// Mark a unit as opened.
    Open = 3,
    /// Read back current stock.
    GetStock = 4,
    /// Put the product on the shopping list.
    AddToShoppingList = 5,
    /// Consume all stock of the product.
    ConsumeAll = 6,
}

impl TransactionMode {
    /// Lowest valid mode value.
    pub const LOWEST: i64 = Self::Consume as i64;
    /// Highest valid mode value.
    pub const HIGHEST: i64 = Self::ConsumeAll as i64;

    /// Converts a raw value into a mode, if it is in the valid range.
    #[must_use]
    pub const fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Consume),
            1 => Some(Self::ConsumeSpoiled),
            2 => Some(Self::Purchase),
            3 => Some(Self::Open),
            4 => Some(Self::GetStock),
            5 => Some(Self::AddToShoppingList),
            6 => Some(Self::ConsumeAll),
            _ => None,
        }
    }

    /// Returns the numeric value stored and reported over the wire.
    #[must_use]
    pub const fn value(self) -> i64 {
        self as i64
    }
}

impl Default for TransactionMode {
    fn default() -> Self {
        Self::Consume
    }
}

impl std::fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Consume => "Consume",
            Self::ConsumeSpoiled => "Consume (spoiled)",
            Self::Purchase => "Purchase",
            Self::Open => "Open",
            Self::GetStock => "Inventory",
            Self::AddToShoppingList => "Add to shopping list",
            Self::ConsumeAll => "Consume all",
        };
        f.write_str(label)
    }
}

/// The configured command barcodes.
///
/// Scanning one of these switches the transaction mode instead of
/// recording a product scan. The wire keys of the `barcodes` readback
/// endpoint (`BARCODE_C`, `BARCODE_CS`, ...) map onto these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandBarcodes {
    /// Switch to [`TransactionMode::Consume`].
    pub consume: String,
    /// Switch to [`TransactionMode::ConsumeSpoiled`].
    pub consume_spoiled: String,
    /// Switch to [`TransactionMode::Purchase`].
    pub purchase: String,
    /// Switch to [`TransactionMode::Open`].
    pub open: String,
    /// Switch to [`TransactionMode::GetStock`].
    pub get_stock: String,
    /// Prefix for quantity barcodes; reported over the wire but not a
    /// mode switch.
    pub quantity: String,
    /// Switch to [`TransactionMode::AddToShoppingList`].
    pub add_to_shopping_list: String,
    /// Switch to [`TransactionMode::ConsumeAll`].
    pub consume_all: String,
}

impl Default for CommandBarcodes {
    fn default() -> Self {
        Self {
            consume: "BBUDDY-C".to_string(),
            consume_spoiled: "BBUDDY-CS".to_string(),
            purchase: "BBUDDY-P".to_string(),
            open: "BBUDDY-O".to_string(),
            get_stock: "BBUDDY-I".to_string(),
            quantity: "BBUDDY-Q-".to_string(),
            add_to_shopping_list: "BBUDDY-AS".to_string(),
            consume_all: "BBUDDY-CA".to_string(),
        }
    }
}

impl CommandBarcodes {
    /// Returns the mode a command barcode switches to, or `None` when the
    /// barcode is not a mode-switching command.
    #[must_use]
    pub fn mode_for(&self, barcode: &str) -> Option<TransactionMode> {
        if barcode == self.consume {
            Some(TransactionMode::Consume)
        } else if barcode == self.consume_spoiled {
            Some(TransactionMode::ConsumeSpoiled)
        } else if barcode == self.purchase {
            Some(TransactionMode::Purchase)
        } else if barcode == self.open {
            Some(TransactionMode::Open)
        } else if barcode == self.get_stock {
            Some(TransactionMode::GetStock)
        } else if barcode == self.add_to_shopping_list {
            Some(TransactionMode::AddToShoppingList)
        } else if barcode == self.consume_all {
            Some(TransactionMode::ConsumeAll)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds() {
        assert_eq!(TransactionMode::LOWEST, 0);
        assert_eq!(TransactionMode::HIGHEST, 6);
    }

    #[test]
    fn round_trips_within_range() {
        for value in TransactionMode::LOWEST..=TransactionMode::HIGHEST {
            let mode = TransactionMode::from_value(value).unwrap();
            assert_eq!(mode.value(), value);
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(TransactionMode::from_value(-1).is_none());
        assert!(TransactionMode::from_value(7).is_none());
    }

    #[test]
    fn command_barcodes_map_to_modes() {
        let commands = CommandBarcodes::default();
        assert_eq!(commands.mode_for("BBUDDY-C"), Some(TransactionMode::Consume));
        assert_eq!(
            commands.mode_for("BBUDDY-CA"),
            Some(TransactionMode::ConsumeAll)
        );
        assert_eq!(commands.mode_for("4066600204404"), None);
        // The quantity prefix is not a mode switch.
        assert_eq!(commands.mode_for("BBUDDY-Q-"), None);
    }
}
