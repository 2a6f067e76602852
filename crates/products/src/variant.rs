use core::str::FromStr;

use serde::{Deserialize, Serialize};

use catalog_core::DomainError;

/// Product kind.
///
/// Each variant owns exactly one attribute set (see `attributes`). The
/// discriminator is what the single-table store persists in its `type` column,
/// so existing values must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProductVariant {
    #[serde(rename = "DVD")]
    Dvd,
    Book,
    Furniture,
}

impl ProductVariant {
    /// All variants in registry order.
    pub const ALL: [ProductVariant; 3] = [Self::Dvd, Self::Book, Self::Furniture];

    /// Human-facing type name (also the accepted `productType` value).
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Dvd => "DVD",
            Self::Book => "Book",
            Self::Furniture => "Furniture",
        }
    }

    /// Persisted discriminator value.
    pub fn discriminator(&self) -> i16 {
        match self {
            Self::Dvd => 0,
            Self::Book => 1,
            Self::Furniture => 2,
        }
    }

    pub fn from_discriminator(value: i16) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|v| v.discriminator() == value)
            .ok_or_else(|| DomainError::unknown_variant(format!("discriminator {value}")))
    }

    /// Exact, case-sensitive lookup by display name.
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.display_name() == name)
    }
}

impl core::fmt::Display for ProductVariant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProductVariant {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_display_name(s).ok_or_else(|| DomainError::unknown_variant(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_round_trip() {
        for v in ProductVariant::ALL {
            assert_eq!(v.display_name().parse::<ProductVariant>().unwrap(), v);
        }
    }

    #[test]
    fn display_name_lookup_is_case_sensitive() {
        assert!(ProductVariant::from_display_name("dvd").is_none());
        assert!(ProductVariant::from_display_name("book").is_none());
        assert_eq!(ProductVariant::from_display_name("Book"), Some(ProductVariant::Book));
    }

    #[test]
    fn discriminators_are_stable() {
        assert_eq!(ProductVariant::Dvd.discriminator(), 0);
        assert_eq!(ProductVariant::Book.discriminator(), 1);
        assert_eq!(ProductVariant::Furniture.discriminator(), 2);
        assert_eq!(ProductVariant::from_discriminator(2).unwrap(), ProductVariant::Furniture);
        assert!(matches!(
            ProductVariant::from_discriminator(9),
            Err(DomainError::UnknownVariant(_))
        ));
    }

    #[test]
    fn serializes_as_display_name() {
        assert_eq!(serde_json::to_value(ProductVariant::Dvd).unwrap(), "DVD");
        assert_eq!(serde_json::to_value(ProductVariant::Furniture).unwrap(), "Furniture");
    }
}
