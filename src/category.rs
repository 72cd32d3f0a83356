//! Closed categorical fields and their integer codes.
//!
//! Codes are the label encodings the models were trained with. The form path
//! only ever sees the enumerated labels; the JSON path may see anything and
//! falls back to a fixed code per field.

use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};

/// A categorical input field with a fixed label set.
pub trait Category: Sized + Copy + 'static {
    /// Field name used in errors and logs.
    const FIELD: &'static str;
    /// Every variant, in the order the form lists them.
    const ALL: &'static [Self];
    /// Code used by the JSON path when a label is not recognised.
    const FALLBACK_CODE: u8;

    fn label(self) -> &'static str;
    fn code(self) -> u8;

    /// Strict lookup for inputs that came from a closed-choice control.
    fn from_label(label: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label() == label)
            .ok_or_else(|| {
                PricingError::Validation(format!("unknown {} {:?}", Self::FIELD, label))
            })
    }

    /// Lenient lookup for untrusted callers.
    fn code_or_default(label: &str) -> u8 {
        Self::ALL
            .iter()
            .find(|c| c.label() == label)
            .map(|c| c.code())
            .unwrap_or(Self::FALLBACK_CODE)
    }
}

macro_rules! category {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal, fallback = $fallback:literal,
        { $($variant:ident => ($label:literal, $code:literal)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl Category for $name {
            const FIELD: &'static str = $field;
            const ALL: &'static [Self] = &[$($name::$variant),+];
            const FALLBACK_CODE: u8 = $fallback;

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code,)+
                }
            }
        }
    };
}

category! {
    /// Number of previous owners.
    OwnerType, field = "owner_type", fallback = 1, {
        First => ("First Owner", 1),
        Second => ("Second Owner", 2),
        Third => ("Third Owner", 3),
        Fourth => ("Fourth Owner", 4),
        Fifth => ("Fifth Owner", 5),
    }
}

category! {
    TransmissionType, field = "transmission_type", fallback = 1, {
        Manual => ("Manual", 1),
        Automatic => ("Automatic", 0),
    }
}

category! {
    FuelType, field = "fuel_type", fallback = 1, {
        Diesel => ("Diesel", 4),
        Petrol => ("Petrol", 1),
        Cng => ("CNG", 3),
        Lpg => ("LPG", 2),
        Electric => ("Electric", 0),
    }
}

category! {
    BodyType, field = "body_type", fallback = 2, {
        Hatchback => ("Hatchback", 2),
        Sedan => ("Sedan", 3),
        Suv => ("SUV", 6),
        Muv => ("MUV", 5),
        Minivan => ("Minivan", 1),
        Pickup => ("Pickup", 4),
        Coupe => ("Coupe", 0),
        Wagon => ("Wagon", 8),
        Convertibles => ("Convertibles", 7),
    }
}
