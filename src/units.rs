//! Physical units and the fixed factors that map them into rendering pixels and
//! PDF points.
//!
//! Label geometry is authored in a [`Unit`] (millimetres, centimetres, inches or
//! points). The on-screen preview and the rasterizer work in CSS-style pixels
//! ([`Px`], 96 per inch) while the PDF output works in points ([`Pt`], 72 per
//! inch). Every conversion is a single multiplication by a constant, so a value
//! converted into pixels or points and back again round-trips up to floating
//! point error.
//!
//! ```
//! use label_sheet::{to_pixels, to_points, from_pixels, Unit, In, Pt};
//!
//! let px = to_pixels(25.0, Unit::Millimeter);
//! assert!((from_pixels(px, Unit::Millimeter) - 25.0).abs() < 1e-4);
//!
//! assert_eq!(to_points(2.0, Unit::Inch), Pt(144.0));
//! assert_eq!(Pt::from(In(0.5)), Pt(36.0));
//! ```

use derive_more::{Add, AddAssign, Deref, DerefMut, Display, From, Into, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

/// Rendering pixels per millimetre
pub const PIXELS_PER_MM: f32 = 3.779528;
/// Rendering pixels per centimetre
pub const PIXELS_PER_CM: f32 = 37.79528;
/// Rendering pixels per inch
pub const PIXELS_PER_INCH: f32 = 96.0;
/// Rendering pixels per PDF point
pub const PIXELS_PER_POINT: f32 = 96.0 / 72.0;

/// PDF points per millimetre
pub const POINTS_PER_MM: f32 = 2.835;
/// PDF points per centimetre
pub const POINTS_PER_CM: f32 = 28.35;
/// PDF points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// The physical unit a label or page is authored in
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "mm")]
    Millimeter,
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "in")]
    Inch,
    #[serde(rename = "pt")]
    Point,
}

impl Unit {
    /// The scale factor from this unit into rendering pixels
    pub const fn pixels_per_unit(self) -> f32 {
        match self {
            Unit::Millimeter => PIXELS_PER_MM,
            Unit::Centimeter => PIXELS_PER_CM,
            Unit::Inch => PIXELS_PER_INCH,
            Unit::Point => PIXELS_PER_POINT,
        }
    }

    /// The scale factor from this unit into PDF points
    pub const fn points_per_unit(self) -> f32 {
        match self {
            Unit::Millimeter => POINTS_PER_MM,
            Unit::Centimeter => POINTS_PER_CM,
            Unit::Inch => POINTS_PER_INCH,
            Unit::Point => 1.0,
        }
    }

    /// Short suffix used when displaying values in this unit
    pub const fn suffix(self) -> &'static str {
        match self {
            Unit::Millimeter => "mm",
            Unit::Centimeter => "cm",
            Unit::Inch => "in",
            Unit::Point => "pt",
        }
    }
}

/// Convert a value in `unit` into rendering pixels
pub fn to_pixels(value: f32, unit: Unit) -> Px {
    Px(value * unit.pixels_per_unit())
}

/// Convert a value in `unit` into PDF points
pub fn to_points(value: f32, unit: Unit) -> Pt {
    Pt(value * unit.points_per_unit())
}

/// Convert rendering pixels back into `unit`
pub fn from_pixels(value: Px, unit: Unit) -> f32 {
    value.0 / unit.pixels_per_unit()
}

/// Convert PDF points back into `unit`
pub fn from_points(value: Pt, unit: Unit) -> f32 {
    value.0 / unit.points_per_unit()
}

/// A length in PDF points (1/72 inch)
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    Deref,
    DerefMut,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Pt(pub f32);

/// A length in rendering pixels (1/96 inch)
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    Deref,
    DerefMut,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Px(pub f32);

macro_rules! scalar_ops {
    ($t:ident) => {
        impl Mul<f32> for $t {
            type Output = $t;
            fn mul(self, rhs: f32) -> $t {
                $t(self.0 * rhs)
            }
        }

        impl Mul<$t> for f32 {
            type Output = $t;
            fn mul(self, rhs: $t) -> $t {
                $t(self * rhs.0)
            }
        }

        impl Div<f32> for $t {
            type Output = $t;
            fn div(self, rhs: f32) -> $t {
                $t(self.0 / rhs)
            }
        }

        /// Dividing two lengths yields a plain ratio
        impl Div<$t> for $t {
            type Output = f32;
            fn div(self, rhs: $t) -> f32 {
                self.0 / rhs.0
            }
        }

        impl $t {
            /// The larger of two lengths
            pub fn max(self, other: $t) -> $t {
                $t(self.0.max(other.0))
            }

            /// The smaller of two lengths
            pub fn min(self, other: $t) -> $t {
                $t(self.0.min(other.0))
            }
        }
    };
}

scalar_ops!(Pt);
scalar_ops!(Px);

/// Inches, convertible into [Pt]
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, From, Into)]
pub struct In(pub f32);

impl From<In> for Pt {
    fn from(v: In) -> Pt {
        to_points(v.0, Unit::Inch)
    }
}

impl From<Pt> for Px {
    fn from(v: Pt) -> Px {
        to_pixels(v.0, Unit::Point)
    }
}

impl From<Px> for Pt {
    fn from(v: Px) -> Pt {
        Pt(from_pixels(v, Unit::Point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNITS: [Unit; 4] = [Unit::Millimeter, Unit::Centimeter, Unit::Inch, Unit::Point];

    #[test]
    fn pixel_round_trip_is_lossless() {
        for unit in UNITS {
            let px = to_pixels(1.0, unit);
            assert!((from_pixels(px, unit) - 1.0).abs() < 1e-6, "{unit:?}");
        }
    }

    #[test]
    fn point_round_trip_is_lossless() {
        for unit in UNITS {
            let pt = to_points(37.5, unit);
            assert!((from_points(pt, unit) - 37.5).abs() < 1e-4, "{unit:?}");
        }
    }

    #[test]
    fn fixed_factors() {
        assert_eq!(to_pixels(1.0, Unit::Inch), Px(96.0));
        assert_eq!(to_points(1.0, Unit::Inch), Pt(72.0));
        assert_eq!(to_points(10.0, Unit::Point), Pt(10.0));
        assert!((*to_points(10.0, Unit::Millimeter) - 28.35).abs() < 1e-4);
        assert!((*to_pixels(1.0, Unit::Centimeter) - 37.79528).abs() < 1e-4);
    }

    #[test]
    fn points_and_pixels_agree_on_inches() {
        let px: Px = Pt(72.0).into();
        assert!((*px - 96.0).abs() < 1e-4);
        let pt: Pt = Px(48.0).into();
        assert!((*pt - 36.0).abs() < 1e-4);
    }

    #[test]
    fn arithmetic() {
        let total: Pt = [Pt(1.0), Pt(2.0), Pt(3.5)].into_iter().sum();
        assert_eq!(total, Pt(6.5));
        assert_eq!(Pt(10.0) * 2.0, Pt(20.0));
        assert_eq!(Pt(10.0) / Pt(4.0), 2.5);
        assert_eq!(Px(3.0).max(Px(4.0)), Px(4.0));
    }

    #[test]
    fn units_serialize_as_suffixes() {
        let json = serde_json::to_string(&Unit::Centimeter).unwrap();
        assert_eq!(json, "\"cm\"");
        let unit: Unit = serde_json::from_str("\"in\"").unwrap();
        assert_eq!(unit, Unit::Inch);
        assert_eq!(unit.suffix(), "in");
    }
}
