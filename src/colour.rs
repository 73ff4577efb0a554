use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A colour, expressed in RGB, CMYK or grey colour spaces. Colours travel through
/// configuration as `#rrggbb` hex strings.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK colour; c, m, y, and k range from 0.0 to 1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

/// Returned when a string is not a `#rgb` or `#rrggbb` hex colour
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a hex colour")]
pub struct InvalidColour(pub String);

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb` or the `#rgb` shorthand
    pub fn from_hex(hex: &str) -> Result<Colour, InvalidColour> {
        let invalid = || InvalidColour(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Colour::new_rgb_bytes(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                Ok(Colour::new_rgb_bytes(r * 17, g * 17, b * 17))
            }
            _ => Err(invalid()),
        }
    }

    /// The colour as 8-bit RGB channels, converting from CMYK or grey as needed
    pub fn to_rgb_bytes(self) -> [u8; 3] {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        match self {
            Colour::RGB { r, g, b } => [byte(r), byte(g), byte(b)],
            Colour::CMYK { c, m, y, k } => [
                byte((1.0 - c) * (1.0 - k)),
                byte((1.0 - m) * (1.0 - k)),
                byte((1.0 - y) * (1.0 - k)),
            ],
            Colour::Grey { g } => [byte(g); 3],
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.to_rgb_bytes();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl FromStr for Colour {
    type Err = InvalidColour;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Colour::from_hex(s.trim())
    }
}

impl TryFrom<String> for Colour {
    type Error = InvalidColour;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Colour> for String {
    fn from(c: Colour) -> Self {
        c.to_string()
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex() {
        assert_eq!(
            Colour::from_hex("#ff0000").unwrap(),
            Colour::RGB {
                r: 1.0,
                g: 0.0,
                b: 0.0
            }
        );
        assert_eq!(Colour::from_hex("#fff").unwrap().to_rgb_bytes(), [255; 3]);
        assert!(Colour::from_hex("000000").is_err());
        assert!(Colour::from_hex("#12345").is_err());
        assert!(Colour::from_hex("#gg0000").is_err());
    }

    #[test]
    fn displays_as_hex() {
        assert_eq!(colours::BLACK.to_string(), "#000000");
        assert_eq!(Colour::new_rgb_bytes(18, 52, 86).to_string(), "#123456");
        let cyan = Colour::CMYK {
            c: 1.0,
            m: 0.0,
            y: 0.0,
            k: 0.0,
        };
        assert_eq!(cyan.to_string(), "#00ffff");
    }

    #[test]
    fn serde_uses_hex_strings() {
        let c: Colour = serde_json::from_str("\"#336699\"").unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#336699\"");
        assert!(serde_json::from_str::<Colour>("\"blue\"").is_err());
    }
}
