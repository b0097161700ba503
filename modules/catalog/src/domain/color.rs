use crate::contract::model::BlockColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Parse six hex digits with an optional leading `#`, case-insensitive.
    pub fn parse_hex(raw: &str) -> Option<Self> {
        let hex = raw.strip_prefix('#').unwrap_or(raw);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;
        Some(Rgb([(value >> 16) as u8, (value >> 8) as u8, value as u8]))
    }

    /// Mean absolute per-channel difference.
    pub fn distance(self, other: [u8; 3]) -> f64 {
        let sum: u32 = self
            .0
            .iter()
            .zip(other.iter())
            .map(|(a, b)| u32::from(a.abs_diff(*b)))
            .sum();
        f64::from(sum) / 3.0
    }
}

/// Tolerances for dominant-color matching.
#[derive(Debug, Clone, Copy)]
pub struct ColorMatch {
    pub target: Rgb,
    /// Distance must be strictly below this.
    pub variance: f64,
    /// Dominance must be strictly above this.
    pub min_amount: f64,
}

impl ColorMatch {
    /// True when at least one color is close enough and dominant enough.
    pub fn matches(&self, colors: &[BlockColor]) -> bool {
        colors
            .iter()
            .any(|c| self.target.distance(c.color) < self.variance && c.amount > self.min_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey() -> Vec<BlockColor> {
        vec![BlockColor {
            color: [250, 250, 250],
            amount: 0.5,
        }]
    }

    #[test]
    fn parse_accepts_optional_hash_and_case() {
        assert_eq!(Rgb::parse_hex("#FaFaFa"), Some(Rgb([250, 250, 250])));
        assert_eq!(Rgb::parse_hex("102030"), Some(Rgb([16, 32, 48])));
        assert_eq!(Rgb::parse_hex("#12345"), None);
        assert_eq!(Rgb::parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn dominance_threshold_is_strict() {
        let m = ColorMatch {
            target: Rgb([250, 250, 250]),
            variance: 1.0,
            min_amount: 0.4,
        };
        assert!(m.matches(&grey()));
        assert!(!ColorMatch { min_amount: 0.6, ..m }.matches(&grey()));
        assert!(!ColorMatch { min_amount: 0.5, ..m }.matches(&grey()));
    }

    #[test]
    fn variance_threshold_is_strict() {
        let m = ColorMatch {
            target: Rgb([253, 250, 250]),
            variance: 1.0,
            min_amount: 0.1,
        };
        // distance is exactly 1.0
        assert!(!m.matches(&grey()));
        assert!(ColorMatch { variance: 1.01, ..m }.matches(&grey()));
    }

    #[test]
    fn no_colors_never_match() {
        let m = ColorMatch {
            target: Rgb([0, 0, 0]),
            variance: 255.0,
            min_amount: 0.0,
        };
        assert!(!m.matches(&[]));
    }
}
