//! Length units.

use super::numbers::lenient_float;

/// Absolute length units understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    Mm,
    Cm,
    In,
    Pt,
    Pc,
    #[default]
    Px,
}

impl Unit {
    const SUFFIXES: [(&'static str, Unit); 6] = [
        ("mm", Unit::Mm),
        ("cm", Unit::Cm),
        ("in", Unit::In),
        ("pt", Unit::Pt),
        ("pc", Unit::Pc),
        ("px", Unit::Px),
    ];

    /// Length of one `self` in inches. Pixels have no absolute size.
    fn inches(self) -> Option<f32> {
        match self {
            Unit::Mm => Some(1.0 / 25.4),
            Unit::Cm => Some(1.0 / 2.54),
            Unit::In => Some(1.0),
            Unit::Pt => Some(1.0 / 72.0),
            Unit::Pc => Some(1.0 / 6.0),
            Unit::Px => None,
        }
    }
}

/// Converts lengths into the loader's output unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    /// Output unit.
    pub unit: Unit,
    /// Pixels per inch used to relate pixels to physical units.
    pub dpi: f32,
}

impl UnitConverter {
    pub fn new(unit: Unit, dpi: f32) -> Self {
        Self { unit, dpi }
    }

    /// Scale factor from `from` into the output unit.
    pub fn scale(&self, from: Unit) -> f32 {
        match (from.inches(), self.unit.inches()) {
            (None, None) => 1.0,
            (None, Some(to)) => 1.0 / (self.dpi * to),
            (Some(from), None) => from * self.dpi,
            (Some(from), Some(to)) => from / to,
        }
    }

    /// Parse a length such as `"12.5mm"`. A missing suffix means pixels.
    ///
    /// Unknown suffixes are ignored, and text without a leading number yields NaN.
    pub fn parse(&self, value: &str) -> f32 {
        let value = value.trim();
        let (number, unit) = Unit::SUFFIXES
            .iter()
            .find_map(|(suffix, unit)| value.strip_suffix(suffix).map(|n| (n, *unit)))
            .unwrap_or((value, Unit::Px));
        self.scale(unit) * lenient_float(number)
    }
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::new(Unit::Px, 90.0)
    }
}
