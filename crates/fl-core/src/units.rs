use uom::si::f64::Length as UomLength;

/// SI length quantity.
pub type Length = UomLength;

/// Length units that appear in the `% Length unit:` line of simulation exports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthUnit {
    Kilometer,
    Meter,
    Centimeter,
    Millimeter,
    Micrometer,
    Nanometer,
    Inch,
    Foot,
}

impl LengthUnit {
    /// Parse an export unit tag ("m", "mm", "um", "µm", ...).
    pub fn parse(tag: &str) -> Option<Self> {
        let unit = match tag.trim() {
            "km" => Self::Kilometer,
            "m" => Self::Meter,
            "cm" => Self::Centimeter,
            "mm" => Self::Millimeter,
            "um" | "µm" | "μm" => Self::Micrometer,
            "nm" => Self::Nanometer,
            "in" => Self::Inch,
            "ft" => Self::Foot,
            _ => return None,
        };
        Some(unit)
    }

    /// Build a length quantity from a value expressed in this unit.
    pub fn length(self, v: f64) -> Length {
        use uom::si::length::{
            centimeter, foot, inch, kilometer, meter, micrometer, millimeter, nanometer,
        };
        match self {
            Self::Kilometer => Length::new::<kilometer>(v),
            Self::Meter => Length::new::<meter>(v),
            Self::Centimeter => Length::new::<centimeter>(v),
            Self::Millimeter => Length::new::<millimeter>(v),
            Self::Micrometer => Length::new::<micrometer>(v),
            Self::Nanometer => Length::new::<nanometer>(v),
            Self::Inch => Length::new::<inch>(v),
            Self::Foot => Length::new::<foot>(v),
        }
    }

    /// Multiplicative factor converting this unit to meters.
    pub fn meters_per_unit(self) -> f64 {
        use uom::si::length::meter;
        self.length(1.0).get::<meter>()
    }
}
