//! Numeric display trait

/// Largest value a 3-digit display can show
pub const DISPLAY_MAX: u16 = 999;

/// Trait for a small numeric display
///
/// The display owns no decision state; it renders whatever it was last
/// told. Refreshing the physical digits is the driver's business.
pub trait NumericDisplay {
    /// Show a number, right-aligned with leading positions blanked
    ///
    /// Values above [`DISPLAY_MAX`] are clamped.
    fn set_number(&mut self, value: u16);

    /// Light or clear the decimal point at `position`
    ///
    /// Position 0 is the leftmost digit. Out-of-range positions are
    /// ignored.
    fn set_decimal_point(&mut self, position: u8, on: bool);
}

impl<T: NumericDisplay + ?Sized> NumericDisplay for &mut T {
    fn set_number(&mut self, value: u16) {
        (**self).set_number(value)
    }

    fn set_decimal_point(&mut self, position: u8, on: bool) {
        (**self).set_decimal_point(position, on)
    }
}
