use crate::vecmath::Vector2;

/// A render surface owned by the animation driver.
///
/// The driver clears it once per tick and then draws one circle per body.
/// Coordinates are world coordinates with the origin at the top-left corner.
pub trait Canvas {
    /// Erases everything drawn during the previous tick.
    fn clear(&mut self);

    /// Draws a circle outline centred at `center`.
    fn draw_circle(&mut self, center: Vector2, radius: f64, fixed: bool);
}
