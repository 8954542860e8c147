pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

/// Point on a circle using the chart convention: angle zero at 12 o'clock, clockwise, y down.
pub fn polar(radius: f64, angle: f64) -> Point {
    point(radius * angle.sin(), -radius * angle.cos())
}
