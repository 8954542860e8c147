//! Shape generators producing SVG path data: the pie layout, annular sectors and polylines.
//!
//! Output follows d3-shape (three fractional digits, same command sequence), so paths are
//! comparable with what the browser version of these charts draws.

use crate::svg::fmt_path_into;
use serde::{Deserialize, Serialize};
use sirenia_core::geom::polar;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

const PATH_EPSILON: f64 = 1e-6;
const ARC_EPSILON: f64 = 1e-12;

/// Accumulates path commands the way a canvas-style path context does.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    d: String,
    start: (f64, f64),
    current: Option<(f64, f64)>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, cmd: char, nums: &[f64]) {
        self.d.push(cmd);
        for (i, v) in nums.iter().enumerate() {
            if i > 0 {
                self.d.push(',');
            }
            fmt_path_into(&mut self.d, *v);
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.start = (x, y);
        self.current = Some((x, y));
        self.push('M', &[x, y]);
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.current = Some((x, y));
        self.push('L', &[x, y]);
    }

    pub fn close_path(&mut self) {
        if self.current.is_some() {
            self.current = Some(self.start);
            self.d.push('Z');
        }
    }

    /// Circular arc around `(x, y)` from angle `a0` to `a1` (radians, 0 = 3 o'clock).
    pub fn arc(&mut self, x: f64, y: f64, r: f64, a0: f64, a1: f64, ccw: bool) {
        let dx = r * a0.cos();
        let dy = r * a0.sin();
        let x0 = x + dx;
        let y0 = y + dy;
        let cw = if ccw { 0.0 } else { 1.0 };
        let mut da = if ccw { a0 - a1 } else { a1 - a0 };

        match self.current {
            None => self.move_to(x0, y0),
            Some((cx, cy)) => {
                if (cx - x0).abs() > PATH_EPSILON || (cy - y0).abs() > PATH_EPSILON {
                    self.line_to(x0, y0);
                }
            }
        }

        if r == 0.0 {
            return;
        }
        if da < 0.0 {
            da = da % TAU + TAU;
        }

        if da > TAU - PATH_EPSILON {
            self.push('A', &[r, r, 0.0, 1.0, cw, x - dx, y - dy]);
            self.push('A', &[r, r, 0.0, 1.0, cw, x0, y0]);
            self.current = Some((x0, y0));
        } else if da > PATH_EPSILON {
            let x1 = x + r * a1.cos();
            let y1 = y + r * a1.sin();
            let large = if da >= PI { 1.0 } else { 0.0 };
            self.push('A', &[r, r, 0.0, large, cw, x1, y1]);
            self.current = Some((x1, y1));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }

    pub fn finish(self) -> String {
        self.d
    }
}

/// One sector of a pie layout. Angles are radians, clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieArc {
    /// Position in the input sequence.
    pub index: usize,
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub pad_angle: f64,
}

impl PieArc {
    /// Center of the sector at radius `r`, in SVG coordinates.
    pub fn centroid(&self, r: f64) -> (f64, f64) {
        polar(r, (self.start_angle + self.end_angle) / 2.0).to_tuple()
    }
}

/// Unsorted pie layout over the full circle.
///
/// Non-positive values get an empty sector (plus padding); the padding per sector is capped so
/// the pads never exceed the circle.
pub fn pie(values: &[f64], pad_angle: f64) -> Vec<PieArc> {
    let n = values.len();
    let da = TAU;
    let p = if n == 0 {
        pad_angle
    } else {
        (da / n as f64).min(pad_angle)
    };
    let sum: f64 = values.iter().filter(|v| **v > 0.0).sum();
    let k = if sum != 0.0 {
        (da - n as f64 * p) / sum
    } else {
        0.0
    };

    let mut a0 = 0.0;
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            let a1 = a0 + if value > 0.0 { value * k } else { 0.0 } + p;
            let arc = PieArc {
                index,
                value,
                start_angle: a0,
                end_angle: a1,
                pad_angle: p,
            };
            a0 = a1;
            arc
        })
        .collect()
}

/// Path of an annular sector (no corner rounding), padded by `arc.pad_angle`.
pub fn arc_path(inner_radius: f64, outer_radius: f64, arc: &PieArc) -> String {
    let (mut r0, mut r1) = (inner_radius, outer_radius);
    if r1 < r0 {
        std::mem::swap(&mut r0, &mut r1);
    }
    let a0 = arc.start_angle - FRAC_PI_2;
    let a1 = arc.end_angle - FRAC_PI_2;
    let da = (a1 - a0).abs();
    let cw = a1 > a0;

    let mut path = PathBuilder::new();
    if !(r1 > ARC_EPSILON) {
        path.move_to(0.0, 0.0);
    } else if da > TAU - ARC_EPSILON {
        path.move_to(r1 * a0.cos(), r1 * a0.sin());
        path.arc(0.0, 0.0, r1, a0, a1, !cw);
        if r0 > ARC_EPSILON {
            path.move_to(r0 * a1.cos(), r0 * a1.sin());
            path.arc(0.0, 0.0, r0, a1, a0, cw);
        }
    } else {
        let (mut a01, mut a11, mut a00, mut a10) = (a0, a1, a0, a1);
        let (mut da0, mut da1) = (da, da);
        let ap = arc.pad_angle / 2.0;
        let rp = if ap > ARC_EPSILON {
            (r0 * r0 + r1 * r1).sqrt()
        } else {
            0.0
        };

        if rp > ARC_EPSILON {
            let sign = if cw { 1.0 } else { -1.0 };
            let p0 = (rp / r0 * ap.sin()).asin();
            let p1 = (rp / r1 * ap.sin()).asin();
            da0 -= p0 * 2.0;
            if da0 > ARC_EPSILON {
                a00 += p0 * sign;
                a10 -= p0 * sign;
            } else {
                da0 = 0.0;
                a00 = (a0 + a1) / 2.0;
                a10 = a00;
            }
            da1 -= p1 * 2.0;
            if da1 > ARC_EPSILON {
                a01 += p1 * sign;
                a11 -= p1 * sign;
            } else {
                da1 = 0.0;
                a01 = (a0 + a1) / 2.0;
                a11 = a01;
            }
        }

        let x01 = r1 * a01.cos();
        let y01 = r1 * a01.sin();
        let x10 = r0 * a10.cos();
        let y10 = r0 * a10.sin();

        path.move_to(x01, y01);
        if da1 > ARC_EPSILON {
            path.arc(0.0, 0.0, r1, a01, a11, !cw);
        }
        if !(r0 > ARC_EPSILON) || !(da0 > ARC_EPSILON) {
            path.line_to(x10, y10);
        } else {
            path.arc(0.0, 0.0, r0, a10, a00, cw);
        }
    }
    path.close_path();
    path.finish()
}

/// Interpolation between consecutive line points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Curve {
    #[default]
    Linear,
    /// Horizontal-vertical-horizontal steps changing value halfway between points.
    Step,
}

/// Polyline through `points`; `None` entries are gaps that split the line into segments.
///
/// Returns `None` when no point is defined. A segment made of a single point is emitted as a
/// closed zero-length subpath so round line caps still draw a dot.
pub fn line_path(points: &[Option<(f64, f64)>], curve: Curve) -> Option<String> {
    let mut path = PathBuilder::new();
    for segment in points.split(|p| p.is_none()) {
        let segment: Vec<(f64, f64)> = segment.iter().flatten().copied().collect();
        let Some(&(x0, y0)) = segment.first() else {
            continue;
        };
        path.move_to(x0, y0);
        let mut prev = (x0, y0);
        for &(x, y) in &segment[1..] {
            match curve {
                Curve::Linear => path.line_to(x, y),
                Curve::Step => {
                    let xm = prev.0 * 0.5 + x * 0.5;
                    path.line_to(xm, prev.1);
                    path.line_to(xm, y);
                }
            }
            prev = (x, y);
        }
        match (curve, segment.len()) {
            (_, 1) => path.close_path(),
            (Curve::Step, _) => path.line_to(prev.0, prev.1),
            (Curve::Linear, _) => {}
        }
    }
    if path.is_empty() {
        None
    } else {
        Some(path.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_value_pie_is_a_full_ring() {
        let arcs = pie(&[5.0], 0.0);
        assert_eq!(arcs.len(), 1);
        assert!((arcs[0].end_angle - TAU).abs() < 1e-12);
        let d = arc_path(30.0, 50.0, &arcs[0]);
        assert_eq!(
            d,
            "M0,-50A50,50,0,1,1,0,50A50,50,0,1,1,0,-50M0,-30A30,30,0,1,0,0,30A30,30,0,1,0,0,-30Z"
        );
    }

    #[test]
    fn pie_spreads_angles_by_value() {
        let arcs = pie(&[1.0, 1.0, 2.0], 0.0);
        assert!((arcs[0].end_angle - TAU / 4.0).abs() < 1e-12);
        assert!((arcs[1].end_angle - TAU / 2.0).abs() < 1e-12);
        assert!((arcs[2].end_angle - TAU).abs() < 1e-12);
    }

    #[test]
    fn pie_gives_non_positive_values_only_padding() {
        let arcs = pie(&[0.0, -3.0, 4.0], 0.01);
        assert!((arcs[0].end_angle - arcs[0].start_angle - 0.01).abs() < 1e-12);
        assert!((arcs[1].end_angle - arcs[1].start_angle - 0.01).abs() < 1e-12);
        assert!((arcs[2].end_angle - TAU).abs() < 1e-9);
    }

    #[test]
    fn quarter_sector_without_padding() {
        let arc = PieArc {
            index: 0,
            value: 1.0,
            start_angle: 0.0,
            end_angle: FRAC_PI_2,
            pad_angle: 0.0,
        };
        assert_eq!(arc_path(0.0, 10.0, &arc), "M0,-10A10,10,0,0,1,10,0L0,0Z");
        assert_eq!(
            arc_path(5.0, 10.0, &arc),
            "M0,-10A10,10,0,0,1,10,0L5,0A5,5,0,0,0,0,-5Z"
        );
    }

    #[test]
    fn linear_line_splits_on_gaps() {
        let pts = [Some((0.0, 0.0)), Some((10.0, 5.0)), None, Some((20.0, 1.0))];
        assert_eq!(
            line_path(&pts, Curve::Linear).as_deref(),
            Some("M0,0L10,5M20,1Z")
        );
        assert_eq!(line_path(&[None, None], Curve::Linear), None);
        assert_eq!(line_path(&[], Curve::Step), None);
    }

    #[test]
    fn step_line_turns_halfway() {
        let pts = [Some((0.0, 0.0)), Some((10.0, 5.0))];
        assert_eq!(
            line_path(&pts, Curve::Step).as_deref(),
            Some("M0,0L5,0L5,5L10,5")
        );
    }

    #[test]
    fn centroid_sits_on_the_bisector() {
        let arc = PieArc {
            index: 0,
            value: 1.0,
            start_angle: 0.0,
            end_angle: PI,
            pad_angle: 0.0,
        };
        let (x, y) = arc.centroid(10.0);
        assert!((x - 10.0).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }
}
