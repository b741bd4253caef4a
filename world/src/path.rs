//! Catmull-Rom path followed by mobs and helpers.

use polygon_defence_core::{Playfield, WorldPoint, PATH_CONTROL_POINTS};

/// Number of samples used to approximate the arc length of the curve.
const ARC_LENGTH_DIVISIONS: usize = 200;

/// Spline through the path control points, scaled to a playfield.
///
/// Positions are looked up by travelled fraction of the total length, so equal
/// fractions always correspond to equal distances along the curve.
#[derive(Clone, Debug)]
pub(crate) struct PathCurve {
    points: Vec<WorldPoint>,
    arc_lengths: Vec<f32>,
}

impl PathCurve {
    /// Builds the mob path for the provided playfield.
    pub(crate) fn new(playfield: Playfield) -> Self {
        Self::from_points(
            PATH_CONTROL_POINTS
                .iter()
                .map(|point| point.to_world(playfield))
                .collect(),
        )
    }

    /// Builds a curve through arbitrary control points.
    pub(crate) fn from_points(points: Vec<WorldPoint>) -> Self {
        let mut curve = Self {
            points,
            arc_lengths: Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1),
        };
        curve.measure();
        curve
    }

    fn measure(&mut self) {
        self.arc_lengths.clear();
        self.arc_lengths.push(0.0);
        let mut previous = self.point_at_parameter(0.0);
        let mut total = 0.0;
        for division in 1..=ARC_LENGTH_DIVISIONS {
            let current = self.point_at_parameter(division as f32 / ARC_LENGTH_DIVISIONS as f32);
            total += previous.distance_to(current);
            self.arc_lengths.push(total);
            previous = current;
        }
    }

    /// Total arc length of the curve.
    pub(crate) fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Position reached after travelling `fraction` of the total length.
    pub(crate) fn point_at_fraction(&self, fraction: f32) -> WorldPoint {
        self.point_at_parameter(self.parameter_for_fraction(fraction))
    }

    /// Evenly spaced points along the curve, including both ends.
    pub(crate) fn polyline(&self, segments: usize) -> Vec<WorldPoint> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|index| self.point_at_fraction(index as f32 / segments as f32))
            .collect()
    }

    fn parameter_for_fraction(&self, fraction: f32) -> f32 {
        let last = self.arc_lengths.len().saturating_sub(1);
        if last == 0 {
            return 0.0;
        }

        let target = fraction.clamp(0.0, 1.0) * self.length();
        let upper = self.arc_lengths.partition_point(|length| *length < target);
        if upper == 0 {
            return 0.0;
        }
        if upper > last {
            return 1.0;
        }

        let lower = upper - 1;
        let before = self.arc_lengths[lower];
        let segment = self.arc_lengths[upper] - before;
        let within = if segment > 0.0 {
            (target - before) / segment
        } else {
            0.0
        };
        (lower as f32 + within) / last as f32
    }

    /// Evaluates the spline at parameter `t` in `[0, 1]`, clamping the
    /// neighbourhood at both ends.
    fn point_at_parameter(&self, t: f32) -> WorldPoint {
        let count = self.points.len();
        match count {
            0 => return WorldPoint::default(),
            1 => return self.points[0],
            _ => {}
        }

        let last = count - 1;
        let scaled = last as f32 * t.clamp(0.0, 1.0);
        let index = (scaled.floor() as usize).min(last);
        let weight = scaled - index as f32;

        let p0 = self.points[index.saturating_sub(1)];
        let p1 = self.points[index];
        let p2 = self.points[(index + 1).min(last)];
        let p3 = self.points[(index + 2).min(last)];

        WorldPoint::new(
            catmull_rom(weight, p0.x(), p1.x(), p2.x(), p3.x()),
            catmull_rom(weight, p0.y(), p1.y(), p2.y(), p3.y()),
        )
    }
}

fn catmull_rom(t: f32, p0: f32, p1: f32, p2: f32, p3: f32) -> f32 {
    let v0 = (p2 - p0) * 0.5;
    let v1 = (p3 - p1) * 0.5;
    let t2 = t * t;
    let t3 = t * t2;
    (2.0 * p1 - 2.0 * p2 + v0 + v1) * t3 + (-3.0 * p1 + 3.0 * p2 - 2.0 * v0 - v1) * t2 + v0 * t + p1
}
