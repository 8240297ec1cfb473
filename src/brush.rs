// Brush geometry: turns pointer motion into the shapes a batch leaves on
// the canvas. Pure math, no surface access; the engine feeds the results
// to the rasterizer.
//
// The radius model: fast strokes leave big marks, slow strokes small ones.
//   speed  = distance / (elapsed + 20)       the +20 keeps the denominator
//                                            away from zero on sub-ms deltas
//   radius = min_radius * (speed + 0.2)
// The very first sample of a gesture ignores the formula and paints at the
// minimum radius (there is no trustworthy previous point yet).

use crate::types::{BrushType, PointerBatch, Shape, TouchSample};

/// Per-batch motion numbers. Computed once and reused for every sample in
/// the batch, historical ones included.
#[derive(Clone, Copy, Debug)]
pub struct Kinematics {
    pub speed: f32,
    pub radius: f32,
}

/// Motion of `curr` relative to the tracked previous point. With no prior
/// point the current sample doubles as the previous one, forcing the
/// distance to zero.
pub fn kinematics(
    prior: Option<(f32, f32, i64)>,
    curr: &TouchSample,
    min_radius: f32,
) -> Kinematics {
    let (last_x, last_y, last_t) = prior.unwrap_or((curr.x, curr.y, curr.time_ms));
    let dx = curr.x - last_x;
    let dy = curr.y - last_y;
    let distance = (dx * dx + dy * dy).sqrt();
    let elapsed = (curr.time_ms - last_t + 20) as f32;
    let speed = distance / elapsed;
    Kinematics {
        speed,
        radius: min_radius * (speed + 0.2),
    }
}

/// The shapes one batch rasterizes, in draw order: historical sub-samples
/// oldest to newest, then the final sample. Terminal batches (up/cancel)
/// leave no marks.
pub fn batch_shapes(
    brush: BrushType,
    prior: Option<(f32, f32, i64)>,
    batch: &PointerBatch,
    min_radius: f32,
) -> Vec<Shape> {
    if batch.action.is_terminal() {
        return Vec::new();
    }

    let kin = kinematics(prior, &batch.sample, min_radius);

    match brush {
        BrushType::Circle => {
            let radius = if batch.action.is_start() {
                min_radius
            } else {
                kin.radius
            };
            samples(batch)
                .map(|s| Shape::Disc {
                    cx: s.x,
                    cy: s.y,
                    radius,
                })
                .collect()
        }
        BrushType::Square => {
            let half = if batch.action.is_start() {
                min_radius
            } else {
                kin.radius
            };
            samples(batch)
                .map(|s| Shape::Square {
                    cx: s.x,
                    cy: s.y,
                    half,
                })
                .collect()
        }
        BrushType::Line => {
            // Only the final sample gets a mark; historical sub-samples
            // are not separately segmented for this brush.
            let speed = if batch.action.is_start() { 1.0 } else { kin.speed };
            let (last_x, last_y) = prior
                .map(|(x, y, _)| (x, y))
                .unwrap_or((batch.sample.x, batch.sample.y));
            let dx = batch.sample.x - last_x;
            let dy = batch.sample.y - last_y;
            vec![perpendicular_segment(
                batch.sample.x,
                batch.sample.y,
                dx,
                dy,
                speed,
            )]
        }
    }
}

/// Historical sub-samples oldest first, then the final sample.
fn samples(batch: &PointerBatch) -> impl Iterator<Item = &TouchSample> {
    batch.history.iter().chain(std::iter::once(&batch.sample))
}

/// Floor for denominators in the perpendicular construction. Axis-aligned
/// motion would otherwise send the slope to zero or infinity.
const AXIS_EPS: f32 = 1e-3;

#[inline]
fn clamped_from_zero(v: f32) -> f32 {
    if v.abs() >= AXIS_EPS {
        v
    } else if v.is_sign_negative() {
        -AXIS_EPS
    } else {
        AXIS_EPS
    }
}

/// A segment through (x, y) perpendicular to the motion vector (dx, dy),
/// spanning `1500 * (speed + 1)` in squared half-extent. The slope of the
/// perpendicular is the negative reciprocal of the motion slope; both it
/// and the motion's y component are clamped away from zero so horizontal
/// motion yields a near-vertical segment (and vertical motion a near-
/// horizontal one) instead of non-finite endpoints.
fn perpendicular_segment(x: f32, y: f32, dx: f32, dy: f32, speed: f32) -> Shape {
    let factor = 1500.0 * (speed + 1.0);
    let m = clamped_from_zero(-dx / clamped_from_zero(dy));
    let half_x = (factor / (1.0 + m * m)).sqrt();
    let half_y = (factor / (1.0 + 1.0 / (m * m))).sqrt();
    Shape::Segment {
        x0: x - half_x,
        y0: y + half_y,
        x1: x + half_x,
        y1: y - half_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PointerAction;
    use approx::assert_relative_eq;

    const MIN_RADIUS: f32 = 8.0;

    fn batch(action: PointerAction, x: f32, y: f32, time_ms: i64) -> PointerBatch {
        PointerBatch {
            pointer_id: 0,
            action,
            history: Vec::new(),
            sample: TouchSample::new(x, y, time_ms),
        }
    }

    fn segment_parts(shape: &Shape) -> (f32, f32, f32, f32) {
        match *shape {
            Shape::Segment { x0, y0, x1, y1 } => (x0, y0, x1, y1),
            ref other => panic!("expected segment, got {other:?}"),
        }
    }

    #[test]
    fn down_forces_minimum_radius_even_after_fast_motion() {
        // A prior point far away and long ago would give a huge radius.
        let prior = Some((500.0, 500.0, 0));
        let b = batch(PointerAction::Down, 10.0, 10.0, 100_000);
        let shapes = batch_shapes(BrushType::Circle, prior, &b, MIN_RADIUS);
        assert_eq!(shapes.len(), 1);
        match shapes[0] {
            Shape::Disc { radius, .. } => assert_eq!(radius, MIN_RADIUS),
            ref other => panic!("expected disc, got {other:?}"),
        }
    }

    #[test]
    fn move_radius_follows_the_velocity_formula() {
        // 100 px in 80 ms: elapsed = 100, speed = 1.0, radius = 8 * 1.2.
        let prior = Some((0.0, 0.0, 0));
        let b = batch(PointerAction::Move, 100.0, 0.0, 80);
        let kin = kinematics(prior, &b.sample, MIN_RADIUS);
        assert_relative_eq!(kin.speed, 1.0);
        assert_relative_eq!(kin.radius, 9.6, epsilon = 1e-5);
    }

    #[test]
    fn first_move_without_prior_point_degenerates_to_zero_speed() {
        let b = batch(PointerAction::Move, 40.0, 40.0, 12345);
        let kin = kinematics(None, &b.sample, MIN_RADIUS);
        assert_eq!(kin.speed, 0.0);
        assert_relative_eq!(kin.radius, MIN_RADIUS * 0.2);
    }

    #[test]
    fn historical_samples_come_before_the_final_one() {
        let mut b = batch(PointerAction::Move, 3.0, 3.0, 60);
        b.history = vec![TouchSample::new(1.0, 1.0, 20), TouchSample::new(2.0, 2.0, 40)];
        let shapes = batch_shapes(BrushType::Square, Some((0.0, 0.0, 0)), &b, MIN_RADIUS);
        let centers: Vec<(f32, f32)> = shapes
            .iter()
            .map(|s| match *s {
                Shape::Square { cx, cy, .. } => (cx, cy),
                ref other => panic!("expected square, got {other:?}"),
            })
            .collect();
        assert_eq!(centers, vec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
    }

    #[test]
    fn terminal_batches_leave_no_marks() {
        for action in [PointerAction::Up, PointerAction::Cancel] {
            let b = batch(action, 5.0, 5.0, 100);
            assert!(batch_shapes(BrushType::Circle, Some((0.0, 0.0, 0)), &b, MIN_RADIUS).is_empty());
        }
    }

    #[test]
    fn line_segment_is_perpendicular_and_centered() {
        // Motion (30, 40) over 30 ms: distance 50, elapsed 50, speed 1.
        let prior = Some((0.0, 0.0, 0));
        let b = batch(PointerAction::Move, 30.0, 40.0, 30);
        let shapes = batch_shapes(BrushType::Line, prior, &b, MIN_RADIUS);
        assert_eq!(shapes.len(), 1);
        let (x0, y0, x1, y1) = segment_parts(&shapes[0]);

        // centered on the current sample
        assert_relative_eq!((x0 + x1) / 2.0, 30.0, epsilon = 1e-3);
        assert_relative_eq!((y0 + y1) / 2.0, 40.0, epsilon = 1e-3);

        // perpendicular to the motion vector
        let dot = (x1 - x0) * 30.0 + (y1 - y0) * 40.0;
        assert_relative_eq!(dot, 0.0, epsilon = 0.1);

        // squared length = 4 * 1500 * (speed + 1) with speed = 1
        let len2 = (x1 - x0).powi(2) + (y1 - y0).powi(2);
        assert_relative_eq!(len2, 4.0 * 3000.0, epsilon = 1.0);
    }

    #[test]
    fn line_down_override_fixes_the_segment_length() {
        // No prior point and a down action: speed forced to 1.
        let b = batch(PointerAction::Down, 50.0, 50.0, 0);
        let shapes = batch_shapes(BrushType::Line, None, &b, MIN_RADIUS);
        let (x0, y0, x1, y1) = segment_parts(&shapes[0]);
        assert!(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite());
        let len2 = (x1 - x0).powi(2) + (y1 - y0).powi(2);
        assert_relative_eq!(len2, 4.0 * 3000.0, epsilon = 1.0);
    }

    #[test]
    fn horizontal_motion_yields_a_finite_near_vertical_segment() {
        let prior = Some((0.0, 0.0, 0));
        let b = batch(PointerAction::Move, 50.0, 0.0, 30);
        let shapes = batch_shapes(BrushType::Line, prior, &b, MIN_RADIUS);
        let (x0, y0, x1, y1) = segment_parts(&shapes[0]);
        assert!(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite());
        assert!((y1 - y0).abs() > 100.0 * (x1 - x0).abs());
    }

    #[test]
    fn vertical_motion_yields_a_finite_near_horizontal_segment() {
        let prior = Some((0.0, 0.0, 0));
        let b = batch(PointerAction::Move, 0.0, 50.0, 30);
        let shapes = batch_shapes(BrushType::Line, prior, &b, MIN_RADIUS);
        let (x0, y0, x1, y1) = segment_parts(&shapes[0]);
        assert!(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite());
        assert!((x1 - x0).abs() > 100.0 * (y1 - y0).abs());
    }
}
