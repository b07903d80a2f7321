use winit::dpi::{PhysicalPosition, PhysicalSize};

/// How quickly the smoothed pointer approaches its target, in units of
/// inverse seconds.
const APPROACH_RATE: f32 = 8.0;

/// Per-instance pointer state feeding the `uPointer` uniform.
///
/// Cursor events only move the target; the position actually handed to the
/// shader eases toward it once per frame so the field reacts without
/// snapping. The easing factor is `min(1, dt * 8)`, which is independent of
/// frame rate, approaches the target asymptotically, and never overshoots.
#[derive(Debug, Default)]
pub(crate) struct PointerTracker {
    current: [f32; 2],
    target: [f32; 2],
}

impl PointerTracker {
    /// Updates the target from a cursor position in window coordinates.
    ///
    /// Output is normalized device coordinates: [-1,1] per axis with +Y up,
    /// so the flip from winit's top-left origin happens here.
    pub(crate) fn handle_cursor_moved(
        &mut self,
        position: PhysicalPosition<f64>,
        size: PhysicalSize<u32>,
    ) {
        let width = size.width.max(1) as f32;
        let height = size.height.max(1) as f32;
        let x = (position.x as f32 / width) * 2.0 - 1.0;
        let y = -((position.y as f32 / height) * 2.0 - 1.0);
        self.target = [x, y];
    }

    /// Eases the smoothed position toward the target by one frame of `dt`
    /// seconds.
    pub(crate) fn advance(&mut self, dt: f32) {
        let alpha = (dt * APPROACH_RATE).clamp(0.0, 1.0);
        for axis in 0..2 {
            self.current[axis] += (self.target[axis] - self.current[axis]) * alpha;
        }
    }

    /// Smoothed pointer position for the uniform buffer.
    pub(crate) fn as_uniform(&self) -> [f32; 2] {
        self.current
    }

    #[cfg(test)]
    fn set_target(&mut self, target: [f32; 2]) {
        self.target = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_monotonically_toward_target() {
        let mut pointer = PointerTracker::default();
        pointer.set_target([1.0, -1.0]);
        let mut previous_distance = f32::MAX;
        for _ in 0..120 {
            pointer.advance(1.0 / 60.0);
            let [x, y] = pointer.as_uniform();
            let distance = ((1.0 - x).powi(2) + (-1.0 - y).powi(2)).sqrt();
            assert!(distance <= previous_distance);
            previous_distance = distance;
        }
        assert!(previous_distance < 1e-3);
    }

    #[test]
    fn never_exceeds_target_bounds() {
        let mut pointer = PointerTracker::default();
        pointer.set_target([1.0, 1.0]);
        for _ in 0..1000 {
            pointer.advance(0.5);
            let [x, y] = pointer.as_uniform();
            assert!((-1.0..=1.0).contains(&x));
            assert!((-1.0..=1.0).contains(&y));
        }
    }

    #[test]
    fn large_dt_lands_exactly_on_target() {
        let mut pointer = PointerTracker::default();
        pointer.set_target([-0.25, 0.75]);
        // dt * 8 >= 1 clamps the blend factor to 1, a full step.
        pointer.advance(1.0);
        assert_eq!(pointer.as_uniform(), [-0.25, 0.75]);
    }

    #[test]
    fn retargets_mid_flight() {
        let mut pointer = PointerTracker::default();
        pointer.set_target([1.0, 0.0]);
        pointer.advance(1.0 / 60.0);
        let mid = pointer.as_uniform();
        pointer.set_target([-1.0, 0.0]);
        pointer.advance(1.0 / 60.0);
        assert!(pointer.as_uniform()[0] < mid[0]);
    }

    #[test]
    fn cursor_event_maps_to_ndc_with_y_flipped() {
        let mut pointer = PointerTracker::default();
        let size = PhysicalSize::new(800, 600);
        pointer.handle_cursor_moved(PhysicalPosition::new(0.0, 0.0), size);
        pointer.advance(1.0);
        assert_eq!(pointer.as_uniform(), [-1.0, 1.0]);
        pointer.handle_cursor_moved(PhysicalPosition::new(800.0, 600.0), size);
        pointer.advance(1.0);
        assert_eq!(pointer.as_uniform(), [1.0, -1.0]);
        pointer.handle_cursor_moved(PhysicalPosition::new(400.0, 300.0), size);
        pointer.advance(1.0);
        assert_eq!(pointer.as_uniform(), [0.0, 0.0]);
    }

    #[test]
    fn event_does_not_snap_the_smoothed_position() {
        let mut pointer = PointerTracker::default();
        let size = PhysicalSize::new(100, 100);
        pointer.handle_cursor_moved(PhysicalPosition::new(100.0, 0.0), size);
        assert_eq!(pointer.as_uniform(), [0.0, 0.0]);
    }
}
