//! Endless horizontal scrolling with two tiles per layer
//!
//! A ring is two equal segments laid edge to edge. Both slide left; once the
//! trailing segment is fully past the left edge of the viewport it jumps to
//! the right of the leading one and the two swap roles. The ring is stored
//! as a single left offset so the segments can never drift apart.

use glam::Vec2;

use crate::consts::VIEWPORT_LEFT;
use crate::platform::{Renderer, SpriteSpec, VisualId};
use crate::tuning::LayerTuning;

/// Two-segment tiling ring for one parallax layer
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRing {
    /// Left edge of the trailing segment
    offset: f32,
    /// On-screen width of one segment (width * scale)
    span: f32,
    y: f32,
    speed_factor: f32,
    /// `[trailing, leading]` host visuals
    visuals: [Option<VisualId>; 2],
    rotations: u64,
}

impl ScrollRing {
    pub fn new(segment_width: f32, scale: f32, y: f32, speed_factor: f32) -> Self {
        Self {
            offset: VIEWPORT_LEFT,
            span: segment_width * scale,
            y,
            speed_factor,
            visuals: [None, None],
            rotations: 0,
        }
    }

    pub fn from_tuning(layer: &LayerTuning) -> Self {
        Self::new(layer.segment_width, layer.scale, layer.y, layer.speed_factor)
    }

    /// Create both segment visuals at their starting positions
    pub fn attach<R: Renderer + ?Sized>(&mut self, renderer: &mut R, layer: &LayerTuning) {
        for slot in 0..2 {
            let spec = SpriteSpec {
                sprite: layer.sprite.clone(),
                pos: self.segment_pos(slot),
                scale: layer.scale,
                opacity: layer.opacity,
            };
            self.visuals[slot] = Some(renderer.spawn_sprite(&spec));
        }
    }

    /// Scroll by `speed * factor` px/s over `dt`, rotating as many times as needed.
    /// Returns the number of rotations.
    pub fn advance(&mut self, speed: f32, dt: f32) -> u32 {
        self.offset -= speed * self.speed_factor * dt;

        let mut rotated = 0;
        while self.offset + self.span < VIEWPORT_LEFT {
            // Trailing segment becomes the new leading one
            self.offset += self.span;
            self.visuals.swap(0, 1);
            rotated += 1;
        }
        self.rotations += rotated as u64;
        rotated
    }

    /// Push current segment positions to the host
    pub fn sync<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        for slot in 0..2 {
            if let Some(id) = self.visuals[slot] {
                renderer.move_to(id, self.segment_pos(slot));
            }
        }
    }

    /// World position of segment `slot` (0 = trailing, 1 = leading)
    #[inline]
    pub fn segment_pos(&self, slot: usize) -> Vec2 {
        Vec2::new(self.offset + self.span * slot as f32, self.y)
    }

    /// Both segment x positions, trailing first
    pub fn segment_xs(&self) -> [f32; 2] {
        [self.segment_pos(0).x, self.segment_pos(1).x]
    }

    #[inline]
    pub fn span(&self) -> f32 {
        self.span
    }

    /// Covered interval `[start, end)`
    pub fn coverage(&self) -> (f32, f32) {
        (self.offset, self.offset + 2.0 * self.span)
    }

    pub fn visuals(&self) -> [Option<VisualId>; 2] {
        self.visuals
    }

    pub fn rotations(&self) -> u64 {
        self.rotations
    }
}

/// Background and platform rings, scrolled together
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollManager {
    pub background: ScrollRing,
    pub platforms: ScrollRing,
}

impl ScrollManager {
    pub fn new(background: &LayerTuning, platforms: &LayerTuning) -> Self {
        Self {
            background: ScrollRing::from_tuning(background),
            platforms: ScrollRing::from_tuning(platforms),
        }
    }

    pub fn attach<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        background: &LayerTuning,
        platforms: &LayerTuning,
    ) {
        self.background.attach(renderer, background);
        self.platforms.attach(renderer, platforms);
    }

    /// Advance both layers at the raw game speed (each applies its own factor)
    pub fn advance(&mut self, speed: f32, dt: f32) {
        if self.background.advance(speed, dt) > 0 {
            log::debug!("background ring rotated ({} total)", self.background.rotations());
        }
        if self.platforms.advance(speed, dt) > 0 {
            log::debug!("platform ring rotated ({} total)", self.platforms.rotations());
        }
    }

    pub fn sync<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        self.background.sync(renderer);
        self.platforms.sync(renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_contiguous(ring: &ScrollRing) {
        let [trailing, leading] = ring.segment_xs();
        assert!((leading - (trailing + ring.span())).abs() < 1e-3);
    }

    #[test]
    fn test_platform_ring_rotates_after_one_span() {
        let layer = LayerTuning::platforms();
        let mut ring = ScrollRing::from_tuning(&layer);
        assert_eq!(ring.span(), 5120.0);
        assert_eq!(ring.segment_xs(), [0.0, 5120.0]);

        // Exactly one span: trailing right edge sits on the viewport edge, no rotation yet
        assert_eq!(ring.advance(5120.0, 1.0), 0);
        assert_eq!(ring.segment_xs(), [-5120.0, 0.0]);

        assert_eq!(ring.advance(10.0, 1.0), 1);
        assert_eq!(ring.segment_xs(), [-10.0, 5110.0]);
        assert_contiguous(&ring);
    }

    #[test]
    fn test_rotation_swaps_visuals() {
        let mut ring = ScrollRing::new(100.0, 1.0, 0.0, 1.0);
        ring.visuals = [Some(VisualId(1)), Some(VisualId(2))];
        ring.advance(150.0, 1.0);
        assert_eq!(ring.visuals(), [Some(VisualId(2)), Some(VisualId(1))]);
        assert_eq!(ring.rotations(), 1);
    }

    #[test]
    fn test_background_uses_parallax_factor() {
        let layer = LayerTuning::background();
        let mut ring = ScrollRing::from_tuning(&layer);
        ring.advance(300.0, 1.0);
        assert!((ring.segment_xs()[0] + 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_huge_step_rotates_repeatedly() {
        let mut ring = ScrollRing::new(100.0, 1.0, 0.0, 1.0);
        assert_eq!(ring.advance(450.0, 1.0), 4);
        assert_eq!(ring.segment_xs(), [-50.0, 50.0]);
    }

    proptest! {
        #[test]
        fn prop_rings_stay_contiguous_and_cover_viewport(
            speeds in proptest::collection::vec(0.0f32..3000.0, 1..200)
        ) {
            let mut manager = ScrollManager::new(&LayerTuning::background(), &LayerTuning::platforms());
            for speed in speeds {
                manager.advance(speed, crate::consts::SIM_DT);
                for ring in [&manager.background, &manager.platforms] {
                    let [trailing, leading] = ring.segment_xs();
                    prop_assert!((leading - (trailing + ring.span())).abs() < 1e-2);
                    let (start, end) = ring.coverage();
                    prop_assert!(start <= VIEWPORT_LEFT);
                    prop_assert!(start + ring.span() >= VIEWPORT_LEFT);
                    prop_assert!((end - start - 2.0 * ring.span()).abs() < 1e-2);
                }
            }
        }
    }
}
