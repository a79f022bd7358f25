//! Overlay animation effects.

use std::f32::consts::TAU;

use ratatui::layout::Rect;

use fortuna_types::ui::{OverlayEffect, OverlayEffectKind};

/// Apply an overlay effect to transform the base rectangle.
#[must_use]
pub fn apply_overlay_effect(effect: &OverlayEffect, base: Rect, viewport: Rect) -> Rect {
    match effect.kind() {
        OverlayEffectKind::PopScale => {
            let t = ease_out_cubic(effect.progress());
            let scale = 0.6 + 0.4 * t;
            scale_rect(base, scale)
        }
        OverlayEffectKind::SlideUp => {
            let t = ease_out_cubic(effect.progress());
            let viewport_bottom = viewport.y.saturating_add(viewport.height);
            let base_bottom = base.y.saturating_add(base.height);
            let max_offset = viewport_bottom.saturating_sub(base_bottom);
            let offset = max_offset.min(base.height.saturating_div(2)).min(6);
            let y_offset = ((1.0 - t) * f32::from(offset)).round() as u16;
            Rect {
                y: base.y.saturating_add(y_offset),
                ..base
            }
        }
        OverlayEffectKind::Shake => {
            let t = effect.progress().clamp(0.0, 1.0);
            let decay = 1.0 - t;
            let oscillations = 4.0;
            let amplitude = 3.0;
            let offset = (f32::sin(t * TAU * oscillations) * amplitude * decay).round() as i32;
            let viewport_left = i32::from(viewport.x);
            let viewport_right = i32::from(viewport.x) + i32::from(viewport.width);
            let max_x = (viewport_right - i32::from(base.width)).max(viewport_left);
            let x = (i32::from(base.x) + offset).clamp(viewport_left, max_x) as u16;
            Rect { x, ..base }
        }
    }
}

fn scale_rect(base: Rect, scale: f32) -> Rect {
    let width = (f32::from(base.width) * scale).round() as u16;
    let height = (f32::from(base.height) * scale).round() as u16;
    let width = width.max(1).min(base.width);
    let height = height.max(1).min(base.height);
    let x = base.x + (base.width.saturating_sub(width) / 2);
    let y = base.y + (base.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use fortuna_types::OverlayKind;
    use fortuna_types::ui::{OverlayEffect, OverlayEffectKind};
    use ratatui::layout::Rect;

    use super::apply_overlay_effect;

    const VIEWPORT: Rect = Rect::new(0, 0, 80, 24);
    const BASE: Rect = Rect::new(20, 8, 40, 8);

    #[test]
    fn pop_starts_small_and_settles_on_base() {
        let mut effect = OverlayEffect::new(OverlayEffectKind::PopScale, Duration::from_millis(200));
        let start = apply_overlay_effect(&effect, BASE, VIEWPORT);
        assert!(start.width < BASE.width);
        assert!(start.height < BASE.height);

        effect.advance(Duration::from_millis(200));
        assert_eq!(apply_overlay_effect(&effect, BASE, VIEWPORT), BASE);
    }

    #[test]
    fn slide_up_moves_toward_base() {
        let mut effect = OverlayEffect::for_slot(OverlayKind::TurnChange, false);
        assert_eq!(effect.kind(), OverlayEffectKind::SlideUp);
        let start = apply_overlay_effect(&effect, BASE, VIEWPORT);
        assert!(start.y > BASE.y);

        effect.advance(Duration::from_secs(5));
        assert_eq!(apply_overlay_effect(&effect, BASE, VIEWPORT), BASE);
    }

    #[test]
    fn shake_stays_inside_viewport() {
        let mut effect = OverlayEffect::new(OverlayEffectKind::Shake, Duration::from_millis(400));
        let edge = Rect::new(0, 8, 40, 8);
        for _ in 0..20 {
            let rect = apply_overlay_effect(&effect, edge, VIEWPORT);
            assert!(rect.x + rect.width <= VIEWPORT.width);
            assert_eq!(rect.y, edge.y);
            effect.advance(Duration::from_millis(20));
        }
    }
}
