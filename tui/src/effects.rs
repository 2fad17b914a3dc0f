//! Modal animation effects for TUI overlays.

use ratatui::layout::Rect;

use skillpath_engine::{AnimPhase, ModalEffect, ModalEffectKind};

fn progress(effect: &ModalEffect) -> f32 {
    match effect.phase() {
        AnimPhase::Running { progress } => progress,
        AnimPhase::Completed => 1.0,
    }
}

/// Apply a modal effect to transform the base rectangle.
#[must_use]
pub fn apply_modal_effect(effect: &ModalEffect, base: Rect, viewport: Rect) -> Rect {
    match effect.kind() {
        ModalEffectKind::PopScale => {
            let t = ease_out_back(progress(effect));
            let scale = (0.5 + 0.5 * t).min(1.0);
            scale_rect(base, scale)
        }
        ModalEffectKind::SlideUp => {
            let t = ease_out_cubic(progress(effect));
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
        ModalEffectKind::Shake => {
            let t = progress(effect).clamp(0.0, 1.0);
            let decay = 1.0 - t;
            let oscillations = 4.0;
            let amplitude = 3.0;
            let offset = (f32::sin(t * std::f32::consts::TAU * oscillations) * amplitude * decay)
                .round() as i32;
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
    Rect {
        x: base.x + (base.width.saturating_sub(width) / 2),
        y: base.y + (base.height.saturating_sub(height) / 2),
        width,
        height,
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Overshoots slightly past 1 before settling; callers clamp.
fn ease_out_back(t: f32) -> f32 {
    const C1: f32 = 1.701_58;
    const C3: f32 = C1 + 1.0;
    let t = t.clamp(0.0, 1.0) - 1.0;
    1.0 + C3 * t * t * t + C1 * t * t
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::layout::Rect;
    use skillpath_engine::ModalEffect;

    use super::apply_modal_effect;

    const VIEWPORT: Rect = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 24,
    };
    const BASE: Rect = Rect {
        x: 20,
        y: 8,
        width: 40,
        height: 8,
    };

    #[test]
    fn pop_scale_starts_small_and_ends_full() {
        let mut effect = ModalEffect::pop_scale(Duration::from_millis(200));
        let start = apply_modal_effect(&effect, BASE, VIEWPORT);
        assert!(start.width < BASE.width);
        effect.advance(Duration::from_millis(200));
        assert_eq!(apply_modal_effect(&effect, BASE, VIEWPORT), BASE);
    }

    #[test]
    fn slide_up_starts_below() {
        let mut effect = ModalEffect::slide_up(Duration::from_millis(200));
        assert!(apply_modal_effect(&effect, BASE, VIEWPORT).y > BASE.y);
        effect.advance(Duration::from_millis(200));
        assert_eq!(apply_modal_effect(&effect, BASE, VIEWPORT).y, BASE.y);
    }

    #[test]
    fn shake_stays_inside_viewport() {
        let mut effect = ModalEffect::shake(Duration::from_millis(240));
        let edge = Rect { x: 0, ..BASE };
        for _ in 0..12 {
            let rect = apply_modal_effect(&effect, edge, VIEWPORT);
            assert!(rect.x + rect.width <= VIEWPORT.width);
            effect.advance(Duration::from_millis(20));
        }
    }
}
