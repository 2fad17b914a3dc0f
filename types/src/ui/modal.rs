//! Animation effects for celebration and alert popups.

use std::time::Duration;

use super::animation::{AnimPhase, EffectTimer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEffectKind {
    /// Level-up popup grows in from the center.
    PopScale,
    /// Step-complete banner rises from the bottom.
    SlideUp,
    /// Error alerts jitter horizontally.
    Shake,
}

#[derive(Debug, Clone)]
pub struct ModalEffect {
    kind: ModalEffectKind,
    timer: EffectTimer,
}

impl ModalEffect {
    #[must_use]
    pub fn new(kind: ModalEffectKind, duration: Duration) -> Self {
        Self {
            kind,
            timer: EffectTimer::new(duration),
        }
    }

    #[must_use]
    pub fn pop_scale(duration: Duration) -> Self {
        Self::new(ModalEffectKind::PopScale, duration)
    }

    #[must_use]
    pub fn slide_up(duration: Duration) -> Self {
        Self::new(ModalEffectKind::SlideUp, duration)
    }

    #[must_use]
    pub fn shake(duration: Duration) -> Self {
        Self::new(ModalEffectKind::Shake, duration)
    }

    pub fn advance(&mut self, delta: Duration) {
        self.timer.advance(delta);
    }

    #[must_use]
    pub fn phase(&self) -> AnimPhase {
        self.timer.phase()
    }

    #[must_use]
    pub fn kind(&self) -> ModalEffectKind {
        self.kind
    }
}
