//! View state for rendering.
//!
//! Everything here is presentation: which page is showing, which row is
//! selected, and the running popup animation. Domain data lives in the
//! engine's `DashboardState`.

use std::time::Instant;

use super::ModalEffect;

/// UI configuration options derived from config/environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Page {
    #[default]
    Dashboard,
    Skills,
    Courses,
    Roadmap,
    Analysis,
    Notifications,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Dashboard,
        Page::Skills,
        Page::Courses,
        Page::Roadmap,
        Page::Analysis,
        Page::Notifications,
    ];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Skills => "Skills",
            Page::Courses => "Courses",
            Page::Roadmap => "Roadmap",
            Page::Analysis => "Analysis",
            Page::Notifications => "Notifications",
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    /// Page for a 1-based number key.
    #[must_use]
    pub fn from_number(n: u32) -> Option<Self> {
        let idx = usize::try_from(n.checked_sub(1)?).ok()?;
        Self::ALL.get(idx).copied()
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug)]
pub struct ViewState {
    pub page: Page,
    /// Selected row on the current page's list.
    pub selected: usize,
    pub modal_effect: Option<ModalEffect>,
    /// UI options (theme, motion, glyphs).
    pub ui_options: UiOptions,
    /// Timestamp of last frame (for animation timing).
    pub last_frame: Instant,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: Page::default(),
            selected: 0,
            modal_effect: None,
            ui_options: UiOptions::default(),
            last_frame: Instant::now(),
        }
    }
}

impl ViewState {
    #[must_use]
    pub fn new(ui_options: UiOptions) -> Self {
        Self {
            ui_options,
            ..Self::default()
        }
    }

    /// Switch page and reset the row selection.
    pub fn show(&mut self, page: Page) {
        if self.page != page {
            self.page = page;
            self.selected = 0;
        }
    }

    /// Move the selection by `delta`, clamped to `len` rows.
    pub fn move_selection(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(len - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_cycle() {
        assert_eq!(Page::Notifications.next(), Page::Dashboard);
        assert_eq!(Page::Dashboard.prev(), Page::Notifications);
        assert_eq!(Page::from_number(3), Some(Page::Courses));
        assert_eq!(Page::from_number(0), None);
        assert_eq!(Page::from_number(7), None);
    }

    #[test]
    fn selection_clamps() {
        let mut view = ViewState::default();
        view.move_selection(-1, 3);
        assert_eq!(view.selected, 0);
        view.move_selection(10, 3);
        assert_eq!(view.selected, 2);
        view.show(Page::Skills);
        assert_eq!(view.selected, 0);
    }
}
