/// Hover carousel
///
/// While the pointer is over a card with two or more distinct images, a
/// repeating timer cycles the cover through them. Leaving stops the timer
/// and puts the original image back.
///
/// The timer itself belongs to the host (an iced subscription in the
/// viewer); this type only tracks whether its timer should be running and
/// which image is showing.
use std::time::Duration;

/// Default cycling period
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverCarousel {
    images: Vec<String>,
    /// Image shown before the pointer entered
    original: String,
    index: usize,
    running: bool,
}

impl HoverCarousel {
    /// Attach to a card showing `images[0]`.
    ///
    /// Duplicates are dropped (first occurrence wins). Returns `None` when
    /// fewer than two distinct images remain.
    pub fn attach(images: &[String]) -> Option<Self> {
        let mut distinct: Vec<String> = Vec::with_capacity(images.len());
        for image in images {
            if !distinct.contains(image) {
                distinct.push(image.clone());
            }
        }
        if distinct.len() < 2 {
            return None;
        }

        Some(Self {
            original: distinct[0].clone(),
            images: distinct,
            index: 0,
            running: false,
        })
    }

    /// Pointer entered: cancel any timer still running, then start fresh
    /// from the first image.
    pub fn enter(&mut self) {
        self.cancel();
        self.index = 0;
        self.running = true;
    }

    /// Timer fired. Ignored unless a timer is running.
    pub fn tick(&mut self) {
        if self.running {
            self.index = (self.index + 1) % self.images.len();
        }
    }

    /// Pointer left: stop the timer and restore the original image
    pub fn leave(&mut self) {
        self.cancel();
        self.index = 0;
    }

    /// Stop the timer without touching the displayed image. Called before
    /// a card is discarded.
    pub fn cancel(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Image the card should display right now
    pub fn current(&self) -> &str {
        if self.running {
            &self.images[self.index]
        } else {
            &self.original
        }
    }

    #[cfg(test)]
    pub fn images(&self) -> &[String] {
        &self.images
    }
}

/// One carousel slot per rendered card
#[derive(Debug, Clone, Default)]
pub struct CarouselBoard {
    slots: Vec<Option<HoverCarousel>>,
}

impl CarouselBoard {
    /// Cancel every running timer and drop all carousels
    pub fn teardown(&mut self) {
        for carousel in self.slots.iter_mut().flatten() {
            carousel.cancel();
        }
        self.slots.clear();
    }

    /// Replace the board with carousels for a fresh set of cards.
    /// Existing timers are cancelled first.
    pub fn rebuild<'a>(&mut self, cards: impl IntoIterator<Item = &'a [String]>) {
        self.teardown();
        self.slots = cards.into_iter().map(HoverCarousel::attach).collect();
    }

    pub fn get(&self, card: usize) -> Option<&HoverCarousel> {
        self.slots.get(card).and_then(Option::as_ref)
    }

    pub fn enter(&mut self, card: usize) {
        if let Some(Some(carousel)) = self.slots.get_mut(card) {
            carousel.enter();
        }
    }

    pub fn leave(&mut self, card: usize) {
        if let Some(Some(carousel)) = self.slots.get_mut(card) {
            carousel.leave();
        }
    }

    /// Advance every running carousel by one step
    pub fn tick(&mut self) {
        for carousel in self.slots.iter_mut().flatten() {
            carousel.tick();
        }
    }

    pub fn any_running(&self) -> bool {
        self.slots.iter().flatten().any(HoverCarousel::is_running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_single_image_is_noop() {
        assert!(HoverCarousel::attach(&paths(&["a.jpg"])).is_none());
        assert!(HoverCarousel::attach(&paths(&["a.jpg", "a.jpg"])).is_none());
        assert!(HoverCarousel::attach(&[]).is_none());
    }

    #[test]
    fn test_cycles_while_hovered() {
        let mut carousel = HoverCarousel::attach(&paths(&["a", "b", "c"])).unwrap();
        assert_eq!(carousel.current(), "a");

        // Ticks before entering do nothing
        carousel.tick();
        assert_eq!(carousel.current(), "a");

        carousel.enter();
        carousel.tick();
        assert_eq!(carousel.current(), "b");
        carousel.tick();
        assert_eq!(carousel.current(), "c");
        carousel.tick();
        assert_eq!(carousel.current(), "a");
    }

    #[test]
    fn test_leave_restores_original() {
        let mut carousel = HoverCarousel::attach(&paths(&["a", "b", "c"])).unwrap();
        carousel.enter();
        carousel.tick();
        carousel.leave();

        assert!(!carousel.is_running());
        assert_eq!(carousel.current(), "a");
        carousel.tick();
        assert_eq!(carousel.current(), "a");
    }

    #[test]
    fn test_reenter_restarts_single_timer() {
        let mut carousel = HoverCarousel::attach(&paths(&["a", "b", "c"])).unwrap();
        carousel.enter();
        carousel.tick();
        carousel.enter();

        assert!(carousel.is_running());
        assert_eq!(carousel.current(), "a");
        carousel.tick();
        assert_eq!(carousel.current(), "b");
    }

    #[test]
    fn test_board_teardown_cancels_timers() {
        let cards = [paths(&["a", "b"]), paths(&["only"])];
        let mut board = CarouselBoard::default();
        board.rebuild(cards.iter().map(Vec::as_slice));

        assert!(board.get(0).is_some());
        assert!(board.get(1).is_none());

        board.enter(0);
        board.enter(1);
        assert!(board.any_running());

        board.rebuild(std::iter::empty());
        assert!(!board.any_running());
        assert!(board.get(0).is_none());
    }
}
