//! Card-by-card navigation over a flashcard set.

use crate::infrastructure::entities::Flashcard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ViewerError {
    #[error("the set has no flashcards")]
    Empty,
    #[error("card {index} is out of range for {len} cards")]
    OutOfRange { index: usize, len: usize },
}

/// Something that shows a question on the front and an answer on the back.
pub trait Card {
    fn front(&self) -> &str;
    fn back(&self) -> &str;
}

impl Card for Flashcard {
    fn front(&self) -> &str {
        &self.question
    }

    fn back(&self) -> &str {
        &self.answer
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerView<'a> {
    Empty,
    Card {
        /// 1-based position of the current card.
        position: usize,
        total: usize,
        flipped: bool,
        /// The face currently showing: the question, or the answer once flipped.
        face: &'a str,
        progress_percent: u32,
    },
}

/// Viewer state over a fixed list of cards: the current index and whether the card is
/// flipped. Navigation wraps around in both directions and always shows the front of the
/// new card.
#[derive(Debug, Clone)]
pub struct FlashcardViewer<T> {
    cards: Vec<T>,
    index: usize,
    flipped: bool,
}

impl<T: Card> FlashcardViewer<T> {
    pub fn new(cards: Vec<T>) -> Self {
        FlashcardViewer {
            cards,
            index: 0,
            flipped: false,
        }
    }

    /// Restores a viewer at `index`, e.g. from request parameters.
    pub fn at(cards: Vec<T>, index: usize, flipped: bool) -> Result<Self, ViewerError> {
        let mut viewer = Self::new(cards);
        viewer.jump_to(index)?;
        viewer.flipped = flipped;
        Ok(viewer)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn current(&self) -> Option<&T> {
        self.cards.get(self.index)
    }

    pub fn next(&mut self) -> Result<(), ViewerError> {
        let len = self.non_empty_len()?;
        self.index = (self.index + 1) % len;
        self.flipped = false;
        Ok(())
    }

    pub fn previous(&mut self) -> Result<(), ViewerError> {
        let len = self.non_empty_len()?;
        self.index = (self.index + len - 1) % len;
        self.flipped = false;
        Ok(())
    }

    pub fn flip(&mut self) -> Result<(), ViewerError> {
        self.non_empty_len()?;
        self.flipped = !self.flipped;
        Ok(())
    }

    pub fn jump_to(&mut self, index: usize) -> Result<(), ViewerError> {
        let len = self.non_empty_len()?;
        if index >= len {
            return Err(ViewerError::OutOfRange { index, len });
        }
        self.index = index;
        self.flipped = false;
        Ok(())
    }

    pub fn view(&self) -> ViewerView<'_> {
        match self.current() {
            None => ViewerView::Empty,
            Some(card) => {
                let total = self.cards.len();
                let position = self.index + 1;
                ViewerView::Card {
                    position,
                    total,
                    flipped: self.flipped,
                    face: if self.flipped { card.back() } else { card.front() },
                    progress_percent: ((position as f64 / total as f64) * 100.0).round() as u32,
                }
            }
        }
    }

    fn non_empty_len(&self) -> Result<usize, ViewerError> {
        match self.cards.len() {
            0 => Err(ViewerError::Empty),
            len => Ok(len),
        }
    }
}
