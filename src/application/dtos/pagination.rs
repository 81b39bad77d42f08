/// First page of a trash listing; pages are 1-based
pub const FIRST_PAGE: u32 = 1;

/// Pagination cursor of one browsing session.
///
/// `generation` changes on every reset so that completions of fetches issued
/// before the reset can be recognised and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    page: u32,
    generation: u64,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            generation: 0,
        }
    }
}

impl PageCursor {
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Back to page 1 and a new generation
    pub fn reset(&mut self) -> (u32, u64) {
        self.page = FIRST_PAGE;
        self.generation = self.generation.wrapping_add(1);
        (self.page, self.generation)
    }

    /// Moves to the next page within the current generation
    pub fn advance(&mut self) -> (u32, u64) {
        self.page = self.page.saturating_add(1);
        (self.page, self.generation)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_and_advance() {
        let mut cursor = PageCursor::default();
        assert_eq!(cursor.page(), 1);

        let (page, first_gen) = cursor.reset();
        assert_eq!(page, 1);
        assert_eq!(cursor.advance(), (2, first_gen));
        assert_eq!(cursor.advance(), (3, first_gen));

        let (page, second_gen) = cursor.reset();
        assert_eq!(page, 1);
        assert_ne!(first_gen, second_gen);
        assert!(!cursor.is_current(first_gen));
        assert!(cursor.is_current(second_gen));
    }
}
