use crate::error::SessionError;

/// Index of the displayed question. Knows nothing about answers or time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationCursor {
    index: usize,
    len: usize,
}

impl NavigationCursor {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    /// Current 0-based index; `None` for an empty quiz.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        (self.len > 0).then_some(self.index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.len
    }

    /// Advance one question; returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Step back one question; returns whether the cursor moved.
    pub fn prev(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// # Errors
    ///
    /// Returns `SessionError::QuestionOutOfRange` and leaves the cursor alone
    /// when `index` is not a valid question index.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.len {
            return Err(SessionError::QuestionOutOfRange {
                index,
                total: self.len,
            });
        }
        self.index = index;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_and_prev_stop_at_the_ends() {
        let mut cursor = NavigationCursor::new(3);
        assert!(!cursor.prev());
        assert!(cursor.next());
        assert!(cursor.next());
        assert!(!cursor.next());
        assert_eq!(cursor.index(), Some(2));
        assert!(cursor.prev());
        assert_eq!(cursor.index(), Some(1));
    }

    #[test]
    fn jump_out_of_range_keeps_position() {
        let mut cursor = NavigationCursor::new(2);
        cursor.jump_to(1).unwrap();
        let err = cursor.jump_to(2).unwrap_err();
        assert_eq!(err, SessionError::QuestionOutOfRange { index: 2, total: 2 });
        assert_eq!(cursor.index(), Some(1));
    }

    #[test]
    fn empty_quiz_addresses_nothing() {
        let mut cursor = NavigationCursor::new(0);
        assert_eq!(cursor.index(), None);
        assert!(!cursor.next());
        assert!(!cursor.prev());
        assert!(cursor.jump_to(0).is_err());
    }
}
