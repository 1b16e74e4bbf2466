// Position within a paginated document.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCursor {
    current: usize,
    total: usize,
}

impl PageCursor {
    pub const fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.total == 0 || self.current + 1 >= self.total
    }

    /// Returns false at the last page.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Returns false at the first page.
    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Out-of-range targets leave the cursor where it is.
    pub fn goto(&mut self, index: usize) -> bool {
        if index >= self.total {
            return false;
        }
        self.current = index;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_within_bounds() {
        let mut c = PageCursor::new(3);
        assert!(!c.previous());
        assert!(c.next());
        assert!(c.next());
        assert!(!c.next());
        assert_eq!(c.current(), 2);
        assert!(c.previous());
        assert_eq!(c.current(), 1);
    }

    #[test]
    fn goto_rejects_out_of_range() {
        let mut c = PageCursor::new(5);
        assert!(c.goto(4));
        assert!(!c.goto(5));
        assert_eq!(c.current(), 4);
    }

    #[test]
    fn empty_cursor_never_moves() {
        let mut c = PageCursor::new(0);
        assert!(!c.next());
        assert!(!c.previous());
        assert!(!c.goto(0));
        assert_eq!(c.current(), 0);
    }
}
