// No-alloc fmt::Write buffer. Overflow truncates at a char boundary.

pub struct StackFmt<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> Default for StackFmt<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> StackFmt<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; N],
            len: 0,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn is_full(&self) -> bool {
        self.len == N
    }
}

impl<const N: usize> core::fmt::Write for StackFmt<N> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let mut n = s.len().min(N - self.len);
        while !s.is_char_boundary(n) {
            n -= 1;
        }
        self.buf[self.len..self.len + n].copy_from_slice(&s.as_bytes()[..n]);
        self.len += n;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn truncates_on_char_boundary() {
        let mut f = StackFmt::<5>::new();
        write!(f, "ab\u{e9}\u{e9}").unwrap();
        assert_eq!(f.as_str(), "ab\u{e9}");
        assert!(!f.is_full());
    }
}
