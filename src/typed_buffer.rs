/// Characters the user entered, addressed by absolute position.
///
/// Separator positions are never written, so the buffer stays sparse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypedBuffer {
    chars: Vec<Option<char>>,
}

impl TypedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied().flatten()
    }

    pub fn set(&mut self, idx: usize, c: char) {
        if idx >= self.chars.len() {
            self.chars.resize(idx + 1, None);
        }
        self.chars[idx] = Some(c);
    }

    pub fn clear(&mut self, idx: usize) {
        if let Some(slot) = self.chars.get_mut(idx) {
            *slot = None;
        }
    }

    /// Number of positions currently holding a character.
    pub fn filled(&self) -> usize {
        self.chars.iter().filter(|c| c.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_grows_with_holes() {
        let mut buf = TypedBuffer::new();
        buf.set(4, 'x');

        assert_eq!(buf.get(4), Some('x'));
        assert_eq!(buf.get(0), None);
        assert_eq!(buf.get(100), None);
        assert_eq!(buf.filled(), 1);
    }

    #[test]
    fn clear_empties_a_slot() {
        let mut buf = TypedBuffer::new();
        buf.set(0, 'c');
        buf.set(1, 'a');
        buf.clear(1);
        buf.clear(50);

        assert_eq!(buf.get(1), None);
        assert_eq!(buf.filled(), 1);
    }
}
