use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Stack of previously visited directories, most recent on top.
///
/// The history does not reject consecutive duplicates; the navigator only
/// pushes when it actually leaves a directory.
#[derive(Debug, Clone, Default)]
pub struct NavigationHistory {
    stack: VecDeque<PathBuf>,
    /// Maximum depth, 0 = unbounded. The oldest entry is dropped on overflow.
    limit: usize,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            stack: VecDeque::new(),
            limit,
        }
    }

    pub fn push(&mut self, path: PathBuf) {
        if self.limit > 0 && self.stack.len() >= self.limit {
            self.stack.pop_front();
        }
        self.stack.push_back(path);
    }

    /// `None` is the terminal "no history" state, not an error.
    pub fn pop(&mut self) -> Option<PathBuf> {
        self.stack.pop_back()
    }

    pub fn peek(&self) -> Option<&Path> {
        self.stack.back().map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifo_order() {
        let mut history = NavigationHistory::new();
        history.push(PathBuf::from("/a"));
        history.push(PathBuf::from("/a/b"));

        assert_eq!(history.peek(), Some(Path::new("/a/b")));
        assert_eq!(history.pop(), Some(PathBuf::from("/a/b")));
        assert_eq!(history.pop(), Some(PathBuf::from("/a")));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn test_empty_history() {
        let mut history = NavigationHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.peek(), None);
        assert_eq!(history.pop(), None);
        assert!(history.is_empty());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = NavigationHistory::with_limit(2);
        history.push(PathBuf::from("/1"));
        history.push(PathBuf::from("/2"));
        history.push(PathBuf::from("/3"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.pop(), Some(PathBuf::from("/3")));
        assert_eq!(history.pop(), Some(PathBuf::from("/2")));
        assert_eq!(history.pop(), None);
    }
}
