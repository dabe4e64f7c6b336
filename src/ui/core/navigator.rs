//! Index-into-collection state shared by the document and flashcard viewers.

/// Where the current item sits, handed to render callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub total: usize,
}

impl Position {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }
}

/// A list with a cursor that never wraps.
///
/// While the list is non-empty the cursor is always a valid index. Moving
/// past either end does nothing.
#[derive(Debug, Clone)]
pub struct Navigator<T> {
    items: Vec<T>,
    index: usize,
}

impl<T> Default for Navigator<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: 0,
        }
    }
}

impl<T> Navigator<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, index: 0 }
    }

    /// Replace the collection and go back to the first item.
    pub fn load(&mut self, items: Vec<T>) {
        self.items = items;
        self.index = 0;
    }

    pub fn clear(&mut self) {
        self.load(Vec::new());
    }

    /// Returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Returns whether the cursor moved.
    pub fn previous(&mut self) -> bool {
        if self.has_previous() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Out-of-range indices are ignored.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.items.len() && index != self.index {
            self.index = index;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn has_previous(&self) -> bool {
        !self.items.is_empty() && self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.items.len()
    }

    pub fn position(&self) -> Option<Position> {
        self.current().map(|_| Position {
            index: self.index,
            total: self.items.len(),
        })
    }

    /// "3 / 7", or an empty string when there is nothing to show.
    pub fn counter(&self) -> String {
        match self.position() {
            Some(p) => format!("{} / {}", p.index + 1, p.total),
            None => String::new(),
        }
    }

    /// Run `render` for the current item, if any.
    pub fn render<R>(&self, render: impl FnOnce(&T, Position) -> R) -> Option<R> {
        let position = self.position()?;
        self.current().map(|item| render(item, position))
    }
}
