//! Small reusable TUI widgets: a bounded scrollable list and a one-line
//! text input with cursor movement.

use ratatui::widgets::{ListItem, ListState, ScrollbarState};

/// A bounded list of items rendered bottom-to-top, newest first, with a
/// selection that doubles as the scroll position.
pub struct ScrollableList {
    pub list_items: Vec<ListItem<'static>>,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
    max_items: usize,
}

impl ScrollableList {
    pub fn new(max_items: usize) -> Self {
        Self {
            list_items: Vec::new(),
            list_state: ListState::default(),
            scroll_state: ScrollbarState::default(),
            max_items,
        }
    }

    /// Add a new item at the bottom of the rendered list.
    pub fn push(&mut self, item: ListItem<'static>) {
        self.list_items.insert(0, item);
        self.list_items.truncate(self.max_items);
        self.scroll_state = self.scroll_state.content_length(self.list_items.len());
    }

    /// Scroll one item toward the oldest entry.
    pub fn move_up(&mut self) {
        if self.list_items.is_empty() {
            return;
        }
        let next = match self.list_state.selected() {
            Some(idx) => (idx + 1).min(self.list_items.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(next));
        self.scroll_state = self.scroll_state.position(next);
    }

    /// Scroll one item toward the newest entry.
    pub fn move_down(&mut self) {
        match self.list_state.selected() {
            Some(0) | None => self.list_state.select(None),
            Some(idx) => {
                self.list_state.select(Some(idx - 1));
                self.scroll_state = self.scroll_state.position(idx - 1);
            }
        }
    }

    /// Jump to the oldest entry.
    pub fn jump_to_first(&mut self) {
        if self.list_items.is_empty() {
            return;
        }
        let last = self.list_items.len() - 1;
        self.list_state.select(Some(last));
        self.scroll_state = self.scroll_state.position(last);
    }

    /// Jump back to the newest entry.
    pub fn jump_to_last(&mut self) {
        self.list_state.select(None);
        self.scroll_state = self.scroll_state.position(0);
    }
}

/// One-line editable input with a movable cursor.
pub struct UserInput {
    pub value: String,
    /// Cursor position in characters, not bytes.
    pub char_idx: usize,
}

impl UserInput {
    pub fn new() -> Self {
        Self {
            value: String::new(),
            char_idx: 0,
        }
    }

    fn byte_idx(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.char_idx)
            .map_or(self.value.len(), |(idx, _)| idx)
    }

    pub fn input(&mut self, c: char) {
        let idx = self.byte_idx();
        self.value.insert(idx, c);
        self.char_idx += 1;
    }

    pub fn backspace(&mut self) {
        if self.char_idx > 0 {
            self.char_idx -= 1;
            let idx = self.byte_idx();
            self.value.remove(idx);
        }
    }

    pub fn delete(&mut self) {
        if self.char_idx < self.value.chars().count() {
            let idx = self.byte_idx();
            self.value.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.char_idx = self.char_idx.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.char_idx = (self.char_idx + 1).min(self.value.chars().count());
    }

    pub fn jump_to_first(&mut self) {
        self.char_idx = 0;
    }

    pub fn jump_to_last(&mut self) {
        self.char_idx = self.value.chars().count();
    }

    /// Take the current value and clear the input.
    pub fn submit(&mut self) -> String {
        self.char_idx = 0;
        std::mem::take(&mut self.value)
    }
}

impl Default for UserInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_inserts_at_cursor() {
        let mut input = UserInput::new();
        for c in "hit".chars() {
            input.input(c);
        }
        input.move_left();
        input.move_left();
        input.input('x');
        assert_eq!(input.value, "hxit");
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut input = UserInput::new();
        for c in "deal".chars() {
            input.input(c);
        }
        input.backspace();
        assert_eq!(input.value, "dea");

        input.jump_to_first();
        input.delete();
        assert_eq!(input.value, "ea");
    }

    #[test]
    fn test_submit_clears_input() {
        let mut input = UserInput::new();
        for c in "stand".chars() {
            input.input(c);
        }
        assert_eq!(input.submit(), "stand");
        assert_eq!(input.value, "");
        assert_eq!(input.char_idx, 0);
    }

    #[test]
    fn test_scrollable_list_is_bounded() {
        let mut list = ScrollableList::new(3);
        for i in 0..5 {
            list.push(ListItem::new(format!("line {i}")));
        }
        assert_eq!(list.list_items.len(), 3);
    }

    #[test]
    fn test_scroll_selection_stays_in_bounds() {
        let mut list = ScrollableList::new(10);
        list.push(ListItem::new("a"));
        list.push(ListItem::new("b"));

        list.move_up();
        list.move_up();
        list.move_up();
        assert_eq!(list.list_state.selected(), Some(1));

        list.move_down();
        list.move_down();
        assert_eq!(list.list_state.selected(), None);
    }
}
