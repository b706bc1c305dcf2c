use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

/// Single-line text buffer with a character cursor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct TextInput {
    pub(crate) content: String,
    pub(crate) cursor: usize,
}

impl TextInput {
    pub(crate) fn from(content: String) -> Self {
        let cursor = content.chars().count();
        Self { content, cursor }
    }

    /// Keep `cursor` if it still fits, otherwise move it to the end.
    pub(crate) fn with_cursor(content: String, cursor: usize) -> Self {
        let len = content.chars().count();
        Self {
            content,
            cursor: cursor.min(len),
        }
    }

    fn byte_offset(&self, index: usize) -> usize {
        self.content
            .char_indices()
            .nth(index)
            .map_or(self.content.len(), |(offset, _)| offset)
    }

    fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub(crate) fn insert(&mut self, c: char) {
        let offset = self.byte_offset(self.cursor);
        self.content.insert(offset, c);
        self.cursor += 1;
    }

    pub(crate) fn delete_back(&mut self) {
        if self.cursor > 0 {
            let offset = self.byte_offset(self.cursor - 1);
            self.content.remove(offset);
            self.cursor -= 1;
        }
    }

    pub(crate) fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub(crate) fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub(crate) fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub(crate) fn reset(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Apply an editing key. Returns whether the content changed.
    pub(crate) fn handle(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('a') => self.move_home(),
                KeyCode::Char('e') => self.move_end(),
                KeyCode::Char('u') => {
                    let changed = !self.content.is_empty();
                    self.reset();
                    return changed;
                }
                _ => {}
            }
            return false;
        }
        match key.code {
            KeyCode::Char(c) => {
                self.insert(c);
                true
            }
            KeyCode::Backspace => {
                let before = self.cursor;
                self.delete_back();
                before != self.cursor
            }
            KeyCode::Left => {
                self.move_left();
                false
            }
            KeyCode::Right => {
                self.move_right();
                false
            }
            KeyCode::Home => {
                self.move_home();
                false
            }
            KeyCode::End => {
                self.move_end();
                false
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Move {
    Up,
    Down,
    PageUp,
    PageDown,
    First,
    Last,
}

fn select_next(list_state: &mut ListState, len: usize) {
    let i = match list_state.selected() {
        Some(i) => {
            if i + 1 >= len {
                0
            } else {
                i + 1
            }
        }
        None => 0,
    };
    list_state.select(Some(i));
}

fn select_prev(list_state: &mut ListState, len: usize) {
    let i = match list_state.selected() {
        Some(i) => {
            if i == 0 {
                len.saturating_sub(1)
            } else {
                i - 1
            }
        }
        None => 0,
    };
    list_state.select(Some(i));
}

fn select_page_down(list_state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let i = list_state.selected().unwrap_or(0);
    list_state.select(Some((i + 5).min(len - 1)));
}

fn select_page_up(list_state: &mut ListState) {
    let i = list_state.selected().unwrap_or(0);
    list_state.select(Some(i.saturating_sub(5)));
}

pub(crate) fn move_list(state: &mut ListState, len: usize, movement: Move) {
    if len == 0 {
        state.select(None);
        return;
    }
    match movement {
        Move::Up => select_prev(state, len),
        Move::Down => select_next(state, len),
        Move::PageUp => select_page_up(state),
        Move::PageDown => select_page_down(state, len),
        Move::First => state.select(Some(0)),
        Move::Last => state.select(Some(len - 1)),
    }
}

/// Keep the selection inside a list that may have shrunk.
pub(crate) fn clamp_selection(state: &mut ListState, len: usize) {
    match (state.selected(), len) {
        (_, 0) => state.select(None),
        (None, _) => state.select(Some(0)),
        (Some(i), len) if i >= len => state.select(Some(len - 1)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn edits_respect_multibyte_characters() {
        let mut input = TextInput::from("café".into());
        input.move_left();
        assert!(input.handle(key(KeyCode::Char('!'))));
        assert_eq!(input.content, "caf!é");
        input.move_end();
        assert!(input.handle(key(KeyCode::Backspace)));
        assert_eq!(input.content, "caf!");
        assert!(!input.handle(key(KeyCode::Left)));
        assert_eq!(input.cursor, 3);
    }

    #[test]
    fn with_cursor_clamps() {
        let input = TextInput::with_cursor("ab".into(), 10);
        assert_eq!(input.cursor, 2);
    }

    #[test]
    fn list_moves_wrap_and_clamp() {
        let mut state = ListState::default();
        move_list(&mut state, 3, Move::Up);
        assert_eq!(state.selected(), Some(0));
        move_list(&mut state, 3, Move::Up);
        assert_eq!(state.selected(), Some(2));
        move_list(&mut state, 3, Move::Down);
        assert_eq!(state.selected(), Some(0));
        move_list(&mut state, 3, Move::PageDown);
        assert_eq!(state.selected(), Some(2));

        clamp_selection(&mut state, 1);
        assert_eq!(state.selected(), Some(0));
        clamp_selection(&mut state, 0);
        assert_eq!(state.selected(), None);
    }
}
