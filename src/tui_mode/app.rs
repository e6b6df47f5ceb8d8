use intcalc::session::{Outcome, Report, Session};
use unicode_segmentation::UnicodeSegmentation;

pub enum HistoryEntry {
    Evaluated(Report),
    Notice(String),
}

impl HistoryEntry {
    /// Text recalled into the input box when browsing history.
    pub fn input(&self) -> Option<&str> {
        match self {
            Self::Evaluated(report) => Some(&report.input),
            Self::Notice(..) => None,
        }
    }
}

pub struct App {
    pub session: Session,
    pub input: String,
    /// Cursor position in grapheme clusters.
    pub cursor_position: usize,
    pub input_scroll: usize,
    pub history: Vec<HistoryEntry>,
    pub cursor_history: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub list_height: usize,
    pub item_start_indices: Vec<usize>,
    pub history_scroll: usize,
    pub scroll_to_bottom: bool,
    pub terminal_too_small: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        App {
            session,
            input: String::new(),
            cursor_position: 0,
            input_scroll: 0,
            history: Vec::new(),
            cursor_history: 0,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            list_height: 5,
            item_start_indices: Vec::new(),
            history_scroll: 0,
            scroll_to_bottom: false,
            terminal_too_small: false,
        }
    }

    pub fn input_len(&self) -> usize {
        self.input.graphemes(true).count()
    }

    pub fn adjust_input_scroll(&mut self, visible_width: usize) {
        let total = self.input_len();

        if self.cursor_position < self.input_scroll {
            self.input_scroll = self.cursor_position;
        } else if self.cursor_position >= self.input_scroll + visible_width {
            self.input_scroll = self.cursor_position + 1 - visible_width;
        }

        if self.input_scroll > total.saturating_sub(visible_width) {
            self.input_scroll = total.saturating_sub(visible_width);
        }
    }

    pub fn submit(&mut self) {
        let input = std::mem::take(&mut self.input);
        self.cursor_position = 0;
        self.input_scroll = 0;

        // An empty line would end a line-oriented session; here it is ignored.
        if input.trim().is_empty() {
            return;
        }

        match self.session.submit(&input) {
            Outcome::Quit => self.should_quit = true,
            Outcome::Clear => {
                self.history.clear();
                self.cursor_history = 0;
                self.history_scroll = 0;
            }
            Outcome::Help => {
                self.show_help = true;
                self.help_scroll = 0;
            }
            Outcome::TreeToggled(enabled) => {
                self.push_entry(HistoryEntry::Notice(Outcome::tree_toggle_message(enabled).to_string()));
            }
            Outcome::Report(report) => self.push_entry(HistoryEntry::Evaluated(report)),
        }
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        self.cursor_history = self.history.len().saturating_sub(1);
        self.scroll_to_bottom = true;
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_idx = self.byte_index(self.cursor_position);
        self.input.insert(byte_idx, c);
        self.cursor_position = (self.cursor_position + 1).min(self.input_len());
    }

    pub fn delete_backward(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            self.delete_forward();
        }
    }

    pub fn delete_forward(&mut self) {
        let start = self.byte_index(self.cursor_position);
        let end = self.byte_index(self.cursor_position + 1);
        self.input.drain(start..end);
    }

    pub fn move_cursor(&mut self, direction: i32) {
        match direction {
            -1 => self.cursor_position = self.cursor_position.saturating_sub(1),
            1 => self.cursor_position = (self.cursor_position + 1).min(self.input_len()),
            _ => {}
        }
    }

    pub fn move_cursor_by_words(&mut self, direction: i32) {
        let graphemes: Vec<&str> = self.input.graphemes(true).collect();
        let is_space = |g: &str| g.chars().all(char::is_whitespace);
        let mut pos = self.cursor_position;

        if direction < 0 {
            while pos > 0 && is_space(graphemes[pos - 1]) {
                pos -= 1;
            }
            while pos > 0 && !is_space(graphemes[pos - 1]) {
                pos -= 1;
            }
        } else {
            let len = graphemes.len();
            while pos < len && !is_space(graphemes[pos]) {
                pos += 1;
            }
            while pos < len && is_space(graphemes[pos]) {
                pos += 1;
            }
        }
        self.cursor_position = pos;
    }

    pub fn navigate_history(&mut self, direction: i32) {
        if direction < 0 && self.cursor_history > 0 {
            self.cursor_history -= 1;
        } else if direction > 0 && self.cursor_history < self.history.len().saturating_sub(1) {
            self.cursor_history += 1;
        }
        self.recall_selected();
    }

    pub fn scroll_history(&mut self, direction: i32) {
        let step = self.list_height.saturating_sub(1);
        if direction < 0 {
            self.cursor_history = self.cursor_history.saturating_sub(step);
        } else {
            self.cursor_history = self
                .cursor_history
                .saturating_add(step)
                .min(self.history.len().saturating_sub(1));
        }
        self.recall_selected();
    }

    fn recall_selected(&mut self) {
        match self.history.get(self.cursor_history).and_then(HistoryEntry::input) {
            Some(input) => self.input = input.to_string(),
            None => self.input.clear(),
        }
        self.cursor_position = self.input_len();
        self.input_scroll = 0;
        self.scroll_to_bottom = false;
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.input_scroll = 0;
    }

    pub fn byte_index(&self, grapheme_index: usize) -> usize {
        self.input
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intcalc::session::Verdict;

    fn type_line(app: &mut App, line: &str) {
        for c in line.chars() {
            app.insert_char(c);
        }
        app.submit();
    }

    #[test]
    fn submit_records_reports() {
        let mut app = App::new(Session::default());
        type_line(&mut app, "2+3*4");
        type_line(&mut app, "4/0");
        assert_eq!(app.history.len(), 2);
        match &app.history[0] {
            HistoryEntry::Evaluated(report) => assert_eq!(report.verdict, Verdict::Value(14)),
            HistoryEntry::Notice(..) => panic!("expected a report"),
        }
        assert_eq!(app.cursor_history, 1);
        assert!(app.input.is_empty());
    }

    #[test]
    fn commands() {
        let mut app = App::new(Session::default());
        type_line(&mut app, "#showTree");
        assert!(app.session.show_tree);
        type_line(&mut app, "1");
        type_line(&mut app, "#clear");
        assert!(app.history.is_empty());
        type_line(&mut app, "help");
        assert!(app.show_help);
        type_line(&mut app, "   ");
        assert!(!app.should_quit);
        type_line(&mut app, "quit");
        assert!(app.should_quit);
    }

    #[test]
    fn history_recall_skips_notices() {
        let mut app = App::new(Session::default());
        type_line(&mut app, "1+1");
        type_line(&mut app, "#showTree");
        app.navigate_history(-1);
        assert_eq!(app.input, "1+1");
        assert_eq!(app.cursor_position, 3);
        app.navigate_history(1);
        assert_eq!(app.input, "");
    }

    #[test]
    fn editing() {
        let mut app = App::new(Session::default());
        for c in "12 + 3".chars() {
            app.insert_char(c);
        }
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 5);
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 3);
        app.delete_backward();
        assert_eq!(app.input, "12+ 3");
        app.cursor_position = 0;
        app.delete_forward();
        assert_eq!(app.input, "2+ 3");
        app.move_cursor_by_words(1);
        assert_eq!(app.cursor_position, 3);
    }
}
