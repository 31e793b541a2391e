//! Screen-owned text buffers.

/// Formatted bulk listing owned by a screen.
///
/// At most one listing is live at a time: [`TableBuffer::replace`] releases
/// the previous one first. The counters make that observable.
#[derive(Debug, Default)]
pub struct TableBuffer {
    content: Option<String>,
    stored: usize,
    released: usize,
}

impl TableBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release the current listing, then take ownership of `content`.
    pub fn replace(&mut self, content: String) {
        self.release();
        self.content = Some(content);
        self.stored += 1;
    }

    /// Drop the listing. Safe to call when nothing is held.
    pub fn release(&mut self) {
        if self.content.take().is_some() {
            self.released += 1;
        }
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn is_held(&self) -> bool {
        self.content.is_some()
    }

    /// Listings stored over the buffer's lifetime.
    pub fn stored(&self) -> usize {
        self.stored
    }

    /// Listings released over the buffer's lifetime.
    pub fn released(&self) -> usize {
        self.released
    }

    /// Listings currently held (never more than one).
    pub fn live(&self) -> usize {
        self.stored - self.released
    }
}

/// What a [`TextField`] accepts and how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    #[default]
    Text,
    /// Digits only
    Number,
    /// Drawn masked
    Secret,
}

/// An editable input buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextField {
    text: String,
    kind: InputKind,
    max_len: usize,
}

impl TextField {
    pub const fn new(kind: InputKind, max_len: usize) -> Self {
        Self {
            text: String::new(),
            kind,
            max_len,
        }
    }

    pub const fn plain(max_len: usize) -> Self {
        Self::new(InputKind::Text, max_len)
    }

    pub const fn number(max_len: usize) -> Self {
        Self::new(InputKind::Number, max_len)
    }

    pub const fn secret(max_len: usize) -> Self {
        Self::new(InputKind::Secret, max_len)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Content with surrounding whitespace removed.
    pub fn value(&self) -> &str {
        self.text.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.value().is_empty()
    }

    pub const fn kind(&self) -> InputKind {
        self.kind
    }

    /// Append `c` if the kind accepts it and there is room.
    pub fn push(&mut self, c: char) -> bool {
        if c.is_control() || self.text.chars().count() >= self.max_len {
            return false;
        }
        if self.kind == InputKind::Number && !c.is_ascii_digit() {
            return false;
        }
        self.text.push(c);
        true
    }

    pub fn pop(&mut self) -> bool {
        self.text.pop().is_some()
    }

    /// Replace the content, dropping characters the kind rejects.
    pub fn set(&mut self, text: &str) {
        self.text.clear();
        for c in text.chars() {
            self.push(c);
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Content as drawn on screen.
    pub fn display(&self) -> String {
        match self.kind {
            InputKind::Secret => "*".repeat(self.text.chars().count()),
            InputKind::Text | InputKind::Number => self.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_releases_previous() {
        let mut table = TableBuffer::new();
        table.replace("first".to_string());
        table.replace("second".to_string());
        assert_eq!(table.as_deref(), Some("second"));
        assert_eq!(table.stored(), 2);
        assert_eq!(table.released(), 1);
        assert_eq!(table.live(), 1);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut table = TableBuffer::new();
        table.release();
        table.replace("rows".to_string());
        table.release();
        table.release();
        assert_eq!(table.released(), 1);
        assert_eq!(table.live(), 0);
        assert!(!table.is_held());
    }

    #[test]
    fn test_number_field_rejects_letters() {
        let mut field = TextField::number(4);
        field.set("12a34");
        assert_eq!(field.text(), "1234");
        assert!(!field.push('5'));
    }

    #[test]
    fn test_secret_is_masked() {
        let mut field = TextField::secret(16);
        field.set("hunter2");
        assert_eq!(field.display(), "*******");
        assert_eq!(field.text(), "hunter2");
    }

    #[test]
    fn test_value_trims() {
        let mut field = TextField::plain(16);
        field.set("  R-1 ");
        assert_eq!(field.value(), "R-1");
        field.clear();
        assert!(field.is_blank());
    }
}
