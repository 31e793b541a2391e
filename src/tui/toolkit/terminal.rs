//! ratatui implementation of the toolkit.
//!
//! Widget calls queue draw commands that are flushed to the terminal in
//! `end_frame`. Input is collected in `begin_frame`: typed characters
//! accumulate until the first navigation or activation event, which ends the
//! batch so that each frame sees at most one action.
//!
//! Keyboard model: Tab / Shift-Tab move focus, Enter activates, Space toggles
//! checkboxes, Left / Right cycle dropdowns, Up / Down scroll panels. In a
//! message box Left / Right pick a button, Enter answers, Esc dismisses and a
//! digit answers that button directly. A left click focuses and activates.

use super::{Tone, Toolkit, WidgetId};
use crate::tui::buffer::TextField;
use crate::tui::dialog::DialogResponse;
use crate::tui::layout::{centered_rect, hit, WindowSize};
use crate::tui::theme::ColorScheme;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    backend::Backend,
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::collections::VecDeque;
use std::io;
use std::time::Duration;

// ============================================================================
// Event sources
// ============================================================================

/// Where terminal events come from.
pub trait EventSource {
    /// Wait up to `timeout` for the next event.
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>>;
}

/// Live crossterm input.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if event::poll(timeout)? {
            event::read().map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Pre-recorded input, for driving a `TestBackend`.
#[derive(Debug, Clone, Default)]
pub struct QueuedEvents {
    queue: VecDeque<Event>,
}

impl QueuedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn key(&mut self, code: KeyCode) {
        self.push(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    pub fn text(&mut self, text: &str) {
        for c in text.chars() {
            self.key(KeyCode::Char(c));
        }
    }

    pub fn click(&mut self, column: u16, row: u16) {
        self.push(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }));
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl EventSource for QueuedEvents {
    fn next_event(&mut self, _timeout: Duration) -> io::Result<Option<Event>> {
        Ok(self.queue.pop_front())
    }
}

// ============================================================================
// Frame input
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Activate,
    Next,
    Prev,
    Left,
    Right,
    Up,
    Down,
    Cancel,
    Digit(usize),
    Click { column: u16, row: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Char(char),
    Backspace,
}

#[derive(Debug, Default)]
struct FrameInput {
    edits: Vec<Edit>,
    action: Option<Action>,
}

/// What happened to one non-modal widget this frame.
#[derive(Debug, Default, Clone, Copy)]
struct Interaction {
    focused: bool,
    activated: bool,
    key: Option<Action>,
}

// ============================================================================
// Draw commands
// ============================================================================

#[derive(Debug, Clone)]
enum Command {
    Label {
        bounds: Rect,
        text: String,
        tone: Tone,
    },
    Button {
        bounds: Rect,
        label: String,
        focused: bool,
        locked: bool,
    },
    Input {
        bounds: Rect,
        label: String,
        text: String,
        focused: bool,
        locked: bool,
    },
    Checkbox {
        bounds: Rect,
        label: String,
        checked: bool,
        focused: bool,
        locked: bool,
    },
    Dropdown {
        bounds: Rect,
        current: String,
        focused: bool,
        locked: bool,
    },
    Panel {
        bounds: Rect,
        title: String,
        content: String,
        scroll: u16,
        focused: bool,
    },
    Status {
        bounds: Rect,
        text: String,
    },
    SizeWarning {
        window: WindowSize,
        required: WindowSize,
    },
}

#[derive(Debug, Clone)]
struct Modal {
    bounds: Rect,
    title: String,
    message: String,
    buttons: Vec<String>,
    selected: usize,
}

// ============================================================================
// Toolkit
// ============================================================================

/// Terminal toolkit over a ratatui backend.
pub struct TerminalToolkit<B: Backend, E: EventSource> {
    terminal: Terminal<B>,
    events: E,
    tick_rate: Duration,
    scheme: ColorScheme,
    window: WindowSize,
    resized: Option<WindowSize>,
    locked: bool,
    close: bool,
    input: FrameInput,
    focus: Option<WidgetId>,
    order: Vec<WidgetId>,
    prev_order: Vec<WidgetId>,
    shown_modal: Option<WidgetId>,
    armed_modal: Option<WidgetId>,
    modal_choice: usize,
    commands: Vec<Command>,
    modal: Option<Modal>,
}

impl<B: Backend, E: EventSource> TerminalToolkit<B, E> {
    pub fn new(backend: B, events: E, tick_rate: Duration) -> io::Result<Self> {
        let terminal = Terminal::new(backend)?;
        let window = WindowSize::from(terminal.size()?);
        Ok(Self {
            terminal,
            events,
            tick_rate,
            scheme: ColorScheme::default(),
            window,
            resized: None,
            locked: false,
            close: false,
            input: FrameInput::default(),
            focus: None,
            order: Vec::new(),
            prev_order: Vec::new(),
            shown_modal: None,
            armed_modal: None,
            modal_choice: 0,
            commands: Vec::new(),
            modal: None,
        })
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.focus
    }

    /// Fold one event into this frame's input. Returns `true` once the
    /// frame has its action and collection should stop.
    fn absorb(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.absorb_key(key),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    self.input.action = Some(Action::Click {
                        column: mouse.column,
                        row: mouse.row,
                    });
                    true
                }
                MouseEventKind::ScrollDown => {
                    self.input.action = Some(Action::Down);
                    true
                }
                MouseEventKind::ScrollUp => {
                    self.input.action = Some(Action::Up);
                    true
                }
                _ => false,
            },
            Event::Resize(width, height) => {
                self.window = WindowSize::new(width, height);
                self.resized = Some(self.window);
                false
            }
            _ => false,
        }
    }

    fn absorb_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'q'))
        {
            self.close = true;
            return true;
        }

        let action = if self.armed_modal.is_some() {
            match key.code {
                KeyCode::Enter => Action::Activate,
                KeyCode::Esc => Action::Cancel,
                KeyCode::Left | KeyCode::BackTab => Action::Prev,
                KeyCode::Right | KeyCode::Tab => Action::Next,
                KeyCode::Char(c) => match c.to_digit(10) {
                    Some(d) => Action::Digit(d as usize),
                    None => return false,
                },
                _ => return false,
            }
        } else {
            match key.code {
                KeyCode::Char(c) => {
                    self.input.edits.push(Edit::Char(c));
                    return false;
                }
                KeyCode::Backspace => {
                    self.input.edits.push(Edit::Backspace);
                    return false;
                }
                KeyCode::Enter => Action::Activate,
                KeyCode::Tab => Action::Next,
                KeyCode::BackTab => Action::Prev,
                KeyCode::Left => Action::Left,
                KeyCode::Right => Action::Right,
                KeyCode::Up | KeyCode::PageUp => Action::Up,
                KeyCode::Down | KeyCode::PageDown => Action::Down,
                KeyCode::Esc => Action::Cancel,
                _ => return false,
            }
        };
        self.input.action = Some(action);
        true
    }

    fn move_focus(&mut self, forward: bool) {
        let len = self.prev_order.len();
        if len == 0 {
            return;
        }
        let position = self
            .focus
            .and_then(|focus| self.prev_order.iter().position(|id| *id == focus));
        let next = match (position, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.focus = Some(self.prev_order[next]);
    }

    /// Register a focusable widget and work out what happened to it.
    fn interact(&mut self, id: WidgetId, bounds: Rect) -> Interaction {
        self.order.push(id);
        let mut result = Interaction {
            focused: self.focus == Some(id),
            ..Interaction::default()
        };
        if self.locked {
            return result;
        }

        match self.input.action {
            Some(Action::Click { column, row }) if hit(bounds, column, row) => {
                self.focus = Some(id);
                self.input.action = None;
                result.focused = true;
                result.activated = true;
            }
            Some(Action::Click { .. }) => {}
            Some(action) if result.focused && self.armed_modal.is_none() => {
                self.input.action = None;
                if action == Action::Activate {
                    result.activated = true;
                } else {
                    result.key = Some(action);
                }
            }
            _ => {}
        }
        result
    }

    /// Take the typed edits if `focused` and nothing blocks input.
    fn take_edits(&mut self, focused: bool) -> Vec<Edit> {
        if focused && !self.locked && self.armed_modal.is_none() {
            std::mem::take(&mut self.input.edits)
        } else {
            Vec::new()
        }
    }
}

impl<B: Backend, E: EventSource> Toolkit for TerminalToolkit<B, E> {
    fn begin_frame(&mut self) -> io::Result<()> {
        let mut timeout = self.tick_rate;
        while let Some(event) = self.events.next_event(timeout)? {
            timeout = Duration::ZERO;
            if self.absorb(event) {
                break;
            }
        }

        if self.armed_modal.is_none() {
            match self.input.action {
                Some(Action::Next) => {
                    self.move_focus(true);
                    self.input.action = None;
                }
                Some(Action::Prev) => {
                    self.move_focus(false);
                    self.input.action = None;
                }
                _ => {}
            }
        }
        self.locked = false;
        Ok(())
    }

    fn end_frame(&mut self) -> io::Result<()> {
        let commands = std::mem::take(&mut self.commands);
        let modal = self.modal.take();
        let scheme = self.scheme;
        self.terminal.draw(|frame| {
            for command in &commands {
                draw_command(frame, command, &scheme);
            }
            if let Some(modal) = &modal {
                draw_modal(frame, modal, &scheme);
            }
        })?;

        self.armed_modal = self.shown_modal.take();

        self.prev_order = std::mem::take(&mut self.order);
        if self.focus.map_or(true, |focus| !self.prev_order.contains(&focus)) {
            self.focus = self.prev_order.first().copied();
        }
        self.input = FrameInput::default();
        Ok(())
    }

    fn window_size(&self) -> WindowSize {
        self.window
    }

    fn take_resize(&mut self) -> Option<WindowSize> {
        self.resized.take()
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn set_theme(&mut self, scheme: ColorScheme) {
        self.scheme = scheme;
    }

    fn label(&mut self, bounds: Rect, text: &str, tone: Tone) {
        self.commands.push(Command::Label {
            bounds,
            text: text.to_string(),
            tone,
        });
    }

    fn button(&mut self, id: WidgetId, bounds: Rect, label: &str) -> bool {
        let interaction = self.interact(id, bounds);
        self.commands.push(Command::Button {
            bounds,
            label: label.to_string(),
            focused: interaction.focused,
            locked: self.locked,
        });
        interaction.activated
    }

    fn text_input(
        &mut self,
        id: WidgetId,
        bounds: Rect,
        label: &str,
        field: &mut TextField,
    ) -> bool {
        let interaction = self.interact(id, bounds);
        let mut edited = false;
        for edit in self.take_edits(interaction.focused) {
            edited |= match edit {
                Edit::Char(c) => field.push(c),
                Edit::Backspace => field.pop(),
            };
        }
        self.commands.push(Command::Input {
            bounds,
            label: label.to_string(),
            text: field.display(),
            focused: interaction.focused,
            locked: self.locked,
        });
        edited
    }

    fn checkbox(&mut self, id: WidgetId, bounds: Rect, label: &str, checked: &mut bool) -> bool {
        let interaction = self.interact(id, bounds);
        let spaced = self
            .take_edits(interaction.focused)
            .contains(&Edit::Char(' '));
        let toggled = interaction.activated || spaced;
        if toggled {
            *checked = !*checked;
        }
        self.commands.push(Command::Checkbox {
            bounds,
            label: label.to_string(),
            checked: *checked,
            focused: interaction.focused,
            locked: self.locked,
        });
        toggled
    }

    fn dropdown(
        &mut self,
        id: WidgetId,
        bounds: Rect,
        options: &[&str],
        selected: &mut usize,
    ) -> bool {
        let interaction = self.interact(id, bounds);
        let before = *selected;
        if !options.is_empty() {
            let len = options.len();
            match interaction.key {
                Some(Action::Left) => *selected = (*selected + len - 1) % len,
                Some(Action::Right) => *selected = (*selected + 1) % len,
                _ if interaction.activated => *selected = (*selected + 1) % len,
                _ => {}
            }
        }
        self.commands.push(Command::Dropdown {
            bounds,
            current: options.get(*selected).copied().unwrap_or_default().to_string(),
            focused: interaction.focused,
            locked: self.locked,
        });
        *selected != before
    }

    fn scroll_panel(
        &mut self,
        id: WidgetId,
        bounds: Rect,
        title: &str,
        content: &str,
        scroll: &mut u16,
    ) {
        let interaction = self.interact(id, bounds);
        let max = u16::try_from(content.lines().count()).unwrap_or(u16::MAX);
        match interaction.key {
            Some(Action::Down) => *scroll = scroll.saturating_add(1).min(max.saturating_sub(1)),
            Some(Action::Up) => *scroll = scroll.saturating_sub(1),
            _ => {}
        }
        self.commands.push(Command::Panel {
            bounds,
            title: title.to_string(),
            content: content.to_string(),
            scroll: *scroll,
            focused: interaction.focused,
        });
    }

    fn message_box(
        &mut self,
        id: WidgetId,
        bounds: Rect,
        title: &str,
        message: &str,
        buttons: &[&str],
    ) -> DialogResponse {
        self.shown_modal = Some(id);
        let armed = self.armed_modal == Some(id);
        let count = buttons.len().max(1);
        let mut response = DialogResponse::Unanswered;
        // A new box starts on its last button, the safe choice of Yes/No.
        if !armed {
            self.modal_choice = count - 1;
        }

        if armed {
            match self.input.action.take() {
                Some(Action::Activate) => {
                    response = DialogResponse::Answered(self.modal_choice + 1);
                }
                Some(Action::Cancel) => response = DialogResponse::Answered(0),
                Some(Action::Digit(d)) if (1..=buttons.len()).contains(&d) => {
                    response = DialogResponse::Answered(d);
                }
                Some(Action::Next) => self.modal_choice = (self.modal_choice + 1) % count,
                Some(Action::Prev) => self.modal_choice = (self.modal_choice + count - 1) % count,
                Some(Action::Click { column, row }) => {
                    if let Some(i) = modal_button_rects(bounds, buttons)
                        .iter()
                        .position(|r| hit(*r, column, row))
                    {
                        response = DialogResponse::Answered(i + 1);
                    }
                }
                _ => {}
            }
        }

        self.modal = Some(Modal {
            bounds,
            title: title.to_string(),
            message: message.to_string(),
            buttons: buttons.iter().map(ToString::to_string).collect(),
            selected: self.modal_choice,
        });
        response
    }

    fn status_bar(&mut self, bounds: Rect, text: &str) {
        self.commands.push(Command::Status {
            bounds,
            text: text.to_string(),
        });
    }

    fn size_warning(&mut self, required: WindowSize) {
        self.commands.push(Command::SizeWarning {
            window: self.window,
            required,
        });
    }

    fn close_requested(&self) -> bool {
        self.close
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Hit boxes of a message box's buttons, centred on its last inner row.
fn modal_button_rects(bounds: Rect, buttons: &[&str]) -> Vec<Rect> {
    let widths: Vec<u16> = buttons
        .iter()
        .map(|b| u16::try_from(b.chars().count()).unwrap_or(0) + 4)
        .collect();
    let gap = 2;
    let gaps = u16::try_from(widths.len().saturating_sub(1)).unwrap_or(0);
    let total = widths.iter().sum::<u16>() + gap * gaps;
    let row = bounds.y + bounds.height.saturating_sub(2);
    let mut x = bounds.x + bounds.width.saturating_sub(total) / 2;
    widths
        .into_iter()
        .map(|width| {
            let rect = Rect::new(x, row, width, 1).intersection(bounds);
            x = x.saturating_add(width + gap);
            rect
        })
        .collect()
}

fn tone_style(tone: Tone, scheme: &ColorScheme) -> Style {
    let color = match tone {
        Tone::Title => scheme.primary,
        Tone::Text => scheme.text,
        Tone::Muted => scheme.text_muted,
        Tone::Warning => scheme.warning,
        Tone::Error => scheme.error,
    };
    Style::new().fg(color)
}

fn bordered<'a>(title: &'a str, focused: bool, scheme: &ColorScheme) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(scheme.border(focused))
}

fn draw_command(frame: &mut Frame, command: &Command, scheme: &ColorScheme) {
    match command {
        Command::Label { bounds, text, tone } => {
            let mut style = tone_style(*tone, scheme);
            if *tone == Tone::Title {
                style = style.bold();
            }
            frame.render_widget(
                Paragraph::new(text.as_str()).style(style).wrap(Wrap { trim: false }),
                *bounds,
            );
        }
        Command::Button {
            bounds,
            label,
            focused,
            locked,
        } => {
            let style = if *locked {
                scheme.disabled()
            } else if *focused {
                scheme.selected()
            } else {
                scheme.text()
            };
            let widget = if bounds.height >= 3 {
                Paragraph::new(label.as_str())
                    .block(bordered("", *focused, scheme))
                    .alignment(Alignment::Center)
                    .style(style)
            } else {
                Paragraph::new(format!("[ {label} ]"))
                    .alignment(Alignment::Center)
                    .style(style)
            };
            frame.render_widget(widget, *bounds);
        }
        Command::Input {
            bounds,
            label,
            text,
            focused,
            locked,
        } => {
            let shown = if *focused && !*locked {
                format!("{text}_")
            } else {
                text.clone()
            };
            let style = if *locked { scheme.disabled() } else { scheme.text() };
            frame.render_widget(
                Paragraph::new(shown)
                    .style(style)
                    .block(bordered(label, *focused, scheme).title_style(scheme.label())),
                *bounds,
            );
        }
        Command::Checkbox {
            bounds,
            label,
            checked,
            focused,
            locked,
        } => {
            let mark = if *checked { "[x]" } else { "[ ]" };
            let style = if *locked { scheme.disabled() } else { scheme.text() };
            frame.render_widget(
                Paragraph::new(format!("{mark} {label}"))
                    .style(style)
                    .block(bordered("", *focused, scheme)),
                *bounds,
            );
        }
        Command::Dropdown {
            bounds,
            current,
            focused,
            locked,
        } => {
            let style = if *locked {
                scheme.disabled()
            } else if *focused {
                scheme.selected()
            } else {
                Style::new().fg(scheme.accent)
            };
            frame.render_widget(
                Paragraph::new(format!("< {current} >"))
                    .alignment(Alignment::Center)
                    .style(style),
                *bounds,
            );
        }
        Command::Panel {
            bounds,
            title,
            content,
            scroll,
            focused,
        } => {
            frame.render_widget(
                Paragraph::new(content.as_str())
                    .style(scheme.text())
                    .block(bordered(title, *focused, scheme).title_style(scheme.title()))
                    .scroll((*scroll, 0)),
                *bounds,
            );
        }
        Command::Status { bounds, text } => {
            frame.render_widget(
                Paragraph::new(text.as_str()).style(scheme.status_bar()),
                *bounds,
            );
        }
        Command::SizeWarning { window, required } => {
            draw_size_warning(frame, *window, *required, scheme);
        }
    }
}

fn draw_modal(frame: &mut Frame, modal: &Modal, scheme: &ColorScheme) {
    frame.render_widget(Clear, modal.bounds);
    let block = Block::default()
        .title(modal.title.as_str())
        .title_style(scheme.warning())
        .borders(Borders::ALL)
        .border_style(Style::new().fg(scheme.warning));
    let inner = block.inner(modal.bounds);
    frame.render_widget(block, modal.bounds);

    let message_area = Rect {
        height: inner.height.saturating_sub(1),
        ..inner
    };
    frame.render_widget(
        Paragraph::new(modal.message.as_str())
            .style(scheme.text())
            .wrap(Wrap { trim: true }),
        message_area,
    );

    let labels: Vec<&str> = modal.buttons.iter().map(String::as_str).collect();
    for (i, (rect, label)) in modal_button_rects(modal.bounds, &labels)
        .into_iter()
        .zip(&labels)
        .enumerate()
    {
        let style = if i == modal.selected {
            scheme.selected()
        } else {
            scheme.text()
        };
        frame.render_widget(
            Paragraph::new(format!("[ {label} ]")).style(style),
            rect,
        );
    }
}

fn draw_size_warning(
    frame: &mut Frame,
    window: WindowSize,
    required: WindowSize,
    scheme: &ColorScheme,
) {
    let lines = vec![
        Line::styled("Terminal too small", scheme.warning()),
        Line::from(""),
        Line::from(vec![
            Span::raw("Current: "),
            Span::styled(window.to_string(), scheme.text()),
        ]),
        Line::from(vec![
            Span::raw("Required: "),
            Span::styled(required.to_string(), Style::new().fg(scheme.accent)),
        ]),
        Line::from(""),
        Line::styled("Please resize your terminal", scheme.label()),
    ];

    let area = centered_rect(40, 8, window.area());
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::new().fg(scheme.warning)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
