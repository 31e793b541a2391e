//! Generic data-entry screen for one record type.
//!
//! [`RecordScreen`] owns the frame flow shared by every record screen:
//! submit, retrieve, delete, list, clear and back. What differs between
//! record types (fields, parsing, key rules, which store table) lives
//! behind [`RecordForm`].

use super::defer;
use crate::model::Record;
use crate::store::{EntityStore, RecordStore, StoreStatus};
use crate::tui::buffer::{InputKind, TableBuffer, TextField};
use crate::tui::dialog::{DialogOutcome, Warning};
use crate::tui::flags::FlagRegister;
use crate::tui::layout::{form_layout, FormLayout, WindowSize};
use crate::tui::pending::{PendingAction, PendingSlot};
use crate::tui::state::AppState;
use crate::tui::toolkit::{Tone, Toolkit, WidgetId};
use crate::tui::traits::{OpResult, Screen, ScreenContext};
use bitflags::bitflags;
use std::marker::PhantomData;
use thiserror::Error;

bitflags! {
    /// Conditions raised by a record screen.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RecordFlags: u8 {
        const REQUIRED_EMPTY = 1;
        const KEY_NOT_VALID = 1 << 1;
        const FIELD_INVALID = 1 << 2;
        const NOT_FOUND = 1 << 3;
        const KEY_CONFLICT = 1 << 4;
        const CONFIRM_DELETE = 1 << 5;
        const OPERATION_DONE = 1 << 6;
    }
}

impl RecordFlags {
    /// Dialog conditions in the order they are shown.
    pub const PRIORITY: [Self; 6] = [
        Self::REQUIRED_EMPTY,
        Self::KEY_NOT_VALID,
        Self::FIELD_INVALID,
        Self::NOT_FOUND,
        Self::KEY_CONFLICT,
        Self::CONFIRM_DELETE,
    ];

    /// Conditions reset at the start of every validating action.
    const VALIDATION: Self = Self::REQUIRED_EMPTY
        .union(Self::KEY_NOT_VALID)
        .union(Self::FIELD_INVALID)
        .union(Self::NOT_FOUND);

    const DIALOGS: Self = Self::VALIDATION
        .union(Self::KEY_CONFLICT)
        .union(Self::CONFIRM_DELETE);
}

/// A field value that could not be turned into a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// One input row of a record form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: WidgetId,
    pub label: &'static str,
    pub kind: InputKind,
    pub max_len: usize,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(id: WidgetId, label: &'static str, kind: InputKind, max_len: usize) -> Self {
        Self {
            id,
            label,
            kind,
            max_len,
            required: true,
        }
    }

    pub const fn optional(id: WidgetId, label: &'static str, max_len: usize) -> Self {
        Self {
            id,
            label,
            kind: InputKind::Text,
            max_len,
            required: false,
        }
    }
}

/// Widget ids of a record screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordIds {
    /// Submit, retrieve, delete, list, clear, back
    pub buttons: [WidgetId; 6],
    pub table: WidgetId,
    pub required: WidgetId,
    pub invalid_key: WidgetId,
    pub invalid_field: WidgetId,
    pub not_found: WidgetId,
    pub conflict: WidgetId,
    pub confirm_delete: WidgetId,
}

/// Record-specific half of a [`RecordScreen`].
///
/// The first field is always the key.
pub trait RecordForm {
    type Record: Record;

    const TITLE: &'static str;
    const FIELDS: &'static [FieldSpec];
    const IDS: RecordIds;
    /// Shown when the key fails [`RecordForm::is_valid_key`]
    const KEY_HINT: &'static str;

    /// The store table holding this record type.
    fn table(store: &mut dyn RecordStore) -> &mut dyn EntityStore<Self::Record>;

    fn is_valid_key(key: &str) -> bool;

    /// The key as typed, normalised.
    fn key(fields: &[TextField]) -> String {
        fields.first().map(|f| f.value().to_string()).unwrap_or_default()
    }

    /// Parse the inputs into a record. Required fields are already known to
    /// be non-blank and the key valid.
    fn build(fields: &[TextField]) -> Result<Self::Record, FieldError>;

    /// Copy `record` into the inputs.
    fn fill(fields: &mut [TextField], record: &Self::Record);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Submit,
    Retrieve,
    Delete,
    List,
    Clear,
    Back,
}

impl Action {
    const ALL: [Self; 6] = [
        Self::Submit,
        Self::Retrieve,
        Self::Delete,
        Self::List,
        Self::Clear,
        Self::Back,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::Submit => "Submit",
            Self::Retrieve => "Retrieve",
            Self::Delete => "Delete",
            Self::List => "List",
            Self::Clear => "Clear",
            Self::Back => "Back",
        }
    }
}

/// Create, look up, delete and list one record type.
#[derive(Debug)]
pub struct RecordScreen<F: RecordForm> {
    fields: Vec<TextField>,
    layout: FormLayout,
    flags: FlagRegister<RecordFlags>,
    pending: PendingSlot<RecordFlags, F::Record>,
    retrieved: Option<F::Record>,
    table: TableBuffer,
    scroll: u16,
    pressed: Option<Action>,
    /// Key or field error captured when a validation condition was raised
    subject: String,
    form: PhantomData<F>,
}

impl<F: RecordForm> Default for RecordScreen<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: RecordForm> RecordScreen<F> {
    pub fn new() -> Self {
        Self {
            fields: F::FIELDS
                .iter()
                .map(|spec| TextField::new(spec.kind, spec.max_len))
                .collect(),
            layout: FormLayout::default(),
            flags: FlagRegister::new(),
            pending: PendingSlot::new(),
            retrieved: None,
            table: TableBuffer::new(),
            scroll: 0,
            pressed: None,
            subject: String::new(),
            form: PhantomData,
        }
    }

    pub fn flags(&self) -> &FlagRegister<RecordFlags> {
        &self.flags
    }

    pub fn pending(&self) -> &PendingSlot<RecordFlags, F::Record> {
        &self.pending
    }

    pub fn fields(&self) -> &[TextField] {
        &self.fields
    }

    /// The record loaded by the last successful retrieve.
    pub fn retrieved(&self) -> Option<&F::Record> {
        self.retrieved.as_ref()
    }

    fn raise(&mut self, flag: RecordFlags, subject: impl Into<String>) {
        self.subject = subject.into();
        self.flags.set(flag);
    }

    /// Validate the key field alone.
    fn checked_key(&mut self) -> Option<String> {
        let key = F::key(&self.fields);
        if key.is_empty() {
            self.raise(RecordFlags::REQUIRED_EMPTY, F::FIELDS[0].label);
            return None;
        }
        if !F::is_valid_key(&key) {
            self.raise(RecordFlags::KEY_NOT_VALID, key);
            return None;
        }
        Some(key)
    }

    /// Validate every field and build the record.
    fn checked_record(&mut self) -> Option<F::Record> {
        let missing = F::FIELDS
            .iter()
            .zip(&self.fields)
            .find(|(spec, field)| spec.required && field.is_blank())
            .map(|(spec, _)| spec.label);
        if let Some(label) = missing {
            self.raise(RecordFlags::REQUIRED_EMPTY, label);
            return None;
        }
        self.checked_key()?;
        match F::build(&self.fields) {
            Ok(record) => Some(record),
            Err(err) => {
                self.raise(RecordFlags::FIELD_INVALID, err.to_string());
                None
            }
        }
    }

    fn submit(&mut self, ctx: &mut ScreenContext<'_>) {
        let Some(record) = self.checked_record() else {
            return;
        };
        match F::table(ctx.store).create(&record) {
            Ok(()) => {
                tracing::info!(entity = F::Record::ENTITY, key = record.key(), "record created");
                ctx.set_status(format!("Saved {} {}", F::Record::ENTITY, record.key()));
                self.refresh_table(ctx);
                self.flags.set(RecordFlags::OPERATION_DONE);
            }
            Err(err) if err.status() == StoreStatus::Conflict => {
                tracing::debug!(key = record.key(), "key conflict, asking to overwrite");
                defer(
                    &mut self.pending,
                    &mut self.flags,
                    RecordFlags::KEY_CONFLICT,
                    PendingAction::Update(record),
                    ctx,
                );
            }
            Err(err) => ctx.error.set(err),
        }
    }

    fn retrieve(&mut self, ctx: &mut ScreenContext<'_>) {
        let Some(key) = self.checked_key() else {
            return;
        };
        match F::table(ctx.store).read(&key) {
            Ok(record) => {
                F::fill(&mut self.fields, &record);
                ctx.set_status(format!("Loaded {} {key}", F::Record::ENTITY));
                self.retrieved = Some(record);
            }
            Err(err) if err.status() == StoreStatus::NotFound => {
                self.raise(RecordFlags::NOT_FOUND, key);
            }
            Err(err) => ctx.error.set(err),
        }
    }

    fn delete(&mut self, ctx: &mut ScreenContext<'_>) {
        let Some(key) = self.checked_key() else {
            return;
        };
        if !F::table(ctx.store).exists(&key) {
            self.raise(RecordFlags::NOT_FOUND, key);
            return;
        }
        defer(
            &mut self.pending,
            &mut self.flags,
            RecordFlags::CONFIRM_DELETE,
            PendingAction::Delete(key),
            ctx,
        );
    }

    fn list(&mut self, ctx: &mut ScreenContext<'_>) {
        match F::table(ctx.store).format_all() {
            Ok(listing) => {
                self.table.replace(listing);
                self.scroll = 0;
            }
            Err(err) => ctx.error.set(err),
        }
    }

    /// Re-list after a change, but only if a listing is on screen.
    fn refresh_table(&mut self, ctx: &mut ScreenContext<'_>) {
        if self.table.is_held() {
            self.list(ctx);
        }
    }

    fn execute(&mut self, action: PendingAction<F::Record>, ctx: &mut ScreenContext<'_>) {
        let table = F::table(ctx.store);
        let result = match action {
            PendingAction::Update(record) => table
                .update(&record)
                .map(|()| format!("Updated {} {}", F::Record::ENTITY, record.key())),
            PendingAction::Delete(key) => table
                .delete(&key)
                .map(|()| format!("Deleted {} {key}", F::Record::ENTITY)),
            PendingAction::ResetCredential { .. } | PendingAction::None => return,
        };
        match result {
            Ok(message) => {
                tracing::info!(entity = F::Record::ENTITY, "{message}");
                ctx.set_status(message);
                self.refresh_table(ctx);
                self.flags.set(RecordFlags::OPERATION_DONE);
            }
            Err(err) => ctx.error.set(err),
        }
    }

    fn pending_key(&self) -> String {
        match self.pending.action() {
            PendingAction::Update(record) => record.key().to_string(),
            PendingAction::Delete(key) => key.clone(),
            PendingAction::ResetCredential { id, .. } => id.clone(),
            PendingAction::None => String::new(),
        }
    }

    fn warning_for(&self, flag: RecordFlags) -> Warning {
        let ids = F::IDS;
        let entity = F::Record::ENTITY;
        if flag == RecordFlags::REQUIRED_EMPTY {
            Warning::acknowledge(
                ids.required,
                "Missing input",
                format!("{} is required.\nFields marked with * must be filled in.", self.subject),
            )
        } else if flag == RecordFlags::KEY_NOT_VALID {
            Warning::acknowledge(
                ids.invalid_key,
                "Invalid key",
                format!("'{}' is not a valid {entity} key.\n{}", self.subject, F::KEY_HINT),
            )
        } else if flag == RecordFlags::FIELD_INVALID {
            Warning::acknowledge(ids.invalid_field, "Invalid input", self.subject.clone())
        } else if flag == RecordFlags::NOT_FOUND {
            Warning::acknowledge(
                ids.not_found,
                "Not found",
                format!("No {entity} with key '{}' exists.", self.subject),
            )
        } else if flag == RecordFlags::KEY_CONFLICT {
            Warning::confirm(
                ids.conflict,
                "Already exists",
                format!(
                    "A {entity} with key '{}' already exists.\nOverwrite it with the values entered?",
                    self.pending_key()
                ),
            )
        } else {
            Warning::confirm(
                ids.confirm_delete,
                "Confirm delete",
                format!("Delete {entity} '{}'?\nThis cannot be undone.", self.pending_key()),
            )
        }
    }

    fn info_text(&self) -> String {
        let mut info = String::from("Fields marked with * are required.\n");
        match &self.retrieved {
            Some(record) => {
                info.push_str("Loaded:\n");
                info.push_str(&record.table_row());
            }
            None => info.push_str("Retrieve loads a record by key."),
        }
        info
    }
}

impl<F: RecordForm> Screen for RecordScreen<F> {
    fn title(&self) -> &str {
        F::TITLE
    }

    fn draw(&mut self, ui: &mut dyn Toolkit, _ctx: &mut ScreenContext<'_>) {
        ui.label(self.layout.title, &format!(" {}", F::TITLE), Tone::Title);

        for (index, (spec, field)) in F::FIELDS.iter().zip(self.fields.iter_mut()).enumerate() {
            let label = if spec.required {
                format!("{} *", spec.label)
            } else {
                spec.label.to_string()
            };
            ui.text_input(spec.id, self.layout.field(index), &label, field);
        }

        ui.label(self.layout.info, &self.info_text(), Tone::Muted);
        match self.table.as_deref() {
            Some(listing) => {
                ui.scroll_panel(F::IDS.table, self.layout.table, "Listing", listing, &mut self.scroll);
            }
            None => ui.label(self.layout.table, "Press List to show every record.", Tone::Muted),
        }

        let mut pressed = None;
        for (index, (action, id)) in Action::ALL.iter().zip(F::IDS.buttons).enumerate() {
            if ui.button(id, self.layout.button(index), action.label()) && pressed.is_none() {
                pressed = Some(*action);
            }
        }
        self.pressed = pressed;
    }

    fn handle_buttons(&mut self, ctx: &mut ScreenContext<'_>) -> OpResult {
        let Some(action) = self.pressed.take() else {
            return Ok(());
        };
        if action != Action::List && action != Action::Back {
            self.flags.clear(RecordFlags::VALIDATION);
        }
        match action {
            Action::Submit => self.submit(ctx),
            Action::Retrieve => self.retrieve(ctx),
            Action::Delete => self.delete(ctx),
            Action::List => self.list(ctx),
            Action::Clear => {
                self.clear_fields()?;
                self.retrieved = None;
            }
            Action::Back => {
                self.cleanup()?;
                ctx.navigate(AppState::MainMenu);
            }
        }
        Ok(())
    }

    fn handle_warning_msg(&mut self, ui: &mut dyn Toolkit, ctx: &mut ScreenContext<'_>) -> OpResult {
        let Some(flag) = self.flags.first_active(&RecordFlags::PRIORITY) else {
            return Ok(());
        };
        let warning = self.warning_for(flag);
        match warning.show_for(ui, self.layout.dialog, &mut self.flags, flag) {
            DialogOutcome::Waiting => {}
            DialogOutcome::Confirmed => {
                let action = self.pending.take_for(flag);
                self.execute(action, ctx);
            }
            DialogOutcome::Closed => self.pending.discard(flag),
        }
        Ok(())
    }

    fn update_positions(&mut self, window: WindowSize) -> OpResult {
        self.layout = form_layout(window, F::FIELDS.len(), Action::ALL.len());
        Ok(())
    }

    fn clear_fields(&mut self) -> OpResult {
        self.fields.iter_mut().for_each(TextField::clear);
        Ok(())
    }

    fn cleanup(&mut self) -> OpResult {
        self.table.release();
        self.scroll = 0;
        Ok(())
    }

    fn has_dialog(&self) -> bool {
        self.flags.any_of(RecordFlags::DIALOGS)
    }

    fn take_operation_done(&mut self) -> bool {
        self.flags.take(RecordFlags::OPERATION_DONE)
    }

    fn table(&self) -> Option<&TableBuffer> {
        Some(&self.table)
    }
}
