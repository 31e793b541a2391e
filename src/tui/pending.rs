//! Deferred actions.
//!
//! A conflict found while handling a button must not be resolved until the
//! user confirms it in a later call to `handle_warning_msg`. The screen
//! captures the operation and its payload in a [`PendingAction`] at the
//! moment the conflict is detected and parks it in its [`PendingSlot`],
//! bound to the condition flag that owns the confirmation dialog.

use super::flags::FlagRegister;
use crate::utils::Credential;
use bitflags::Flags;
use std::fmt::Debug;
use thiserror::Error;

/// A store operation waiting for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction<R> {
    None,
    /// Overwrite the stored record with this one
    Update(R),
    /// Delete the record with this key
    Delete(String),
    /// Replace the credential of the user `id`
    ResetCredential { id: String, credential: Credential },
}

impl<R> Default for PendingAction<R> {
    fn default() -> Self {
        Self::None
    }
}

impl<R> PendingAction<R> {
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Move the action out, leaving `None` behind.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Tried to arm a slot whose current owner is still waiting for an answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("a deferred action owned by {owner} is still waiting for confirmation")]
pub struct PendingConflict {
    pub owner: String,
}

/// The single deferred action a screen may hold.
#[derive(Debug, Clone)]
pub struct PendingSlot<F, R> {
    owner: Option<F>,
    action: PendingAction<R>,
}

impl<F, R> Default for PendingSlot<F, R> {
    fn default() -> Self {
        Self {
            owner: None,
            action: PendingAction::None,
        }
    }
}

impl<F: Flags + Copy + PartialEq + Debug, R> PendingSlot<F, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `action` under `owner` and raise the owner's flag.
    ///
    /// Fails, leaving the slot and the flags untouched, when a different
    /// owner's flag is still set.
    pub fn arm(
        &mut self,
        flags: &mut FlagRegister<F>,
        owner: F,
        action: PendingAction<R>,
    ) -> Result<(), PendingConflict> {
        if let Some(current) = self.owner {
            if current != owner && flags.is_set(current) {
                tracing::warn!(?current, requested = ?owner, "deferred action already pending");
                return Err(PendingConflict {
                    owner: format!("{current:?}"),
                });
            }
        }
        self.owner = Some(owner);
        self.action = action;
        flags.set(owner);
        Ok(())
    }

    /// Remove and return the action if `owner` holds the slot.
    ///
    /// A second call for the same owner returns [`PendingAction::None`], so a
    /// confirmation can only ever execute once.
    pub fn take_for(&mut self, owner: F) -> PendingAction<R> {
        if self.owner == Some(owner) {
            self.owner = None;
            self.action.take()
        } else {
            PendingAction::None
        }
    }

    /// Drop the action held by `owner`, if any.
    pub fn discard(&mut self, owner: F) {
        if self.owner == Some(owner) {
            self.owner = None;
            self.action = PendingAction::None;
        }
    }

    pub fn owner(&self) -> Option<F> {
        self.owner
    }

    pub fn action(&self) -> &PendingAction<R> {
        &self.action
    }

    pub fn is_armed(&self) -> bool {
        self.owner.is_some()
    }
}
