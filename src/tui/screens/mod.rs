//! Concrete screens.

mod create_user;
mod food;
mod login;
mod main_menu;
mod record;
mod resident;
mod settings;

pub use create_user::{CreateUserScreen, UserFlags};
pub use food::FoodForm;
pub use login::{LoginFlags, LoginScreen};
pub use main_menu::{MainMenuScreen, MenuFlags};
pub use record::{FieldError, FieldSpec, RecordFlags, RecordForm, RecordIds, RecordScreen};
pub use resident::ResidentForm;
pub use settings::{SettingsFlags, SettingsScreen};

use super::flags::FlagRegister;
use super::pending::{PendingAction, PendingSlot};
use super::state::AppState;
use super::traits::{Screen, ScreenContext};
use crate::store::{RecordStore, StoreResult};
use crate::utils::Credential;
use bitflags::Flags;
use indexmap::IndexMap;
use std::fmt::Debug;

pub type ResidentScreen = RecordScreen<ResidentForm>;
pub type FoodScreen = RecordScreen<FoodForm>;

/// One screen per state, in state order.
pub fn default_screens() -> IndexMap<AppState, Box<dyn Screen>> {
    let mut screens: IndexMap<AppState, Box<dyn Screen>> = IndexMap::new();
    screens.insert(AppState::Login, Box::new(LoginScreen::new()));
    screens.insert(AppState::MainMenu, Box::new(MainMenuScreen::new()));
    screens.insert(AppState::Residents, Box::new(ResidentScreen::new()));
    screens.insert(AppState::Foods, Box::new(FoodScreen::new()));
    screens.insert(AppState::CreateUser, Box::new(CreateUserScreen::new()));
    screens.insert(AppState::Settings, Box::new(SettingsScreen::new()));
    screens
}

/// Replace the stored credential of user `id`, keeping the other fields.
fn apply_credential(
    store: &mut dyn RecordStore,
    id: &str,
    credential: &Credential,
) -> StoreResult<()> {
    let users = store.users();
    let mut user = users.read(id)?;
    user.salt.clone_from(&credential.salt);
    user.password_hash.clone_from(&credential.hash);
    users.update(&user)
}

/// Park `action` under `owner`. If another confirmation is still open the
/// request is dropped, the open dialog stays and the user is told why.
fn defer<F, R>(
    pending: &mut PendingSlot<F, R>,
    flags: &mut FlagRegister<F>,
    owner: F,
    action: PendingAction<R>,
    ctx: &mut ScreenContext<'_>,
)
where
    F: Flags + Copy + PartialEq + Debug,
{
    if let Err(err) = pending.arm(flags, owner, action) {
        tracing::warn!(%err, requested = ?owner, "request dropped");
        ctx.set_status("Answer the open dialog first");
    }
}
