//! End-to-end tests of the screen framework.
//!
//! These drive the real frame driver and screens through the headless
//! toolkit against an in-memory store, one frame at a time.

use carebook::model::{Resident, User};
use carebook::store::{EntityStore, MemoryStore, RecordStore, StoreError, StoreResult};
use carebook::tui::toolkit::WidgetKind;
use carebook::tui::{
    AppState, FrameDriver, HeadlessToolkit, Screen, ScreenContext, ThemeName, Toolkit, WindowSize,
};
use carebook::utils::PasswordPolicy;
use carebook::{Food, Record};
use chrono::NaiveDate;

const POLICY: PasswordPolicy = PasswordPolicy {
    salt_length: 8,
    min_password_length: 6,
};

// ============================================================================
// Fixtures
// ============================================================================

/// A memory store whose flush can be made to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_flush: bool,
    flushes: usize,
}

impl RecordStore for FlakyStore {
    fn residents(&mut self) -> &mut dyn EntityStore<Resident> {
        self.inner.residents()
    }

    fn foods(&mut self) -> &mut dyn EntityStore<Food> {
        self.inner.foods()
    }

    fn users(&mut self) -> &mut dyn EntityStore<User> {
        self.inner.users()
    }

    fn flush(&mut self) -> StoreResult<()> {
        self.flushes += 1;
        if std::mem::take(&mut self.fail_flush) {
            return Err(StoreError::failed("store", "disk full"));
        }
        self.inner.mark_clean();
        Ok(())
    }
}

struct App {
    driver: FrameDriver,
    ui: HeadlessToolkit,
    store: FlakyStore,
}

impl App {
    fn new() -> Self {
        let mut store = FlakyStore::default();
        add_user(&mut store.inner, "matron", "secret1", true);
        add_user(&mut store.inner, "nurse", "secret2", false);
        store.inner.mark_clean();
        Self {
            driver: FrameDriver::new(ThemeName::Dark, POLICY, WindowSize::new(60, 20)),
            ui: HeadlessToolkit::new(100, 30),
            store,
        }
    }

    fn frame(&mut self) {
        self.driver.frame(&mut self.ui, &mut self.store).unwrap();
    }

    fn login(&mut self, username: &str, password: &str) {
        self.ui
            .type_into("login.username", username)
            .type_into("login.password", password)
            .press("login.submit");
        self.frame();
        assert_eq!(self.driver.state(), AppState::MainMenu);
    }

    fn open(&mut self, menu_button: &'static str, state: AppState) {
        self.ui.press(menu_button);
        self.frame();
        assert_eq!(self.driver.state(), state);
    }

    fn dialog_ids(&self) -> Vec<&'static str> {
        self.ui.dialogs().iter().filter_map(|d| d.id).collect()
    }

    fn residents_table_live(&self) -> usize {
        self.driver
            .screen(AppState::Residents)
            .and_then(|s| s.table())
            .map_or(0, |t| t.live())
    }
}

fn add_user(store: &mut MemoryStore, username: &str, password: &str, is_admin: bool) {
    let credential = POLICY.derive(password);
    store
        .users
        .create(&User {
            username: username.to_string(),
            salt: credential.salt,
            password_hash: credential.hash,
            is_admin,
        })
        .unwrap();
}

fn resident(id: &str, name: &str) -> Resident {
    Resident {
        id: id.to_string(),
        full_name: name.to_string(),
        room: 3,
        birth_date: NaiveDate::from_ymd_opt(1941, 3, 9).unwrap(),
        diet: String::new(),
    }
}

fn type_resident(app: &mut App, id: &str, name: &str) {
    app.ui
        .type_into("resident.id", id)
        .type_into("resident.name", name)
        .type_into("resident.room", "21")
        .type_into("resident.born", "1939-09-01");
}

// ============================================================================
// Record scenarios
// ============================================================================

#[test]
fn test_submit_new_record() {
    let mut app = App::new();
    app.login("matron", "secret1");
    app.open("menu.residents", AppState::Residents);

    type_resident(&mut app, "R-10", "Cora Crawley");
    app.ui.press("resident.submit");
    app.frame();

    assert_eq!(app.store.inner.residents.read("R-10").unwrap().room, 21);
    assert!(app.dialog_ids().is_empty());
    // Persisted by the driver at the end of the frame.
    assert!(!app.store.inner.is_dirty());

    app.frame();
    let id_field = app.ui.find("resident.id").unwrap();
    assert_eq!(id_field.text, "");
}

#[test]
fn test_submit_conflict_confirm_and_cancel() {
    let mut app = App::new();
    app.store.inner.residents.create(&resident("R1", "Old")).unwrap();
    app.store.inner.mark_clean();
    app.login("matron", "secret1");
    app.open("menu.residents", AppState::Residents);

    type_resident(&mut app, "R1", "Declined");
    app.ui.press("resident.submit");
    app.frame();
    assert_eq!(app.dialog_ids(), vec!["resident.conflict"]);
    assert!(app.ui.dialogs()[0].text.contains("'R1'"));

    app.ui.answer(2);
    app.frame();
    assert_eq!(app.store.inner.residents.read("R1").unwrap().full_name, "Old");
    // The answered box was still drawn in the frame that read the answer.
    app.frame();
    assert!(app.dialog_ids().is_empty());

    type_resident(&mut app, "R1", "Accepted");
    app.ui.press("resident.submit");
    app.frame();
    app.ui.answer(1);
    app.frame();
    assert_eq!(app.store.inner.residents.read("R1").unwrap().full_name, "Accepted");
}

#[test]
fn test_delete_missing_record() {
    let mut app = App::new();
    app.login("matron", "secret1");
    app.open("menu.residents", AppState::Residents);

    app.ui.type_into("resident.id", "NOPE").press("resident.delete");
    app.frame();

    assert_eq!(app.dialog_ids(), vec!["resident.not_found"]);
    app.ui.answer(1);
    app.frame();
    app.frame();
    assert!(app.dialog_ids().is_empty());
}

#[test]
fn test_one_dialog_per_frame() {
    let mut app = App::new();
    app.login("matron", "secret1");
    app.open("menu.foods", AppState::Foods);

    // Blank fields and an invalid key at once: only the first condition shows.
    app.ui.type_into("food.code", "bad code").press("food.submit");
    app.frame();
    assert_eq!(app.dialog_ids(), vec!["food.required"]);

    for _ in 0..3 {
        app.frame();
        assert_eq!(app.ui.dialogs().len(), 1);
    }
}

#[test]
fn test_repeated_listing_holds_one_buffer() {
    let mut app = App::new();
    app.store.inner.residents.create(&resident("R1", "One")).unwrap();
    app.login("matron", "secret1");
    app.open("menu.residents", AppState::Residents);

    for _ in 0..10 {
        app.ui.press("resident.list");
        app.frame();
        assert_eq!(app.residents_table_live(), 1);
    }
    let panel = app.ui.find("resident.table").unwrap();
    assert!(panel.text.contains(&resident("R1", "One").table_row()));

    app.ui.press("resident.back");
    app.frame();
    assert_eq!(app.residents_table_live(), 0);
    assert_eq!(app.driver.state(), AppState::MainMenu);
}

// ============================================================================
// Navigation and session
// ============================================================================

#[test]
fn test_wrong_password_stays_on_login() {
    let mut app = App::new();
    app.ui
        .type_into("login.username", "matron")
        .type_into("login.password", "wrong!!")
        .press("login.submit");
    app.frame();
    assert_eq!(app.driver.state(), AppState::Login);
    assert_eq!(app.dialog_ids(), vec!["login.invalid"]);
}

#[test]
fn test_non_admin_cannot_open_users() {
    let mut app = App::new();
    app.login("nurse", "secret2");
    app.ui.press("menu.users");
    app.frame();
    assert_eq!(app.driver.state(), AppState::MainMenu);
    assert_eq!(app.dialog_ids(), vec!["menu.not_admin"]);
}

#[test]
fn test_stale_admin_flag_is_refreshed() {
    let mut app = App::new();
    app.login("matron", "secret1");
    assert!(app.driver.session().is_admin());

    let mut demoted = app.store.inner.users.read("matron").unwrap();
    demoted.is_admin = false;
    app.store.inner.users.update(&demoted).unwrap();

    app.ui.press("menu.users");
    app.frame();
    assert_eq!(app.driver.state(), AppState::MainMenu);
    assert!(!app.driver.session().is_admin());
    assert_eq!(app.dialog_ids(), vec!["menu.not_admin"]);
}

#[test]
fn test_overlay_logout_releases_buffers() {
    let mut app = App::new();
    app.login("matron", "secret1");
    app.open("menu.residents", AppState::Residents);
    app.ui.press("resident.list");
    app.frame();
    assert_eq!(app.residents_table_live(), 1);

    app.ui.press("overlay.logout");
    app.frame();
    assert_eq!(app.driver.state(), AppState::Login);
    assert!(!app.driver.session().is_logged_in());
    assert_eq!(app.residents_table_live(), 0);
}

#[test]
fn test_overlay_locked_while_dialog_pending() {
    let mut app = App::new();
    app.login("matron", "secret1");
    app.open("menu.residents", AppState::Residents);
    app.ui.press("resident.submit");
    app.frame();

    app.ui.press("overlay.logout");
    app.frame();
    assert_eq!(app.driver.state(), AppState::Residents);
    assert!(app.ui.find("overlay.logout").unwrap().locked);
}

/// Tries to jump straight from the login screen to residents.
struct Rogue;

impl Screen for Rogue {
    fn title(&self) -> &str {
        "Rogue"
    }

    fn draw(&mut self, _ui: &mut dyn Toolkit, ctx: &mut ScreenContext<'_>) {
        ctx.navigate(AppState::Residents);
    }
}

#[test]
fn test_illegal_transition_reverted() {
    let mut screens: indexmap::IndexMap<AppState, Box<dyn Screen>> = indexmap::IndexMap::new();
    screens.insert(AppState::Login, Box::new(Rogue));
    let mut driver = FrameDriver::with_screens(screens, ThemeName::Dark, POLICY, WindowSize::new(60, 20));
    let mut ui = HeadlessToolkit::new(80, 24);
    let mut store = MemoryStore::default();

    driver.frame(&mut ui, &mut store).unwrap();
    assert_eq!(driver.state(), AppState::Login);
}

// ============================================================================
// Shared error slot
// ============================================================================

#[test]
fn test_store_failure_surfaces_once() {
    let mut app = App::new();
    app.login("matron", "secret1");
    app.open("menu.residents", AppState::Residents);

    type_resident(&mut app, "R5", "Mary Crawley");
    app.store.fail_flush = true;
    app.ui.press("resident.submit");
    app.frame();
    assert!(app.driver.error().is_set());

    app.frame();
    assert_eq!(app.dialog_ids(), vec!["error"]);
    assert!(app.ui.dialogs()[0].text.contains("disk full"));
    assert!(app.ui.find("resident.submit").unwrap().locked);

    app.ui.answer(1);
    app.frame();
    assert!(!app.driver.error().is_set());
    app.frame();
    assert!(app.dialog_ids().is_empty());
}

#[test]
fn test_store_flushed_every_frame() {
    let mut app = App::new();
    for _ in 0..4 {
        app.frame();
    }
    assert_eq!(app.store.flushes, 4);
}

// ============================================================================
// Window
// ============================================================================

#[test]
fn test_resize_relayouts_all_screens() {
    let mut app = App::new();
    app.frame();
    let before = app.ui.find("login.submit").unwrap().bounds;

    app.ui.resize(140, 40);
    app.frame();
    let after = app.ui.find("login.submit").unwrap().bounds;
    assert_ne!(before, after);

    app.ui.resize(140, 40);
    app.frame();
    assert_eq!(app.ui.find("login.submit").unwrap().bounds, after);

    app.login("matron", "secret1");
    app.frame();
    let menu = app.ui.find("menu.residents").unwrap().bounds;
    assert!(menu.x + menu.width <= 140);
}

#[test]
fn test_too_small_window() {
    let mut app = App::new();
    app.ui.resize(50, 15);
    app.ui.press("login.submit");
    app.frame();

    let frame = app.ui.last_frame();
    assert!(frame.iter().all(|r| r.kind == WidgetKind::SizeWarning));
    assert!(app.dialog_ids().is_empty());
}
