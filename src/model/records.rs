//! Resident, food and user records.

use super::Record;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static RESIDENT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]{1,12}$").expect("valid resident id pattern"));
static FOOD_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9-]{1,12}$").expect("valid food code pattern"));
static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_.]{3,24}$").expect("valid username pattern"));

/// Date format used for birth dates on screen and in listings.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Resident
// ============================================================================

/// A person living at the home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    pub id: String,
    pub full_name: String,
    pub room: u32,
    pub birth_date: NaiveDate,
    /// Free-text dietary notes
    #[serde(default)]
    pub diet: String,
}

impl Resident {
    /// Whether `id` is an acceptable resident key.
    pub fn is_valid_id(id: &str) -> bool {
        RESIDENT_ID.is_match(id)
    }
}

impl Record for Resident {
    const ENTITY: &'static str = "resident";

    fn key(&self) -> &str {
        &self.id
    }

    fn table_header() -> String {
        format!(
            "{:<12} {:<24} {:>5} {:<10} {}",
            "ID", "NAME", "ROOM", "BORN", "DIET"
        )
    }

    fn table_row(&self) -> String {
        format!(
            "{:<12} {:<24} {:>5} {:<10} {}",
            self.id,
            truncate(&self.full_name, 24),
            self.room,
            self.birth_date.format(DATE_FORMAT),
            self.diet
        )
    }
}

// ============================================================================
// Food
// ============================================================================

/// A menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub code: String,
    pub name: String,
    pub calories: u32,
    #[serde(default)]
    pub allergens: String,
}

impl Food {
    /// Whether `code` is an acceptable food key.
    pub fn is_valid_code(code: &str) -> bool {
        FOOD_CODE.is_match(code)
    }
}

impl Record for Food {
    const ENTITY: &'static str = "food";

    fn key(&self) -> &str {
        &self.code
    }

    fn table_header() -> String {
        format!("{:<12} {:<24} {:>6} {}", "CODE", "NAME", "KCAL", "ALLERGENS")
    }

    fn table_row(&self) -> String {
        format!(
            "{:<12} {:<24} {:>6} {}",
            self.code,
            truncate(&self.name, 24),
            self.calories,
            self.allergens
        )
    }
}

// ============================================================================
// User
// ============================================================================

/// A staff account. The password is only ever stored as a salted digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub salt: String,
    pub password_hash: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Whether `username` is an acceptable user key.
    pub fn is_valid_username(username: &str) -> bool {
        USERNAME.is_match(username)
    }
}

impl Record for User {
    const ENTITY: &'static str = "user";

    fn key(&self) -> &str {
        &self.username
    }

    fn table_header() -> String {
        format!("{:<24} {}", "USERNAME", "ROLE")
    }

    fn table_row(&self) -> String {
        let role = if self.is_admin { "admin" } else { "staff" };
        format!("{:<24} {}", self.username, role)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
