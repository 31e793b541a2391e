//! Record types kept by the store and the session shared between screens.
//!
//! Every entity implements [`Record`], which is all the store and the
//! listing code need to know about it: a stable key and a one-line
//! rendering for bulk listings.

mod records;
mod session;

pub use records::*;
pub use session::*;

use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// An entity persisted by the record store.
pub trait Record: Clone + Debug + PartialEq + Serialize + DeserializeOwned {
    /// Lower-case entity name used in messages and errors.
    const ENTITY: &'static str;

    /// Unique key of this record.
    fn key(&self) -> &str;

    /// Column header for bulk listings.
    fn table_header() -> String;

    /// One row of a bulk listing.
    fn table_row(&self) -> String;
}

/// Format records as a fixed-width table with a header and rule.
pub fn format_table<'a, R: Record + 'a>(records: impl IntoIterator<Item = &'a R>) -> String {
    let header = R::table_header();
    let rule = "-".repeat(unicode_width::UnicodeWidthStr::width(header.as_str()));
    let mut out = format!("{header}\n{rule}\n");
    let mut rows = 0usize;
    for record in records {
        out.push_str(&record.table_row());
        out.push('\n');
        rows += 1;
    }
    if rows == 0 {
        out.push_str(&format!("(no {} records)\n", R::ENTITY));
    }
    out
}
