//! Shared utilities.

mod hash;

pub use hash::{
    generate_salt, hash_password, verify_password, Credential, PasswordPolicy,
};
