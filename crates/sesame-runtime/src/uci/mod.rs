//! Configuration store access.
//!
//! Access policies live in a UCI-style configuration store: named
//! packages holding typed sections, each with scalar `option` and
//! multi-valued `list` entries.
//!
//! ```text
//! /etc/config/luci
//! ├── config access 'admin'
//! │   ├── option user 'alice'
//! │   ├── list read '*'
//! │   └── list write 'network'
//! └── config core 'main'
//!     └── option lang 'auto'
//! ```
//!
//! # Architecture
//!
//! ```text
//! ConfigStore trait           ← what the provisioner consumes
//!     ├── UciFileStore        ← reads /etc/config/<package>
//!     └── MemoryConfigStore   ← in-process packages (tests, dry runs)
//! ```
//!
//! Stores are queried per login; nothing is cached.

mod error;
mod parser;
mod store;
mod types;

pub use error::StoreError;
pub use parser::parse_package;
pub use store::{ConfigStore, MemoryConfigStore, UciFileStore};
pub use types::{OptionValue, UciPackage, UciSection};

/// Default directory of UCI configuration files.
pub const DEFAULT_UCI_DIR: &str = "/etc/config";
