//! Session provisioning.
//!
//! Turns a username into a broker session carrying the user's identity and
//! every ACL grant their policy allows.
//!
//! ```text
//! START → AUTHORIZE_GATE → SESSION_CREATE → IDENTITY_ATTACH → ACL_SCAN → DONE
//!              │                 │
//!              └──── ABORT ◄─────┘
//! ```
//!
//! Only the gate and session creation abort. Identity and grant failures
//! are logged and counted; the session is still returned.

mod error;
mod provisioner;

pub use error::ProvisionError;
pub use provisioner::{ProvisionReport, ProvisionSettings, SessionProvisioner, USER_KEY};
