//! Sesame runtime: session provisioning and ACL grant resolution.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  sesame-types : SessionId, ErrorCode                         │
//! │  sesame-auth  : GroupPattern, Permission, AccessPolicy,      │
//! │                 is_authorized, Authorization                 │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Runtime Layer (THIS CRATE)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  config/    : SesameConfig, ConfigLoader                    │
//! │  uci/       : ConfigStore, UCI parser, file/memory stores   │
//! │  access     : find_policy (user → AccessPolicy)             │
//! │  acl/       : AclDocument, expand, AclLibrary               │
//! │  broker/    : SessionBroker, MemoryBroker, UbusBroker       │
//! │  provision/ : SessionProvisioner                            │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  sesame-cli : `sesame` binary                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use sesame_runtime::{SessionProvisioner, UbusBroker, UciFileStore};
//!
//! let provisioner = SessionProvisioner::new(
//!     UciFileStore::new("/etc/config"),
//!     UbusBroker::default(),
//! );
//!
//! match provisioner.setup_session("alice") {
//!     Some(sid) => println!("{sid}"),
//!     None => eprintln!("login failed"),
//! }
//! ```

pub mod access;
pub mod acl;
pub mod broker;
pub mod config;
pub mod provision;
pub mod uci;

pub use access::find_policy;
pub use acl::{expand, AclDocument, AclLibrary, DocumentError, GrantDescriptor, LibraryError};
pub use broker::{BrokerConnector, BrokerError, MemoryBroker, SessionBroker, UbusBroker};
pub use config::{ConfigError, ConfigLoader, SesameConfig};
pub use provision::{ProvisionError, ProvisionReport, ProvisionSettings, SessionProvisioner};
pub use uci::{ConfigStore, MemoryConfigStore, StoreError, UciFileStore};
