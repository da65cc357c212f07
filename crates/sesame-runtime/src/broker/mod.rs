//! Session broker client side.
//!
//! The provisioner talks to a session broker through two traits:
//!
//! ```text
//! BrokerConnector::connect()  → Client: SessionBroker
//!                                  ├── create(idle_timeout)  → SessionId
//!                                  ├── set(sid, key, value)
//!                                  └── grant(sid, &GrantDescriptor)
//! ```
//!
//! A client is an owned value: it is obtained once per provisioning run and
//! dropped when the run ends, whatever the outcome. Every call carries its
//! own timeout.
//!
//! # Implementations
//!
//! | Type | Backend |
//! |------|---------|
//! | [`MemoryBroker`] | In-process state, used for dry runs and tests |
//! | [`UbusBroker`] | The `ubus` command line client |

mod error;
mod memory;
mod ubus;

pub use error::BrokerError;
pub use memory::{BrokerCall, MemoryBroker};
pub use ubus::UbusBroker;

use crate::acl::GrantDescriptor;
use sesame_types::SessionId;
use std::time::Duration;

/// Operations on a connected session broker.
pub trait SessionBroker {
    /// Creates a session that expires after `idle_timeout` without use.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::NoSessionId`] if the broker replied without a
    /// usable id, or another [`BrokerError`] if the call failed.
    fn create(&self, idle_timeout: Duration, call_timeout: Duration)
        -> Result<SessionId, BrokerError>;

    /// Stores `key = value` on the session.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError`] if the call failed.
    fn set(
        &self,
        sid: &SessionId,
        key: &str,
        value: &str,
        call_timeout: Duration,
    ) -> Result<(), BrokerError>;

    /// Adds the descriptor's `[object, sub]` pairs to the session's ACL.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError`] if the call failed.
    fn grant(
        &self,
        sid: &SessionId,
        grant: &GrantDescriptor,
        call_timeout: Duration,
    ) -> Result<(), BrokerError>;
}

/// Produces broker clients.
pub trait BrokerConnector {
    /// Client handed out by [`connect`](Self::connect).
    type Client: SessionBroker;

    /// Connects to the broker.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Unavailable`] if the broker cannot be reached.
    fn connect(&self) -> Result<Self::Client, BrokerError>;
}

impl<C: BrokerConnector + ?Sized> BrokerConnector for &C {
    type Client = C::Client;

    fn connect(&self) -> Result<Self::Client, BrokerError> {
        (**self).connect()
    }
}
