//! Action framework for the Hearth rule core
//!
//! Actions are the side effects executed when a rule's condition fires:
//!
//! - [`SendAction`]: one outbound command message
//! - [`ActionList`]: ordered composite with per-entry error isolation
//! - [`ForEachModelAction`]: delegate executed once per matching model
//! - [`LogAction`]: info-level log line
//!
//! Actions execute against an [`ActionContext`]: per-firing variables,
//! a model snapshot, and the outbound side of the message bus. Variable
//! scoping uses explicit layered environments ([`ScopedContext`],
//! [`NamespacedContext`]) rather than context subclassing.
//!
//! Partial failure is deliberate: composite actions capture each entry's
//! `Result`, log failures, and keep going. A rule with five actions where
//! the third fails still executes the fourth and fifth.

pub mod action;
pub mod context;
pub mod foreach;
pub mod list;
pub mod log;
pub mod send;

#[cfg(test)]
pub(crate) mod testutil;

pub use action::{Action, ActionError, ActionResult};
pub use context::{ActionContext, NamespacedContext, ScopedContext};
pub use foreach::{ForEachModelAction, ModelPredicate};
pub use list::{ActionList, ActionListBuilder};
pub use log::{LogAction, VAR_MESSAGE};
pub use send::{
    AddressResolver, AttributeResolver, SendAction, SendActionBuilder, VAR_ATTRIBUTES, VAR_TO,
};
