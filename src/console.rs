//! The collection-management console: one generic controller shared by every entity screen.
//!
//! Data flows client -> [`CollectionLoader`] -> [`visible`] -> ([`SelectionSet`],
//! [`StatusWorkflow`], [`ConfirmationGate`]) -> [`MutationGateway`] -> back into the loader.

mod confirm;
mod filter;
mod gateway;
mod loader;
mod screen;
mod selection;
mod workflow;

pub use self::confirm::*;
pub use self::filter::*;
pub use self::gateway::*;
pub use self::loader::*;
pub use self::screen::*;
pub use self::selection::*;
pub use self::workflow::*;
