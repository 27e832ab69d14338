//! Declarative entity table, record shape, and status fields shared by every console screen.

mod entity;
mod record;
mod status;

pub use self::entity::*;
pub use self::record::*;
pub use self::status::*;
