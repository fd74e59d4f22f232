//! Data shapes exchanged with the Claviz server.
//!
//! All wire names are camelCase. Shapes the server does not pin down keep
//! their unknown fields in a flattened `extra` map.

pub mod branch;
pub mod entity;
pub mod fact;
pub mod function;
pub mod user;

// Re-export commonly used types
pub use branch::*;
pub use entity::*;
pub use fact::*;
pub use function::*;
pub use user::*;
