//! Permission matrix operations and the token codec.

pub mod codec;
pub mod change;
pub mod matrix;

pub use change::MatrixChange;
pub use matrix::PermissionMatrix;
