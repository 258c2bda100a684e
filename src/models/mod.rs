pub mod alert;
pub mod auth;
pub mod comparison;
pub mod daily;
pub mod expense;
pub mod summary;

pub use alert::*;
pub use auth::*;
pub use comparison::*;
pub use daily::*;
pub use expense::*;
pub use summary::*;
