//! Models module

pub mod request;
pub mod response;
pub mod result;
pub mod session;

pub use request::*;
pub use response::*;
pub use result::*;
pub use session::*;
