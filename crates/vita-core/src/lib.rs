pub mod chat;
pub mod error;
pub mod panels;
pub mod router;
pub mod state;
pub mod vitals;

pub use error::SubmitRejection;
