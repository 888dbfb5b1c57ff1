pub mod advice;
pub mod chat;
pub mod convert;
pub mod error;
pub mod feed;
pub mod messages;
pub mod moments;
pub mod ratings;
pub mod similar;
pub mod users;

pub use error::{CoreError, CoreResult};
