pub mod advice;
pub mod auth;
pub mod chats;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod moments;
pub mod ratings;
pub mod users;
