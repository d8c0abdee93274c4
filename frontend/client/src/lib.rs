//! Client side of the nested comments API: the HTTP client, the reply
//! forest and the page state that the `comments-client` binary drives.

pub mod api;
pub mod comment;
pub mod config;
pub mod forest;
pub mod view;
