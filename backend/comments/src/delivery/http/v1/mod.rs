pub mod comments;
pub mod envelope;
pub mod middleware;
pub mod system;
