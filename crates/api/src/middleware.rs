/// Error-to-response mapping shared by every handler
pub mod error_handling;
/// Session id extraction from request headers
pub mod session;
