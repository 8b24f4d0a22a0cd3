/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The edit session and its container (session.rs)
pub mod data;
pub mod session;
