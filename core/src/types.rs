//! Shared primitive types used across the engine.

/// Zero-based index into the run's date range.
pub type DayIndex = usize;

/// A stable, unique user identifier (UUID string).
pub type UserId = String;

/// A stable, unique session identifier (UUID string).
pub type SessionId = String;
