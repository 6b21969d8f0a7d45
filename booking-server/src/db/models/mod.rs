//! Database Models

// Serde helpers
pub mod serde_helpers;

// Accounts
pub mod user;

// Inventory
pub mod table;

// Reservations
pub mod booking;

// Re-exports
pub use user::{User, UserCreate, UserId, UserInfo, UserUpdate};
pub use table::{Table, TableCreate, TableUpdate};
pub use booking::{Booking, BookingCreate, BookingUpdate};
