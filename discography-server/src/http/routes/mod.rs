//! Route handlers organized by resource

pub mod albums;
pub mod artists;
pub mod collection;
pub mod health;
