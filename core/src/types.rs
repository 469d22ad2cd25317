//! Shared primitive types used across the engine.

/// Client identity: the unique display name within one portfolio.
pub type ClientId = String;

/// A monetary amount in millions ("M"). No currency conversion happens anywhere.
pub type Money = f64;

/// Whole years with the bank.
pub type Years = u32;

/// Whole days since an event.
pub type Days = u32;
