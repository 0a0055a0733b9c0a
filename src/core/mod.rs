/// Core module for card matching
///
/// This module contains the candidate recognizer, the Luhn checksum, the
/// issuer prefix table, and the matcher that composes them.

pub mod checksum;
pub mod issuer;
pub mod matcher;
pub mod patterns;
