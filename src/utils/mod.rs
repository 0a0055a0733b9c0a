/// Utility modules for card matcher
///
/// This module contains utility functions for file reading and output
/// formatting.

pub mod file_utils;
pub mod output_formatter;
