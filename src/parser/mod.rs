//! Regex extraction over raw GSMArena markup: results pages → candidates,
//! device pages → display specs.

pub mod patterns;
pub mod search;
pub mod specs;
