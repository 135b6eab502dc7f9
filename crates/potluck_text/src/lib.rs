//! # potluck_text
//!
//! Text ordering primitives shared by every sorted structure in Potluck.
//!
//! - [`collate`] orders strings the way a reader expects an alphabetical
//!   listing to look: accents sort next to their base letter and case only
//!   breaks ties.
//! - [`alphabetic_class`] buckets a title under the plain letter it starts
//!   with, for alphabet navigation.
//!
//! Both are pure functions; the cache, the indexes and the scanner must all
//! use the same comparator or the single-pass merge loses its alignment.

mod collate;
mod fold;

pub use collate::{collate, is_ascending};
pub use fold::{NON_LETTER_CLASS, alphabetic_class, fold_key};
