//! Terminal facing pieces: the URL picker, tables and the browser opener.

pub mod browser;
pub mod fuzzy_finder;
pub mod table;
