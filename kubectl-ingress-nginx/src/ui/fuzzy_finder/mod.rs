//! Interactive selection with `skim`.

mod url_list;

pub use self::url_list::UrlListExt;
