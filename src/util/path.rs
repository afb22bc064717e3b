use crate::prelude::*;
use easy_ext::ext;
use std::path::Path;

#[ext(PathExt)]
pub(crate) impl Path {
    fn unwrap_utf8(&self) -> &Utf8Path {
        Utf8Path::from_path(self).unwrap_or_else(|| panic!("BUG: Path is not UTF8: {self:?}"))
    }
}
