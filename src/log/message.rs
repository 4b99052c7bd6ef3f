use super::Error;
use crate::region::Region;
use std::fmt::Display;

pub const WRITE_FAILURE: &str = "write failure";
pub const UNSERIALIZABLE: &str = "unserializable value";
pub const DUPLICATE_PARTIAL: &str = "duplicate partial";

/// Return an [`Error`] explaining that writing a fragment of output failed.
///
/// The error points at the region of `source` whose output was being written,
/// and carries the name of the partial when the failure happened inside one.
pub fn error_write(source: &str, region: Region, name: Option<&str>) -> Error {
    let error = Error::build(WRITE_FAILURE)
        .with_pointer(source, region)
        .with_help("the writer passed to `render_to` refused the rendered output");

    match name {
        Some(name) => error.with_name(name),
        None => error,
    }
}

/// Return an [`Error`] describing a value that could not be serialized into a view.
pub fn error_serialize<T>(cause: T) -> Error
where
    T: Display,
{
    Error::build(UNSERIALIZABLE).with_help(format!(
        "value could not be converted to a view: {cause}"
    ))
}

/// Return an [`Error`] describing a partial name that is already taken.
pub fn error_duplicate_partial(name: &str) -> Error {
    Error::build(DUPLICATE_PARTIAL).with_help(format!(
        "partial with name `{name}` already exists, overwrite it with `.insert_must`"
    ))
}
