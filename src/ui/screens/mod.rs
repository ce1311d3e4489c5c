pub(crate) mod expenses;
pub(crate) mod gallery;
pub(crate) mod summary;
