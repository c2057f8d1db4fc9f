pub(crate) mod scroll_span;
pub(crate) mod signal;
pub(crate) mod smooth;
