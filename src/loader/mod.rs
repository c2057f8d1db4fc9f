pub(crate) mod frame_loader;
pub(crate) mod plan;
pub(crate) mod scheduler;
