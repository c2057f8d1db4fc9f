pub(crate) mod frame_store;
