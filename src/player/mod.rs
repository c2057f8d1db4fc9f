pub(crate) mod controller;
pub(crate) mod scroll_player;
