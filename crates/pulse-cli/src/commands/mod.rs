pub mod dispatch;
pub mod status;
pub mod update;
pub mod view;
