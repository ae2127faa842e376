pub mod impl_console;
pub mod impl_gui;
pub mod view_model;
