//! GUI module
//!
//! Provides the Slint-based graphical user interface: window setup, file
//! dialogs, and state synchronization with the studio controller.

pub mod gui_controller;

pub use gui_controller::GuiController;
