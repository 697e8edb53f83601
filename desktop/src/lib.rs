//! Windowing and interaction core of the AJOS graphical desktop.
//!
//! Everything in here is hardware-agnostic: the window manager, the
//! drag/resize state machine, the terminal emulator and the taskbar talk
//! to the machine only through the collaborator traits in [`hal`]. The
//! kernel crate wires those traits to real devices and hands control to
//! [`desktop::Desktop::run`].

#![cfg_attr(not(test), no_std)]

#[macro_use]
pub mod logger;

pub mod commands;
pub mod config;
pub mod desktop;
pub mod error;
pub mod geometry;
pub mod hal;
pub mod keys;
pub mod taskbar;
pub mod terminal;
pub mod window;
pub mod wm;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{DesktopConfig, Theme};
pub use desktop::{Desktop, EdgeMask, Interaction, MouseSnapshot};
pub use error::WmError;
pub use geometry::{Point, Rect};
pub use hal::{
    Clock, Color, Devices, Display, FramePacer, Glyphs, KeySource, MouseSource, Surface,
    SystemControl, WallTime,
};
pub use keys::Key;
pub use terminal::{SystemRequest, Terminal, TerminalPool};
pub use window::{ContentKind, Window, WindowId};
pub use wm::WindowManager;
