//! Interactive session for the web CLI.
//!
//! [`Session`] owns everything a user touches: the filesystem, the working
//! directory, command history, the output log and the persistent store.
//! Input is routed by an explicit [`InputMode`] so the Dragon Slayer game
//! and the theme picker can take over the prompt without replacing it.

pub mod game;
pub mod input;
pub mod output;
pub mod session;
pub mod theme;
pub mod weather;

pub use input::InputField;
pub use output::{OutputLog, render_html};
pub use session::{InputMode, InputPurpose, MenuId, Session};
pub use theme::{Theme, ThemeColors, ThemeManager};
pub use weather::WeatherWorker;
