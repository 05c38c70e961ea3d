//! RetroPaint engine: an in-memory raster editor driven by pointer input.
//!
//! The crate holds the drawing/editing core — pixel surface, per-tool
//! gesture state machine, snapshot undo/redo, selection/clipboard
//! lifecycle, flood fill, and the shareable payload codec — plus thin
//! trait seams for its external collaborators (blob storage and the
//! link-shortening service). Window chrome, menus, and theming live in
//! the GUI shell, not here.

pub mod logger;

pub mod canvas;
pub mod cli;
pub mod history;
pub mod io;
pub mod ops;
pub mod selection;
pub mod session;
pub mod share;
pub mod shorten;
pub mod storage;
pub mod tools;

pub use canvas::{Rect, Surface};
pub use history::{HistoryManager, Snapshot};
pub use selection::{Clipboard, Selection, SelectionController, SelectionPhase};
pub use session::EditorSession;
pub use share::{DecodedShare, ShareError};
pub use tools::{ToolEngine, ToolKind};
