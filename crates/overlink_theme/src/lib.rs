//! Overlink Theme - declarative visual themes
//!
//! # Features
//!
//! - Theme bundles of layered assets and draw reducers
//! - Per-layer visibility that gates which reducers are active
//! - Audio and shader preset names per theme
//! - Built-in `neonGrid`, `forestGlade` and `cosmicVoid` themes
//!
//! # Example
//!
//! ```ignore
//! use overlink_theme::prelude::*;
//!
//! let mut themes = ThemeRegistry::with_default_themes();
//! themes.activate_theme("neonGrid");
//! themes.set_layer(ThemeLayer::Effects, true);
//! let reducers = themes.active_theme_reducers();
//! ```

pub mod builtin;
pub mod registry;
pub mod theme;

pub mod prelude {
    pub use crate::builtin::default_themes;
    pub use crate::registry::{ThemePreview, ThemeRegistry, ThemeSnapshot};
    pub use crate::theme::{ThemeAsset, ThemeConfig, ThemeDrawReducer, ThemeLayer, ThemeReducerKind};
}

pub use prelude::*;
