//! # Design Core
//!
//! Layer model and transform interaction engine for a page-based design
//! editor. Compiles to WASM for use from a browser editor shell.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               design-core.wasm              │
//! ├─────────────────────────────────────────────┤
//! │  Project         │  Editor session          │
//! │  - Documents     │  - Active page           │
//! │  - Pages         │  - Selection             │
//! │  - Asset library │  - Pointer dispatch      │
//! │  - Brand kit     │  - Gesture state machine │
//! ├─────────────────────────────────────────────┤
//! │  Layer Store     │  Transform Interaction   │
//! │  - Z-order       │  - Move / Resize / Rotate│
//! │  - Groups        │  - Snapshot + rollback   │
//! │  - Panel view    │  - Geometry utilities    │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod event;
pub mod geometry;
pub mod group;
pub mod ids;
pub mod interaction;
pub mod layer;
pub mod panel;
pub mod project;
pub mod selection;
pub mod store;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::EngineConfig;
pub use document::{Document, Guides, Mockup, Page, PageKind, PhysicalSize};
pub use editor::Editor;
pub use error::{EditorError, EditorResult};
pub use event::{HitTarget, KeyModifiers, PointerEvent, PointerPhase};
pub use geometry::{bounding_box, rotate_point, Geometry, Point, Rect};
pub use group::Group;
pub use ids::{AssetId, DocumentId, GroupId, LayerId, PageId};
pub use interaction::{
    GeometryUpdate, Handle, HandleLayout, Interaction, InteractionKind, LayerSnapshot,
};
pub use layer::{
    Fill, GradientStop, ImageContent, Layer, LayerKind, LayerPatch, ShapeContent, ShapeKind,
    TextAlign, TextContent, TextEffect, DEFAULT_FONT_FAMILY,
};
pub use panel::{LayerPanel, PanelRow};
pub use project::{
    Asset, AssetLibrary, BrandColor, BrandConstraints, BrandFont, BrandKit, BrandLogo, BrandRole,
    DesignBrief, FileHandle, Project,
};
pub use selection::{SelectMode, Selection};
pub use store::LayerStore;

/// Design core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
