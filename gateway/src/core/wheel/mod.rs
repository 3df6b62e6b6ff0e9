//! Plutchik wheel renderer.
//!
//! Turns an ordered list of selected sessions into a drawable scene and,
//! optionally, an SVG document.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ selected sessions (most recent first)                        │
//! │        │                                                     │
//! │        ▼  layout::render(RenderOptions)                      │
//! │ ┌──────────────────────────────────────────────────────────┐ │
//! │ │ WheelScene                                               │ │
//! │ │   wedges  : 8, active iff primary of selected[0]         │ │
//! │ │   bands   : 8 × {weak, base, strong}                     │ │
//! │ │   markers : one per resolvable session                   │ │
//! │ └──────────────────────────────────────────────────────────┘ │
//! │        │                                                     │
//! │        ▼  svg::render_svg                                    │
//! │ <svg>…</svg>                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering is synchronous and pure. Nothing here performs I/O.

pub mod geometry;
pub mod layout;
pub mod legend;
pub mod svg;
pub mod tooltip;

pub use geometry::{
    DEFAULT_CANVAS_SIZE, MIN_CANVAS_SIZE, Point, WheelGeometry, cartesian_to_polar,
    polar_to_cartesian,
};
pub use layout::{Band, Marker, RadialPolicy, RenderOptions, WheelScene, Wedge, render};
pub use legend::{BandLegendEntry, Legend, PrimaryLegendEntry, legend};
pub use svg::render_svg;
pub use tooltip::{TooltipContent, place_tooltip};
