pub mod emotion;
pub mod page;
pub mod selector;
pub mod session;
pub mod summary;
pub mod view_state;
pub mod wheel;

// Re-export commonly used types for convenience
pub use emotion::{IntensityBand, PrimaryEmotion, Resolution, resolve, shade};

pub use session::{
    ConversationSession, RawSession, SelectionQuery, SessionBatch, SessionError, SessionPayload,
    SortOrder,
};

pub use page::{EmotionPage, build_page};

pub use selector::{
    EmotionFilter, FilterOption, TimeRange, WindowPolicy, clamp_cursor, filter_options, select,
    time_range,
};

pub use summary::{EmotionSummary, SummaryRow, summarize};

pub use view_state::{DisplayLimit, PageParams, ViewEvent, ViewState};

pub use wheel::{RadialPolicy, RenderOptions, WheelScene, legend, render, render_svg};
