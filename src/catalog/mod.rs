//! The in-memory catalog: raw records normalized into displayable items,
//! then filtered and sorted into the ranked view.

pub mod filter;
pub mod normalize;
pub mod sort;
pub mod types;
pub mod view_state;

pub use filter::FilterState;
pub use normalize::normalize;
pub use types::{CatalogItem, Deadline, RawConference, RawDeadline, RawDeadlines, Status};
pub use view_state::ViewState;
