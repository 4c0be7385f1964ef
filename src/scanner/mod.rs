pub mod change_detector;
pub mod listing;
pub mod listing_source;
pub mod poller;
pub mod schedule;

pub use change_detector::ChangeDetector;
pub use listing::Listing;
pub use listing_source::{HtmlListingSource, ListingSelectors, ListingSource, SourceSnapshot};
pub use poller::ListingPoller;
pub use schedule::{ActiveHours, GatedSchedule};
