pub mod config;
pub mod error;
pub mod location;
pub mod navigator;
pub mod notice;
pub mod session;
pub mod state;
pub mod view;

pub use config::NavigatorConfig;
pub use error::{LocationError, TransitionError};
pub use location::{
    FixedLocationTracker, LocationTracker, LocationUpdate, ManualLocationTracker, WatchHandle,
};
pub use navigator::{ModificationOutcome, Navigator};
pub use notice::{Notice, NoticeLevel};
pub use session::{NavigationSession, RouteChoice, SessionEvent};
pub use state::{ActiveRoute, NavigationState, NavigationStateKind};
pub use view::{CandidateSummary, MapBounds, NavigationView, RouteSummary};
