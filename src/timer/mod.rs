pub mod clock;
pub mod controller;
pub mod state;
pub mod visibility;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{TimerConfig, TimerController, TimerSnapshot};
pub use state::{TimerState, TimerStatus};
pub use visibility::{Visibility, VisibilityNotifier};
