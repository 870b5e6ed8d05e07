//! Domain layer: core types, country directory, and event system.
//!
//! This module contains the server-side domain model including country
//! codes and the static directory, submission rows and their aggregate,
//! the event bus for broadcasting new submissions, and the clock used for
//! rate-limit decisions.

pub mod clock;
pub mod country;
pub mod country_code;
pub mod event_bus;
pub mod submission;
pub mod submission_event;

pub use clock::{Clock, ManualClock, SystemClock};
pub use country::Country;
pub use country_code::CountryCode;
pub use event_bus::EventBus;
pub use submission::{
    AggregateSnapshot, CountryCount, DISPLAY_NAME_MAX_CHARS, NewSubmission, Submission,
};
pub use submission_event::{SUBMISSIONS_TOPIC, SubmissionEvent};
