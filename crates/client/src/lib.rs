//! Client code for course-nav.
//!
//! This crate provides the existence probe, probe pacing, the availability
//! sweep and course-page parsing shared by the server and CLI.

pub mod course;
pub mod navigator;
pub mod pacing;
pub mod probe;
pub mod sweep;

pub use course::{CourseError, CourseInfo, Semester, TermGrid, TermLink, TermStatus};
pub use navigator::{CourseTerms, Navigator};
pub use pacing::{FixedDelay, MinInterval, PacingPolicy};
pub use probe::{ExistenceProbe, HttpProbe, ProbeConfig};
pub use sweep::{AvailabilitySweep, Resolution, ResolutionSource, SweepReport};
