//! Core library modules for sportlog.
//!
//! - [`activity`] and [`stats`]: the domain model and the statistics engine
//! - [`logbook`]: activity management over the database layer
//! - [`config`], [`data_storage`], [`messages`]: configuration and output
//! - [`view`], [`formatter`]: console rendering
//!
//! ## Usage
//!
//! ```rust
//! use sportlog::libs::activity::{ActivityDraft, SportType};
//! use sportlog::libs::stats::derive_fields;
//!
//! let mut draft = ActivityDraft::new(SportType::ScubaDiving, "2025-06-01");
//! draft.bottom_time = Some(45i64.into());
//! let derived = derive_fields(SportType::ScubaDiving, &[], &draft.sport_fields());
//! assert_eq!(derived.dive_number, Some(1));
//! assert_eq!(derived.total_bottom_time, Some(45));
//! ```

pub mod activity;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod formatter;
pub mod logbook;
pub mod messages;
pub mod stats;
pub mod view;
