//! HavenChat - confidential support chat core
//!
//! This crate provides the core of a confidential support chat for
//! survivors of gender-based violence: recording a voice message
//! (record, pause/resume, stop, preview, send/cancel), transcribing it
//! and generating a supportive reply through an AI API, and a
//! rule-based risk classifier that selects a canned supportive reply
//! whenever the AI pipeline is unreachable.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Recorder session state machine, voice-note value
//!   objects, risk classifier and fallback replies, domain errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal capture, rodio
//!   preview, OpenAI-compatible API, XDG config)
//! - **CLI**: Command-line interface and output formatting

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
