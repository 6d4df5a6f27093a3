//! Domain entities for LED-Over-IP.
//!
//! This module contains pure business state with no infrastructure
//! dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers. The innermost
//! layer is called the **domain** (or "entities" layer). Domain code:
//!
//! - Contains the core business rules of the application.
//! - Has **no** imports from OS APIs, network libraries, or hardware drivers.
//! - Can be compiled and tested on any platform without any external setup.
//!
//! Here the domain is tiny on purpose: the whole system revolves around one
//! boolean (is the output line engaged or not) and the rules for reporting
//! it. Everything else (sockets, GPIO pins, admission control) lives in outer
//! layers that depend on this one, never the other way around.

/// The controlled output line's logical state.
///
/// See [`output::OutputState`] for the main type.
pub mod output;
