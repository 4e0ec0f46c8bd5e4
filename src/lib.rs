//! Client for the js-mailer form mailer service.
//!
//! Fetches a one-time sender token, points a form at the token's target and
//! submits it, updating the submit button and the error banner of a
//! [`page::page_model::Document`] along the way.

pub mod cli;
pub mod logging;
pub mod mailer;
pub mod page;
pub mod trace;
