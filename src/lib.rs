#![doc(html_root_url = "https://docs.rs/artisan-reload/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod diff;
pub mod distinct;
pub mod error;
pub mod mediator;
pub mod reloader;
pub mod strategy;
pub mod view;
