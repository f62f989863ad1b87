//! The build-time glue of a snippet documentation site. Content is loaded
//! into an in-memory content graph, and a handful of build hooks turn it into
//! requests for the site's renderer:
//!
//! 1. Declaring the `Snippet` node schema ([`crate::schema`])
//! 2. Assigning each markdown node a slug as it is created ([`crate::slug`])
//! 3. Joining snippet metadata with rendered markdown into `Snippet` nodes
//!    ([`crate::snippet`])
//! 4. Creating snippet, archive and tag pages ([`crate::pages`])
//!
//! Hooks never touch the graph directly. They read it through
//! [`host::ContentGraph`] and dispatch [`host::Action`]s, which
//! [`build::build_site`] applies to a [`graph::SiteGraph`] between stages.
//! The finished graph can be written out as a JSON manifest for the template
//! renderer with [`build::write_manifest`].

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod digest;
pub mod graph;
pub mod host;
pub mod markdown;
pub mod node;
pub mod pages;
pub mod schema;
pub mod slug;
pub mod snippet;
pub mod source;
pub mod tag;
