//! HTTP route handlers

pub mod cards;
