//! Side panels and bars around the viewport

pub mod controls;
pub mod status_bar;
