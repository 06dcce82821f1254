//! Renderers: the HTML dashboard and the plain-text summary.

pub mod html;
pub mod text;

pub use html::{DashboardData, render_html_dashboard};
pub use text::render_text_summary;
