//! The page regions the pipelines write to.

use crate::chart::Tooltip;

/// User-facing page regions and prompts.
///
/// The error region holds at most one message; each `show_error` replaces the
/// previous one.
pub trait Surface {
    fn show_error(&mut self, message: &str);
    fn hide_error(&mut self);
    fn set_status(&mut self, status: &str);
    fn set_query_time(&mut self, text: &str);
    fn set_num_data_points(&mut self, text: &str);
    fn set_query_text(&mut self, text: &str);
    fn set_chart_title(&mut self, title: &str);
    /// Blocking yes/no prompt.
    fn confirm(&mut self, message: &str) -> bool;
    fn set_reset_zoom_visible(&mut self, visible: bool);
    fn show_tooltip(&mut self, tooltip: &Tooltip);
    fn remove_tooltip(&mut self);
}
