//! Chart rendering: series reshaping, plot configuration and interaction.

mod plot;
mod renderer;
mod series;
pub mod tooltip;
mod view;

pub use plot::*;
pub use renderer::*;
pub use series::*;
pub use tooltip::{Tooltip, TooltipSize, Viewport};
pub use view::*;
