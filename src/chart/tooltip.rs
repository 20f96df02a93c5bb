//! Hover tooltip contents and placement.

use chrono::{DateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

/// Offset between cursor and tooltip, in pixels.
const CURSOR_OFFSET: f64 = 5.0;

/// Measured size of the rendered tooltip element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipSize {
    pub outer_width: f64,
    /// Content height, without padding and border.
    pub height: f64,
    pub outer_height: f64,
}

/// Size of the page body the tooltip must stay within.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// A positioned tooltip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub left: f64,
    pub top: f64,
    pub contents: String,
}

/// Format a point's timestamp as `Nov 14, 2023 22:13:20.123 pm GMT+0000`.
///
/// Milliseconds are printed without zero padding.
pub fn format_timestamp<Tz: TimeZone>(timestamp_millis: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(utc) = DateTime::from_timestamp_millis(timestamp_millis) else {
        return timestamp_millis.to_string();
    };
    let local = utc.with_timezone(tz);
    let millis = local.nanosecond() / 1_000_000 % 1000;

    format!(
        "{}.{} {} {}",
        local.format("%b %e, %Y %H:%M:%S"),
        millis,
        local.format("%P"),
        local.format("GMT%z")
    )
}

/// Round to two decimals.
pub fn format_value(value: f64) -> String {
    format!("{:.2}", value)
}

/// Tooltip body: label, time and value on separate lines.
pub fn tooltip_contents<Tz: TimeZone>(label: &str, timestamp_millis: i64, value: f64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}<br>{}<br>{}",
        label,
        format_timestamp(timestamp_millis, tz),
        format_value(value)
    )
}

/// Place the tooltip near the cursor at page position `(x, y)`, kept inside the
/// body and moved above the cursor when it would cover it.
pub fn position(x: f64, y: f64, size: TooltipSize, body: Viewport) -> (f64, f64) {
    let mut left = x + CURSOR_OFFSET;
    let mut top = y + CURSOR_OFFSET;

    if left < 0.0 {
        left = 0.0;
    }
    if left + size.outer_width > body.width {
        left = body.width - size.outer_width;
    }
    if top + size.height > body.height {
        top = body.height - size.outer_height;
    }

    if (x > left && x < left + size.outer_width) || (y < top && y > top + size.outer_height) {
        top = y - CURSOR_OFFSET - size.outer_height;
    }

    (left, top)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    const SIZE: TooltipSize = TooltipSize {
        outer_width: 100.0,
        height: 40.0,
        outer_height: 50.0,
    };
    const BODY: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn test_format_timestamp_utc() {
        let text = format_timestamp(1_700_000_000_123, &Utc);
        assert_eq!(text, "Nov 14, 2023 22:13:20.123 pm GMT+0000");
        assert!(text.contains("123"));
    }

    #[test]
    fn test_format_timestamp_unpadded_millis_and_offset() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let text = format_timestamp(1_700_000_000_007, &tz);
        assert_eq!(text, "Nov 14, 2023 17:13:20.7 pm GMT-0500");
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_format_value() {
        assert_eq!(format_value(3.14159), "3.14");
        assert_eq!(format_value(2.0), "2.00");
        assert_eq!(format_value(-12.3456), "-12.35");
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_contents() {
        let text = tooltip_contents("cpu<br>(tag: host=a)", 1_700_000_000_123, 3.14159, &Utc);
        assert_eq!(
            text,
            "cpu<br>(tag: host=a)<br>Nov 14, 2023 22:13:20.123 pm GMT+0000<br>3.14"
        );
    }

    #[test]
    fn test_position_right_below_cursor() {
        assert_eq!(position(200.0, 100.0, SIZE, BODY), (205.0, 105.0));
    }

    #[test]
    fn test_position_clamped_left_edge() {
        // Cursor left of the body: the tooltip clamps to 0 and stays below it.
        assert_eq!(position(-20.0, 100.0, SIZE, BODY), (0.0, 105.0));
    }

    #[test]
    fn test_position_clamped_right_edge_moves_up() {
        // Right clamp: left = 700; cursor at 790 is inside [700, 800] so it moves up.
        assert_eq!(position(790.0, 100.0, SIZE, BODY), (700.0, 45.0));
    }

    #[test]
    fn test_position_clamped_bottom() {
        // 580 + 5 + 40 > 600, top = 600 - 50 = 550
        assert_eq!(position(200.0, 580.0, SIZE, BODY), (205.0, 550.0));
    }
}
