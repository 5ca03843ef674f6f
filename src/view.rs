//! Live Stats panel
//!
//! Turns a snapshot into the four display rows and renders them as text.

use crate::{
    format::{format_change_percent, format_large_number, format_price},
    types::{ChangeDirection, TokenSnapshot},
};
use std::fmt;

const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_RED: &str = "\x1b[31m";
const ANSI_RESET: &str = "\x1b[0m";

/// Display strings for one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveStats {
    pub price: String,
    pub market_cap: String,
    pub volume_24h: String,
    pub change_24h: String,
    pub direction: ChangeDirection,
}

impl LiveStats {
    pub fn from_snapshot(snapshot: &TokenSnapshot) -> Self {
        Self {
            price: format_price(snapshot.price),
            market_cap: format_large_number(snapshot.market_cap),
            volume_24h: format_large_number(snapshot.volume_24h),
            change_24h: format_change_percent(snapshot.price_change_24h),
            direction: snapshot.change_direction(),
        }
    }

    /// Label/value rows in display order
    pub fn rows(&self) -> [(&'static str, &str); 4] {
        [
            ("Price", self.price.as_str()),
            ("Market Cap", self.market_cap.as_str()),
            ("24h Volume", self.volume_24h.as_str()),
            ("24h Change", self.change_24h.as_str()),
        ]
    }

    /// Renders the panel with the change colored green (up) or red (down)
    pub fn render_colored(&self) -> String {
        let color = match self.direction {
            ChangeDirection::Up => ANSI_GREEN,
            ChangeDirection::Down => ANSI_RED,
        };
        let mut out = String::new();
        for (label, value) in self.rows() {
            if label == "24h Change" {
                out.push_str(&format!("{:<12}{}{}{}\n", label, color, value, ANSI_RESET));
            } else {
                out.push_str(&format!("{:<12}{}\n", label, value));
            }
        }
        out
    }
}

impl fmt::Display for LiveStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.rows() {
            writeln!(f, "{:<12}{}", label, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_snapshot() {
        let stats = LiveStats::from_snapshot(&TokenSnapshot::new(0.000321, 2_300.0, 1_500_000_000.0, -3.2));
        assert_eq!(stats.price, "$0.00032100");
        assert_eq!(stats.market_cap, "$2.30K");
        assert_eq!(stats.volume_24h, "$1.50B");
        assert_eq!(stats.change_24h, "-3.20%");
        assert_eq!(stats.direction, ChangeDirection::Down);
    }

    #[test]
    fn test_plain_rendering() {
        let stats = LiveStats::from_snapshot(&TokenSnapshot::new(1.0, 999.0, 0.0, 0.0));
        let rendered = stats.to_string();
        assert_eq!(
            rendered,
            "Price       $1.00\nMarket Cap  $999.00\n24h Volume  $0.00\n24h Change  0.00%\n"
        );
    }

    #[test]
    fn test_colored_rendering() {
        let up = LiveStats::from_snapshot(&TokenSnapshot::new(1.0, 1.0, 1.0, 2.0)).render_colored();
        assert!(up.contains("\x1b[32m2.00%\x1b[0m"));

        let down = LiveStats::from_snapshot(&TokenSnapshot::new(1.0, 1.0, 1.0, -2.0)).render_colored();
        assert!(down.contains("\x1b[31m-2.00%\x1b[0m"));
    }
}
