use colored::{ColoredString, Colorize};

use crate::constants::{GREEN_LIMIT_KIB, YELLOW_LIMIT_KIB};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

pub fn format_bytes(bytes: u64) -> String {
    match bytes {
        0 => "0 B".to_string(),
        b if b < KIB => format!("{} B", b),
        b if b < MIB => format!("{:.1} KB", b as f64 / KIB as f64),
        b => format!("{:.2} MB", b as f64 / MIB as f64),
    }
}

/// `<n>ms` under a second, `<x.xx>s` above.
pub fn format_duration(ms: u64) -> String {
    if ms < 1000 { format!("{}ms", ms) } else { format!("{:.2}s", ms as f64 / 1000.0) }
}

/// Color band of a package by its gzipped size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeBand {
    Green,
    Yellow,
    Red,
}

impl SizeBand {
    pub fn for_gzipped(bytes: u64) -> Self {
        if bytes < GREEN_LIMIT_KIB * KIB {
            SizeBand::Green
        } else if bytes < YELLOW_LIMIT_KIB * KIB {
            SizeBand::Yellow
        } else {
            SizeBand::Red
        }
    }

    pub fn paint(self, text: &str) -> ColoredString {
        match self {
            SizeBand::Green => text.green(),
            SizeBand::Yellow => text.yellow(),
            SizeBand::Red => text.red(),
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            SizeBand::Green => "green",
            SizeBand::Yellow => "yellow",
            SizeBand::Red => "red",
        }
    }
}
