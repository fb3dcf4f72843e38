//! Canonical implementation statuses.
//!
//! The status set is closed: the tracker template defines exactly five
//! statuses, and their progression order drives count tables, pie slice
//! order, stacked-bar layering, and legends everywhere. Anything outside
//! this set coming back from Notion is treated as corrupt data and rejected
//! at the parse boundary.

use crate::errors::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Implementation status of one library for one tracked feature set.
///
/// Variant order is the canonical display/progression order; `Ord` on this
/// enum matches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    /// Work has not begun
    NotStarted,
    /// Implementation underway
    InProgress,
    /// Pull request open / awaiting review
    InReview,
    /// Merged, waiting on a release
    ReadyForRelease,
    /// Shipped in a released version
    Released,
}

/// All statuses in canonical order.
pub const ALL_STATUSES: [Status; 5] = [
    Status::NotStarted,
    Status::InProgress,
    Status::InReview,
    Status::ReadyForRelease,
    Status::Released,
];

/// An RGB color constant used by the chart theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Light or dark chart theme, matching Notion's two appearance modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// White background, dark text
    Light,
    /// Notion dark-mode background, light text
    Dark,
}

impl Status {
    /// Statuses in canonical order.
    #[must_use]
    pub const fn ordered() -> [Status; 5] {
        ALL_STATUSES
    }

    /// Statuses in reverse canonical order, used for stacked-bar layering
    /// (the reverse order puts Released at the base of each bar and
    /// Not Started on top).
    #[must_use]
    pub const fn ordered_reversed() -> [Status; 5] {
        [
            Status::Released,
            Status::ReadyForRelease,
            Status::InReview,
            Status::InProgress,
            Status::NotStarted,
        ]
    }

    /// Position of this status in canonical order (0..=4).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Status::NotStarted => 0,
            Status::InProgress => 1,
            Status::InReview => 2,
            Status::ReadyForRelease => 3,
            Status::Released => 4,
        }
    }

    /// The display name used by the Notion tracker template.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::NotStarted => "Not Started",
            Status::InProgress => "In Progress",
            Status::InReview => "In Review",
            Status::ReadyForRelease => "Ready For Release",
            Status::Released => "Released",
        }
    }

    /// Chart color for this status in the given mode.
    ///
    /// Total over the closed status set; the constants mirror the tracker
    /// template's own status colors.
    #[must_use]
    pub const fn color(self, mode: ColorMode) -> Rgb {
        match (self, mode) {
            (Status::NotStarted, ColorMode::Dark) => Rgb(0xBE, 0x52, 0x4B),
            (Status::NotStarted, ColorMode::Light) => Rgb(0xC4, 0x55, 0x4D),
            (Status::InProgress, ColorMode::Dark) => Rgb(0xCB, 0x7B, 0x37),
            (Status::InProgress, ColorMode::Light) => Rgb(0xCC, 0x78, 0x2F),
            (Status::InReview, ColorMode::Dark) => Rgb(0x44, 0x7A, 0xCB),
            (Status::InReview, ColorMode::Light) => Rgb(0x48, 0x7C, 0xA5),
            (Status::ReadyForRelease, ColorMode::Dark) => Rgb(0xC1, 0x91, 0x38),
            (Status::ReadyForRelease, ColorMode::Light) => Rgb(0xC2, 0x93, 0x43),
            (Status::Released, ColorMode::Dark) => Rgb(0x4F, 0x97, 0x68),
            (Status::Released, ColorMode::Light) => Rgb(0x54, 0x81, 0x64),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    /// Parses a Notion status option name into a canonical status.
    ///
    /// # Errors
    /// Returns [`Error::UnknownStatus`] for any name outside the canonical
    /// five; the caller must not swallow this, since dropping a record would
    /// silently corrupt every derived chart.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Not Started" => Ok(Status::NotStarted),
            "In Progress" => Ok(Status::InProgress),
            "In Review" => Ok(Status::InReview),
            "Ready For Release" => Ok(Status::ReadyForRelease),
            "Released" => Ok(Status::Released),
            other => Err(Error::UnknownStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// Chart background color for the given mode.
#[must_use]
pub const fn background_color(mode: ColorMode) -> Rgb {
    match mode {
        ColorMode::Dark => Rgb(0x19, 0x19, 0x19),
        ColorMode::Light => Rgb(0xFF, 0xFF, 0xFF),
    }
}

/// Chart foreground (text/axis) color for the given mode.
#[must_use]
pub const fn foreground_color(mode: ColorMode) -> Rgb {
    match mode {
        ColorMode::Dark => Rgb(0xD4, 0xD4, 0xD4),
        ColorMode::Light => Rgb(0x37, 0x35, 0x30),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_canonical_names() {
        for status in ALL_STATUSES {
            let parsed: Status = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_parse_unknown_name_fails() {
        let err = "Unknown".parse::<Status>().unwrap_err();
        assert!(matches!(err, Error::UnknownStatus { value } if value == "Unknown"));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        // Notion status names are exact; "released" is not a canonical name.
        assert!("released".parse::<Status>().is_err());
    }

    #[test]
    fn test_ordered_matches_enum_ordering() {
        let ordered = Status::ordered();
        for pair in ordered.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for (i, status) in ordered.iter().enumerate() {
            assert_eq!(status.index(), i);
        }
    }

    #[test]
    fn test_reversed_is_reverse_of_ordered() {
        let mut reversed = Status::ordered_reversed().to_vec();
        reversed.reverse();
        assert_eq!(reversed, Status::ordered().to_vec());
    }

    #[test]
    fn test_colors_differ_between_modes() {
        for status in ALL_STATUSES {
            assert_ne!(
                status.color(ColorMode::Dark),
                status.color(ColorMode::Light),
                "{status} must have distinct light/dark colors"
            );
        }
    }

    #[test]
    fn test_chrome_colors() {
        assert_eq!(background_color(ColorMode::Light), Rgb(0xFF, 0xFF, 0xFF));
        assert_eq!(background_color(ColorMode::Dark), Rgb(0x19, 0x19, 0x19));
        assert_ne!(
            foreground_color(ColorMode::Light),
            foreground_color(ColorMode::Dark)
        );
    }
}
