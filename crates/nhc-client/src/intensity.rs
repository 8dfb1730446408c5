// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Storm intensity and formation-probability classification.
//!
//! Intensity follows the Saffir-Simpson scale extended downward with
//! Tropical Depression and Tropical Storm. Classification picks the class
//! with the greatest wind threshold not exceeding the input; anything below
//! the lowest threshold is a Tropical Depression (the scale has no true
//! below-minimum case) and anything at or above 137 kt is Category 5.
//!
//! Advisory text gives wind speeds as free text ("... 65 knots ..."), so
//! extraction is isolated here with an explicit error instead of letting
//! malformed upstream text surface mid-render.

use thiserror::Error;

const MPH_TO_KNOTS: f64 = 0.868_976;

/// RGB display color.
pub type Rgb = (u8, u8, u8);

/// A storm intensity bucket with its display attributes.
#[derive(Debug, PartialEq, Eq)]
pub struct IntensityClass {
    /// Minimum sustained wind in knots for this class.
    pub min_knots: u32,
    pub category: &'static str,
    pub color: Rgb,
    /// Marker icon asset path.
    pub icon: &'static str,
}

/// Intensity classes in strictly increasing threshold order.
static INTENSITY_SCALE: [IntensityClass; 7] = [
    IntensityClass {
        min_knots: 33,
        category: "Tropical Depression",
        color: (0x12, 0x85, 0xc3),
        icon: "icons/td.png",
    },
    IntensityClass {
        min_knots: 34,
        category: "Tropical Storm",
        color: (0x0e, 0xaf, 0x26),
        icon: "icons/ts.png",
    },
    IntensityClass {
        min_knots: 64,
        category: "Category 1 Hurricane",
        color: (0xea, 0xe7, 0x32),
        icon: "icons/cat1.png",
    },
    IntensityClass {
        min_knots: 83,
        category: "Category 2 Hurricane",
        color: (0xe7, 0xba, 0x31),
        icon: "icons/cat2.png",
    },
    IntensityClass {
        min_knots: 96,
        category: "Category 3 Hurricane",
        color: (0xf2, 0xa5, 0x2b),
        icon: "icons/cat3.png",
    },
    IntensityClass {
        min_knots: 113,
        category: "Category 4 Hurricane",
        color: (0xeb, 0x4c, 0x0d),
        icon: "icons/cat4.png",
    },
    IntensityClass {
        min_knots: 137,
        category: "Category 5 Hurricane",
        color: (0xdb, 0x06, 0x06),
        icon: "icons/cat5.png",
    },
];

/// Classify a sustained wind speed in knots.
#[must_use]
pub fn classify_intensity(wind_knots: f64) -> &'static IntensityClass {
    INTENSITY_SCALE
        .iter()
        .rev()
        .find(|class| wind_knots >= f64::from(class.min_knots))
        .unwrap_or(&INTENSITY_SCALE[0])
}

/// Convert miles per hour to knots.
#[must_use]
pub fn mph_to_knots(mph: f64) -> f64 {
    mph * MPH_TO_KNOTS
}

/// Failure to extract a wind speed from advisory text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindParseError {
    #[error("no \"<number> knots\" phrase in {0:?}")]
    NotFound(String),
}

/// Extract the wind speed in knots from free-form advisory text.
///
/// Returns the first integer immediately preceding the token "knots", e.g.
/// `"Maximum winds 65 knots."` yields 65. The upstream format is exact
/// prose, so anything else is an error the caller handles at the boundary.
pub fn wind_speed_from_text(text: &str) -> Result<u32, WindParseError> {
    let mut previous: Option<&str> = None;
    for token in text.split_whitespace() {
        if token.trim_end_matches(['.', ',']) == "knots" {
            if let Some(speed) = previous.and_then(leading_digits) {
                return Ok(speed);
            }
        }
        previous = Some(token);
    }
    Err(WindParseError::NotFound(text.to_owned()))
}

/// The leading run of ASCII digits in a string, if any.
///
/// Advisory strings embed numbers in prose (`"100 mph"`); this mirrors the
/// upstream convention of stripping everything but the digits.
#[must_use]
pub fn leading_digits(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Formation probability bucket for outlook disturbances.
#[derive(Debug, PartialEq, Eq)]
pub struct ProbabilityClass {
    pub level: &'static str,
    /// Marker icon asset path.
    pub icon: &'static str,
}

static PROBABILITY_LOW: ProbabilityClass = ProbabilityClass {
    level: "low",
    icon: "icons/xl54.png",
};
static PROBABILITY_MEDIUM: ProbabilityClass = ProbabilityClass {
    level: "medium",
    icon: "icons/xm54.png",
};
static PROBABILITY_HIGH: ProbabilityClass = ProbabilityClass {
    level: "high",
    icon: "icons/xh54.png",
};

/// Classify an outlook `5day_category` code.
///
/// `"1"` is low and `"2"` is medium. Everything else, including a missing
/// category, is treated as high; upstream only ever emits the three codes,
/// so an unknown code means a high-probability disturbance format change
/// rather than a low one.
#[must_use]
pub fn classify_probability(code: Option<&str>) -> &'static ProbabilityClass {
    match code {
        Some("1") => &PROBABILITY_LOW,
        Some("2") => &PROBABILITY_MEDIUM,
        _ => &PROBABILITY_HIGH,
    }
}
