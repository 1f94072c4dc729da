//! Common test fixtures for vegrestore tests.
//!
//! Pre-built payloads shaped like the responses of the image-region
//! sampling and Feature Info services.

use serde_json::{json, Value};

/// Region sampling fixtures.
pub mod region {
    use super::*;

    /// Header row emitted by an image-region sampling call over two bands.
    pub const HEADER: [&str; 6] = ["id", "longitude", "latitude", "time", "B4", "B8"];

    /// 2019-01-01T00:00:00Z in epoch milliseconds.
    pub const JAN_1_2019_MS: i64 = 1_546_300_800_000;

    /// One day in milliseconds.
    pub const DAY_MS: i64 = 86_400_000;

    /// A sampled region with five data rows:
    /// - row 1 and 2 are complete
    /// - row 3 has a null `B8` (incomplete sampling)
    /// - row 4 has a non-numeric `B4`
    /// - row 5 carries its band values as numeric strings
    pub fn sample_array() -> Value {
        json!([
            HEADER,
            ["0_0", 146.1, -36.5, JAN_1_2019_MS, 512, 2048],
            ["0_1", 146.1, -36.5, JAN_1_2019_MS + DAY_MS, 600, 2400],
            ["0_2", 146.1, -36.5, JAN_1_2019_MS + 2 * DAY_MS, 480, null],
            ["0_3", 146.1, -36.5, JAN_1_2019_MS + 3 * DAY_MS, "abc", 2100],
            ["0_4", 146.1, -36.5, JAN_1_2019_MS + 4 * DAY_MS, "530.5", "1999"]
        ])
    }
}

/// Feature Info Service fixtures.
pub mod fis {
    use super::*;

    /// Dates covered by [`sentinel2_response`].
    pub const DATES: [&str; 3] = ["2019-06-03", "2019-06-08", "2019-06-13"];

    /// A single-polygon NDVI response with cloud (`C1`) and snow (`C2`)
    /// channels. The second date is cloudy, the others are clear.
    pub fn sentinel2_response() -> Value {
        json!({
            "C0": [
                {"date": DATES[0], "basicStats": {"min": 0.1, "max": 0.8, "mean": 0.5, "stDev": 0.1}},
                {"date": DATES[1], "basicStats": {"min": 0.0, "max": 0.6, "mean": 0.3, "stDev": 0.2}},
                {"date": DATES[2], "basicStats": {"min": 0.2, "max": 0.9, "mean": 0.6, "stDev": 0.05}}
            ],
            "C1": [
                {"date": DATES[0], "basicStats": {"mean": 0.0}},
                {"date": DATES[1], "basicStats": {"mean": 0.75}},
                {"date": DATES[2], "basicStats": {"mean": 0.0}}
            ],
            "C2": [
                {"date": DATES[0], "basicStats": {"mean": 0.0}},
                {"date": DATES[1], "basicStats": {"mean": 0.0}},
                {"date": DATES[2], "basicStats": {"mean": 0.0}}
            ]
        })
    }

    /// A response whose cloud channel has one entry fewer than `C0`.
    pub fn misaligned_response() -> Value {
        json!({
            "C0": [
                {"date": DATES[0], "basicStats": {"min": 0.1, "max": 0.8, "mean": 0.5, "stDev": 0.1}},
                {"date": DATES[1], "basicStats": {"min": 0.0, "max": 0.6, "mean": 0.3, "stDev": 0.2}}
            ],
            "C1": [
                {"basicStats": {"mean": 0.0}}
            ],
            "C2": [
                {"basicStats": {"mean": 0.0}},
                {"basicStats": {"mean": 0.0}}
            ]
        })
    }
}

/// Polygon fixtures in WGS84.
pub mod polygon {
    /// A field near Wangaratta, Victoria.
    pub const FIELD_A: [[f64; 2]; 5] = [
        [146.10, -36.50],
        [146.12, -36.50],
        [146.12, -36.48],
        [146.10, -36.48],
        [146.10, -36.50],
    ];

    /// A second field sharing no area with [`FIELD_A`].
    pub const FIELD_B: [[f64; 2]; 4] = [
        [146.20, -36.60],
        [146.25, -36.55],
        [146.18, -36.52],
        [146.20, -36.60],
    ];
}
