//! Payload generators for synthetic region and FIS data.
//!
//! These generators create predictable, verifiable payloads so a test can
//! compute its expected table by hand.

use serde_json::{json, Value};

use crate::fixtures::region::{DAY_MS, JAN_1_2019_MS};

/// Creates a region array with `rows` complete data rows.
///
/// The header is `longitude, latitude, time, <bands...>`. Row `i` is sampled
/// at `JAN_1_2019_MS + i * DAY_MS` and band `b` holds `b * 1000 + i`.
///
/// # Example
///
/// ```
/// use test_utils::create_region_array;
///
/// let arr = create_region_array(&["B4", "B8"], 3);
/// assert_eq!(arr.as_array().unwrap().len(), 4); // header + 3 rows
/// assert_eq!(arr[2][4], 1001.0);                 // band 1, row 1
/// ```
pub fn create_region_array(bands: &[&str], rows: usize) -> Value {
    let mut header = vec![json!("longitude"), json!("latitude"), json!("time")];
    header.extend(bands.iter().map(|b| json!(b)));

    let mut out = vec![Value::Array(header)];
    for i in 0..rows {
        let mut row = vec![
            json!(146.1),
            json!(-36.5),
            json!(JAN_1_2019_MS + i as i64 * DAY_MS),
        ];
        row.extend((0..bands.len()).map(|b| json!((b * 1000 + i) as f64)));
        out.push(Value::Array(row));
    }

    Value::Array(out)
}

/// Creates a FIS response with one `C0`, `C1` and `C2` entry per date.
///
/// The primary statistics for entry `i` are `min = i`, `max = i + 2`,
/// `mean = i + 1`, `stDev = 0.5`. Cloud and snow means are taken from
/// `clm` and `snw`, which must be as long as `dates`.
pub fn create_fis_response(dates: &[&str], clm: &[f64], snw: &[f64]) -> Value {
    let primary: Vec<Value> = dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let i = i as f64;
            json!({
                "date": date,
                "basicStats": {"min": i, "max": i + 2.0, "mean": i + 1.0, "stDev": 0.5}
            })
        })
        .collect();

    let mask = |means: &[f64]| -> Vec<Value> {
        dates
            .iter()
            .zip(means)
            .map(|(date, mean)| json!({"date": date, "basicStats": {"mean": mean}}))
            .collect()
    };

    json!({
        "C0": primary,
        "C1": mask(clm),
        "C2": mask(snw),
    })
}
