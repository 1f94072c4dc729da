//! Tests for FIS tabulation and cleaning.

use chrono::{TimeZone, Utc};
use sensing_tables::{
    clean_fis_table, ChannelAlignment, CleanOptions, FisError, FisResponse, FisRow, FisTable,
    StatValue, TabulateOptions,
};
use serde_json::json;
use test_utils::fixtures::fis::{misaligned_response, sentinel2_response};
use test_utils::{assert_approx_eq, create_fis_response};

fn response(value: serde_json::Value) -> FisResponse {
    FisResponse::from_json(value).unwrap()
}

fn strict() -> TabulateOptions {
    TabulateOptions::default()
}

fn positional() -> TabulateOptions {
    TabulateOptions {
        alignment: ChannelAlignment::Positional,
    }
}

// ============================================================================
// Tabulation tests
// ============================================================================

#[test]
fn test_tabulate_single_response() {
    let table = FisTable::from_response(&response(sentinel2_response()), &strict()).unwrap();

    assert_eq!(table.len(), 3);
    let cloudy = &table.rows()[1];
    assert_eq!(
        cloudy.date,
        Some(Utc.with_ymd_and_hms(2019, 6, 8, 0, 0, 0).unwrap())
    );
    assert_eq!(cloudy.mean, Some(StatValue::Number(0.3)));
    assert_eq!(cloudy.st_dev, Some(StatValue::Number(0.2)));
    assert_eq!(cloudy.clm_mean, Some(StatValue::Number(0.75)));
    assert_eq!(cloudy.snw_mean, Some(StatValue::Number(0.0)));
    assert_eq!(cloudy.id, None);
}

#[test]
fn test_all_responses_are_kept() {
    let a = response(sentinel2_response());
    let b = response(create_fis_response(&["2020-01-01"], &[0.0], &[0.0]));

    let table = FisTable::from_responses([&a, &b], &strict()).unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(
        table.rows()[3].date,
        Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap())
    );
}

#[test]
fn test_identified_rows_are_tagged() {
    let r = response(sentinel2_response());
    let table = FisTable::from_identified([("field-a", &r), ("field-b", &r)], &strict()).unwrap();

    assert_eq!(table.len(), 6);
    assert!(table.rows()[..3].iter().all(|row| row.id.as_deref() == Some("field-a")));
    assert!(table.rows()[3..].iter().all(|row| row.id.as_deref() == Some("field-b")));
}

#[test]
fn test_strict_rejects_length_mismatch() {
    let err = FisTable::from_response(&response(misaligned_response()), &strict()).unwrap_err();
    assert_eq!(
        err,
        FisError::ChannelLengthMismatch {
            channel: "C1".to_string(),
            expected: 2,
            found: 1,
        }
    );
}

#[test]
fn test_strict_rejects_date_mismatch() {
    let r = response(json!({
        "C0": [{"date": "2019-06-03", "basicStats": {"min": 0.1, "max": 0.8, "mean": 0.5, "stDev": 0.1}}],
        "C1": [{"date": "2019-06-03", "basicStats": {"mean": 0.0}}],
        "C2": [{"date": "2019-06-04", "basicStats": {"mean": 0.0}}]
    }));
    let err = FisTable::from_response(&r, &strict()).unwrap_err();
    assert!(matches!(
        err,
        FisError::ChannelDateMismatch { ref channel, row: 0, .. } if channel == "C2"
    ));
}

#[test]
fn test_positional_pads_short_channels() {
    let table = FisTable::from_response(&response(misaligned_response()), &positional()).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[0].clm_mean, Some(StatValue::Number(0.0)));
    assert_eq!(table.rows()[1].clm_mean, None);
}

#[test]
fn test_absent_mask_channels_leave_columns_missing() {
    let r = response(json!({
        "C0": [{"date": "2019-06-03", "basicStats": {"min": 0.1, "max": 0.8, "mean": 0.5, "stDev": 0.1}}]
    }));
    let table = FisTable::from_response(&r, &strict()).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].clm_mean, None);
    assert_eq!(table.rows()[0].snw_mean, None);

    let clean = clean_fis_table(&table.with_id("a"), &CleanOptions::default()).unwrap();
    assert!(clean.is_empty());
}

#[test]
fn test_invalid_date() {
    let r = response(json!({
        "C0": [{"date": "June third", "basicStats": {"mean": 0.5}}]
    }));
    let err = FisTable::from_response(&r, &strict()).unwrap_err();
    assert!(matches!(err, FisError::Common(_)));
}

#[test]
fn test_response_list_from_json() {
    let list = FisResponse::list_from_json(json!([sentinel2_response(), sentinel2_response()])).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].channel("C1").unwrap().len(), 3);
    assert!(list[0].channel("C7").is_none());

    let err = FisResponse::list_from_json(json!({"C0": 1})).unwrap_err();
    assert!(matches!(err, FisError::InvalidResponse(_)));
}

// ============================================================================
// Cleaning tests
// ============================================================================

#[test]
fn test_clean_drops_contaminated_rows() {
    let r = response(sentinel2_response());
    let table = FisTable::from_identified([("field-a", &r)], &strict()).unwrap();
    let clean = clean_fis_table(&table, &CleanOptions::default()).unwrap();

    assert_eq!(clean.len(), 2);
    assert!(clean
        .rows()
        .iter()
        .all(|row| row.clm_mean == 0.0 && row.snw_mean == 0.0));
    assert_eq!(
        clean.index(),
        vec![
            Utc.with_ymd_and_hms(2019, 6, 3, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2019, 6, 13, 0, 0, 0).unwrap(),
        ]
    );
}

#[test]
fn test_clean_drops_snow_rows() {
    let r = response(create_fis_response(
        &["2020-01-01", "2020-01-02", "2020-01-03"],
        &[0.0, 0.0, 0.0],
        &[0.0, 0.4, 0.0],
    ));
    let table = FisTable::from_response(&r, &strict()).unwrap().with_id("p");
    let clean = clean_fis_table(&table, &CleanOptions::default()).unwrap();

    assert_eq!(clean.len(), 2);
    assert_eq!(
        clean.index()[1],
        Utc.with_ymd_and_hms(2020, 1, 3, 0, 0, 0).unwrap()
    );
}

#[test]
fn test_clean_averages_duplicate_date_id_groups() {
    let r = response(create_fis_response(
        &["2020-01-01", "2020-01-01", "2020-01-02"],
        &[0.0, 0.0, 0.0],
        &[0.0, 0.0, 0.0],
    ));
    let table = FisTable::from_response(&r, &strict()).unwrap().with_id("p");
    let clean = clean_fis_table(&table, &CleanOptions::default()).unwrap();

    assert_eq!(clean.len(), 2);
    let first = &clean.rows()[0];
    assert_approx_eq!(first.min, 0.5, 1e-12);
    assert_approx_eq!(first.max, 2.5, 1e-12);
    assert_approx_eq!(first.mean, 1.5, 1e-12);
    assert_approx_eq!(first.st_dev, 0.5, 1e-12);
}

#[test]
fn test_clean_one_row_per_date_id_pair() {
    let r = response(sentinel2_response());
    let table = FisTable::from_identified(
        [("b", &r), ("a", &r), ("b", &r)],
        &strict(),
    )
    .unwrap();
    let clean = clean_fis_table(&table, &CleanOptions::default()).unwrap();

    assert_eq!(clean.len(), 4);
    let keys: Vec<(&str, chrono::DateTime<Utc>)> =
        clean.rows().iter().map(|r| (r.id.as_str(), r.date)).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(keys, sorted);
    assert_eq!(clean.ids(), vec!["a", "b"]);
}

#[test]
fn test_clean_is_strict_about_coercion() {
    let mut row = FisRow {
        date: Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
        min: Some(StatValue::from(0.0)),
        max: Some(StatValue::from(1.0)),
        mean: Some(StatValue::Text("0.5".to_string())),
        st_dev: Some(StatValue::from(0.1)),
        clm_mean: Some(StatValue::from(0.0)),
        snw_mean: Some(StatValue::from(0.0)),
        id: Some("p".to_string()),
    };
    let ok = clean_fis_table(&FisTable::new(vec![row.clone()]), &CleanOptions::default()).unwrap();
    assert_eq!(ok.rows()[0].mean, 0.5);

    row.snw_mean = Some(StatValue::Text("snow".to_string()));
    let err = clean_fis_table(&FisTable::new(vec![row]), &CleanOptions::default()).unwrap_err();
    assert_eq!(
        err,
        FisError::Coercion {
            column: "snw_mean".to_string(),
            value: "snow".to_string(),
        }
    );
}

#[test]
fn test_clean_drops_nan_strings() {
    let r = response(json!({
        "C0": [
            {"date": "2020-01-01", "basicStats": {"min": "NaN", "max": 1.0, "mean": 0.5, "stDev": 0.1}},
            {"date": "2020-01-02", "basicStats": {"min": 0.0, "max": 1.0, "mean": 0.5, "stDev": 0.1}}
        ],
        "C1": [{"basicStats": {"mean": 0.0}}, {"basicStats": {"mean": 0.0}}],
        "C2": [{"basicStats": {"mean": 0.0}}, {"basicStats": {"mean": 0.0}}]
    }));
    let table = FisTable::from_response(&r, &strict()).unwrap().with_id("p");
    let clean = clean_fis_table(&table, &CleanOptions::default()).unwrap();

    assert_eq!(clean.len(), 1);
    assert_eq!(
        clean.rows()[0].date,
        Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap()
    );
}

#[test]
fn test_clean_requires_id() {
    let r = response(sentinel2_response());
    let table = FisTable::from_response(&r, &strict()).unwrap();
    let err = clean_fis_table(&table, &CleanOptions::default()).unwrap_err();
    assert_eq!(err, FisError::MissingColumn("ID".to_string()));
}

#[test]
fn test_clean_empty_table() {
    let clean = clean_fis_table(&FisTable::default(), &CleanOptions::default()).unwrap();
    assert!(clean.is_empty());
}

#[test]
fn test_clean_table_serializes_with_service_column_names() {
    let r = response(sentinel2_response());
    let table = FisTable::from_identified([("field-a", &r)], &strict()).unwrap();
    let clean = clean_fis_table(&table, &CleanOptions::default()).unwrap();

    let json = serde_json::to_value(&clean).unwrap();
    assert_eq!(json[0]["ID"], json!("field-a"));
    assert_eq!(json[0]["stDev"], json!(0.1));
    assert_eq!(json[0]["date"], json!("2019-06-03T00:00:00Z"));
}
