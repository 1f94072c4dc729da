//! Tests for BoundingBox and CrsBoundingBox operations.

use sensing_common::{BoundingBox, CrsBoundingBox, CrsCode};
use test_utils::assert_bounds_approx_eq;

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_bbox_new() {
    let bbox = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
    assert_eq!(bbox.min_x, -180.0);
    assert_eq!(bbox.min_y, -90.0);
    assert_eq!(bbox.max_x, 180.0);
    assert_eq!(bbox.max_y, 90.0);
}

#[test]
fn test_bbox_from_tuple() {
    let bbox: BoundingBox = (1.0, 2.0, 3.0, 4.0).into();
    assert_eq!(bbox.as_tuple(), (1.0, 2.0, 3.0, 4.0));
}

// ============================================================================
// Union tests
// ============================================================================

#[test]
fn test_union_is_symmetric() {
    let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let b = BoundingBox::new(-5.0, 2.0, 4.0, 20.0);
    assert_eq!(a.union(&b), b.union(&a));
}

#[test]
fn test_union_of_adjacent_fields() {
    let a = BoundingBox::new(146.10, -36.60, 146.18, -36.52);
    let b = BoundingBox::new(146.17, -36.55, 146.25, -36.48);
    assert_bounds_approx_eq!(a.union(&b).as_tuple(), (146.10, -36.60, 146.25, -36.48), 1e-9);
}

#[test]
fn test_union_with_contained_box() {
    let outer = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
    let inner = BoundingBox::new(25.0, 25.0, 75.0, 75.0);
    assert_eq!(outer.union(&inner), outer);
}

// ============================================================================
// Rounding tests
// ============================================================================

#[test]
fn test_rounding_to_four_decimals() {
    let bbox = BoundingBox::new(10.00005, 20.00005, 30.00005, 40.00005).rounded(4);
    assert_eq!(bbox.as_tuple(), (10.0001, 20.0001, 30.0001, 40.0001));
}

#[test]
fn test_rounding_truncates_below_half() {
    let bbox = BoundingBox::new(1.23444, 5.67891, 9.99994, 0.00001).rounded(4);
    assert_eq!(bbox.as_tuple(), (1.2344, 5.6789, 9.9999, 0.0));
}

#[test]
fn test_rounding_scales_before_breaking_ties() {
    // 1.00005 is stored just below the tie but scales to just above 10000.5
    let bbox = BoundingBox::new(1.00005, -1.00005, 0.0, 0.0).rounded(4);
    assert_eq!(bbox.min_x, 1.0001);
    assert_eq!(bbox.min_y, -1.0001);
}

#[test]
fn test_rounding_zero_decimals() {
    let bbox = BoundingBox::new(1.5, -1.5, 2.4, 2.6).rounded(0);
    assert_eq!(bbox.as_tuple(), (2.0, -2.0, 2.0, 3.0));
}

// ============================================================================
// Tagged box tests
// ============================================================================

#[test]
fn test_crs_bbox_serializes_with_code() {
    let tagged = CrsBoundingBox::wgs84(BoundingBox::new(1.0, 2.0, 3.0, 4.0));
    let json = serde_json::to_value(tagged).unwrap();
    assert_eq!(json["crs"], "Epsg4326");
    assert_eq!(json["bbox"]["max_y"], 4.0);
}

#[test]
fn test_crs_bbox_explicit_crs() {
    let tagged = CrsBoundingBox::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), CrsCode::Epsg3857);
    assert_eq!(tagged.crs.to_string(), "EPSG:3857");
}
