//! Tests for the whitespace points-file reader.

use std::io::Write;

use rstest::rstest;
use tempfile::NamedTempFile;

use enoki_providers_points::{PointsFileError, parse_points, read_points, read_points_path};

const VALID: &str = "4\n0 0.0 0.0\n1 1.0 0.0\n3 3.5 -2.0\n2 2.0 0.25\n";

#[test]
fn parses_a_valid_file() {
    let points = parse_points(VALID).expect("valid input must parse");

    assert_eq!(points.len(), 4);
    assert_eq!(points.get(0), (0.0, 0.0));
    assert_eq!(points.get(2), (2.0, 0.25));
    assert_eq!(points.get(3), (3.5, -2.0));
}

#[test]
fn records_may_appear_in_any_order() {
    let shuffled = "3 2 2.0 0.0 0 0.0 0.0 1 1.0 0.0";
    let points = parse_points(shuffled).expect("order must not matter");
    assert_eq!(points.get(1), (1.0, 0.0));
    assert_eq!(points.get(2), (2.0, 0.0));
}

#[test]
fn reads_from_a_reader_and_a_path() {
    let from_reader = read_points(VALID.as_bytes()).expect("reader input must parse");
    assert_eq!(from_reader.len(), 4);

    let mut file = NamedTempFile::new().expect("temp file must be created");
    file.write_all(VALID.as_bytes()).expect("write must succeed");
    let from_path = read_points_path(file.path()).expect("path input must parse");
    assert_eq!(from_path, from_reader);
}

#[test]
fn missing_file_surfaces_an_io_error() {
    let err = read_points_path("/nonexistent/enoki-points.txt")
        .expect_err("missing file must fail");
    assert!(matches!(err, PointsFileError::Io { .. }));
}

#[rstest]
#[case::empty("", "missing point count")]
#[case::bad_count("four\n", "invalid point count")]
#[case::zero_count("0\n", "point count must be at least 1")]
#[case::truncated("2\n0 0.0 0.0\n1 1.0\n", "record 1 is truncated")]
#[case::bad_index("1\nx 0.0 0.0\n", "invalid index")]
#[case::bad_coordinate("1\n0 0.0 north\n", "invalid coordinate")]
#[case::out_of_range("2\n0 0.0 0.0\n2 1.0 1.0\n", "index 2 is out of range")]
#[case::duplicate("2\n0 0.0 0.0\n0 1.0 1.0\n", "index 0 appears more than once")]
#[case::non_finite("1\n0 NaN 0.0\n", "not finite")]
#[case::trailing("1\n0 0.0 0.0\n7\n", "unexpected trailing token")]
fn malformed_input_fails_fast(#[case] input: &str, #[case] message_fragment: &str) {
    let err = parse_points(input).expect_err("malformed input must be rejected");
    let message = err.to_string();
    assert!(
        message.contains(message_fragment),
        "`{message}` does not contain `{message_fragment}`"
    );
}

#[test]
fn negative_index_is_an_index_error() {
    let err = parse_points("1\n-1 0.0 0.0\n").expect_err("negative index must fail");
    assert!(matches!(err, PointsFileError::InvalidIndex { record: 0, .. }));
}
