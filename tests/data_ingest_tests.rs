use indexmap::IndexMap;
use plotline::config::{DataConfig, DataKeys, XAxisKind};
use plotline::data::ingest;
use plotline::error::ChartError;
use serde_json::json;

fn columns_config(columns: Vec<Vec<serde_json::Value>>) -> DataConfig {
    DataConfig {
        columns: Some(columns),
        ..DataConfig::default()
    }
}

#[test]
fn columns_become_targets_with_dense_indices() {
    let data = columns_config(vec![
        vec![json!("data1"), json!(30), json!(200), json!(100)],
        vec![json!("data2"), json!(50), json!(20), json!(10)],
    ]);

    let output = ingest(&data, XAxisKind::Indexed).expect("ingest");
    assert_eq!(output.targets.len(), 2);

    let first = &output.targets[0];
    assert_eq!(first.id, "data1");
    assert_eq!(first.values.len(), 3);
    for (index, value) in first.values.iter().enumerate() {
        assert_eq!(value.index, index);
        assert_eq!(value.x, index as f64);
    }
    assert_eq!(first.values[1].value, Some(200.0));
}

#[test]
fn columns_of_unequal_length_are_independent_series() {
    let data = columns_config(vec![
        vec![json!("data1"), json!(1), json!(2)],
        vec![json!("data2"), json!(3)],
    ]);

    let output = ingest(&data, XAxisKind::Indexed).expect("ragged columns ingest");
    assert_eq!(output.targets[0].values.len(), 2);
    assert_eq!(output.targets[1].values.len(), 1);
    assert_eq!(output.targets[1].values[0].value, Some(3.0));
}

#[test]
fn column_without_string_key_is_rejected() {
    let data = columns_config(vec![vec![json!(5), json!(1)]]);
    assert!(matches!(
        ingest(&data, XAxisKind::Indexed),
        Err(ChartError::DataIntegrity { unit: "column", index: 0, .. })
    ));
}

#[test]
fn rows_with_missing_key_report_row_index() {
    let complete: IndexMap<String, serde_json::Value> =
        IndexMap::from([("a".to_owned(), json!(1)), ("b".to_owned(), json!(2))]);
    let incomplete: IndexMap<String, serde_json::Value> =
        IndexMap::from([("a".to_owned(), json!(3))]);
    let data = DataConfig {
        rows: Some(vec![complete, incomplete]),
        ..DataConfig::default()
    };

    let error = ingest(&data, XAxisKind::Indexed).expect_err("missing cell");
    match error {
        ChartError::DataIntegrity { unit, index, .. } => {
            assert_eq!(unit, "row");
            assert_eq!(index, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn shared_x_column_is_not_a_target() {
    let data = DataConfig {
        columns: Some(vec![
            vec![json!("x"), json!(10), json!(20), json!(30)],
            vec![json!("data1"), json!(1), json!(2), json!(3)],
        ]),
        x: Some("x".to_owned()),
        ..DataConfig::default()
    };

    let output = ingest(&data, XAxisKind::Indexed).expect("ingest");
    assert_eq!(output.targets.len(), 1);
    let xs: Vec<f64> = output.targets[0].values.iter().map(|v| v.x).collect();
    assert_eq!(xs, vec![10.0, 20.0, 30.0]);
}

#[test]
fn x_sort_reorders_values_and_reindexes() {
    let data = DataConfig {
        columns: Some(vec![
            vec![json!("x"), json!(30), json!(10), json!(20)],
            vec![json!("data1"), json!(3), json!(1), json!(2)],
        ]),
        x: Some("x".to_owned()),
        ..DataConfig::default()
    };

    let output = ingest(&data, XAxisKind::Indexed).expect("ingest");
    let values = &output.targets[0].values;
    let xs: Vec<f64> = values.iter().map(|v| v.x).collect();
    assert_eq!(xs, vec![10.0, 20.0, 30.0]);
    let indices: Vec<usize> = values.iter().map(|v| v.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(values[0].value, Some(1.0));
}

#[test]
fn timeseries_dates_parse_to_unix_seconds() {
    let data = DataConfig {
        columns: Some(vec![
            vec![json!("x"), json!("1970-01-02"), json!("1970-01-03")],
            vec![json!("data1"), json!(1), json!(2)],
        ]),
        x: Some("x".to_owned()),
        ..DataConfig::default()
    };

    let output = ingest(&data, XAxisKind::Timeseries).expect("ingest");
    let xs: Vec<f64> = output.targets[0].values.iter().map(|v| v.x).collect();
    assert_eq!(xs, vec![86_400.0, 172_800.0]);
}

#[test]
fn unparsable_date_loses_position_but_keeps_slot() {
    let data = DataConfig {
        columns: Some(vec![
            vec![json!("x"), json!("1970-01-02"), json!("not a date")],
            vec![json!("data1"), json!(1), json!(2)],
        ]),
        x: Some("x".to_owned()),
        x_sort: false,
        ..DataConfig::default()
    };

    let output = ingest(&data, XAxisKind::Timeseries).expect("ingest");
    let values = &output.targets[0].values;
    assert_eq!(values.len(), 2);
    assert!(values[0].has_position());
    assert!(!values[1].has_position());
    assert_eq!(values[1].value, Some(2.0));
}

#[test]
fn category_labels_come_from_the_x_column() {
    let data = DataConfig {
        columns: Some(vec![
            vec![json!("x"), json!("alpha"), json!("beta")],
            vec![json!("data1"), json!(1), json!(2)],
        ]),
        x: Some("x".to_owned()),
        ..DataConfig::default()
    };

    let output = ingest(&data, XAxisKind::Category).expect("ingest");
    assert_eq!(output.categories, vec!["alpha", "beta"]);
    let xs: Vec<f64> = output.targets[0].values.iter().map(|v| v.x).collect();
    assert_eq!(xs, vec![0.0, 1.0]);
}

#[test]
fn null_and_non_numeric_cells_become_gaps() {
    let data = columns_config(vec![vec![
        json!("data1"),
        json!(1),
        json!(null),
        json!("oops"),
        json!("4.5"),
    ]]);

    let output = ingest(&data, XAxisKind::Indexed).expect("ingest");
    let values: Vec<Option<f64>> = output.targets[0].values.iter().map(|v| v.value).collect();
    assert_eq!(values, vec![Some(1.0), None, None, Some(4.5)]);
}

#[test]
fn csv_source_parses_headers_and_rows() {
    let data = DataConfig {
        csv: Some("data1,data2\n1,10\n2,20\n".to_owned()),
        ..DataConfig::default()
    };

    let output = ingest(&data, XAxisKind::Indexed).expect("ingest");
    assert_eq!(output.targets.len(), 2);
    assert_eq!(output.targets[1].values[1].value, Some(20.0));
}

#[test]
fn keyed_json_selects_fields_through_keys() {
    let data = DataConfig {
        json: Some(json!([
            {"date": 10, "upload": 200, "download": 100, "noise": 1},
            {"date": 20, "upload": 100, "download": 300, "noise": 2}
        ])),
        keys: Some(DataKeys {
            x: Some("date".to_owned()),
            value: vec!["upload".to_owned(), "download".to_owned()],
        }),
        x: Some("date".to_owned()),
        ..DataConfig::default()
    };

    let output = ingest(&data, XAxisKind::Indexed).expect("ingest");
    let ids: Vec<&str> = output.targets.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["upload", "download"]);
    assert_eq!(output.targets[0].values[0].x, 10.0);
}

#[test]
fn per_target_xs_pull_distinct_columns() {
    let data = DataConfig {
        columns: Some(vec![
            vec![json!("x1"), json!(1), json!(2)],
            vec![json!("x2"), json!(10), json!(20)],
            vec![json!("data1"), json!(5), json!(6)],
            vec![json!("data2"), json!(7), json!(8)],
        ]),
        xs: IndexMap::from([
            ("data1".to_owned(), "x1".to_owned()),
            ("data2".to_owned(), "x2".to_owned()),
        ]),
        ..DataConfig::default()
    };

    let output = ingest(&data, XAxisKind::Indexed).expect("ingest");
    assert_eq!(output.targets[0].values[1].x, 2.0);
    assert_eq!(output.targets[1].values[1].x, 20.0);
}
