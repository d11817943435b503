use std::path::PathBuf;

use confounds::{
    load_confounds, load_table, try_load_each, ConfoundSpec, ConfoundsError, LoadOptions,
    Reduction,
};

/// Write a tab-separated confounds fixture and return its path.
fn write_tsv(dir: &std::path::Path, name: &str, header: &[&str], rows: &[Vec<&str>]) -> PathBuf {
    let mut text = header.join("\t");
    text.push('\n');
    for row in rows {
        text.push_str(&row.join("\t"));
        text.push('\n');
    }
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

/// A small but realistic run: correlated motion, tissue and filter columns.
fn fixture(dir: &std::path::Path, name: &str, offset: f64) -> PathBuf {
    let header = [
        "trans_x",
        "trans_y",
        "rot_z",
        "csf",
        "white_matter",
        "cosine00",
        "t_comp_cor_00",
    ];
    let rows: Vec<Vec<String>> = (0..12)
        .map(|i| {
            let t = i as f64 * 0.1 + offset;
            vec![
                format!("{t:.4}"),
                format!("{:.4}", t * 2.0),
                format!("{:.4}", -t),
                format!("{:.4}", 600.0 + t),
                format!("{:.4}", 700.0 - t),
                format!("{:.4}", (t * 3.0).cos()),
                format!("{:.4}", t * t),
            ]
        })
        .collect();
    let row_refs: Vec<Vec<&str>> = rows
        .iter()
        .map(|r| r.iter().map(String::as_str).collect())
        .collect();
    write_tsv(dir, name, &header, &row_refs)
}

fn no_reduction() -> LoadOptions {
    LoadOptions {
        reduction: Reduction::None,
        ..LoadOptions::default()
    }
}

#[test]
fn minimal_strategy_end_to_end_with_pca() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "run1.tsv", 0.0);

    let out = load_confounds(path.as_path(), &LoadOptions::default())
        .unwrap()
        .single()
        .unwrap();

    // Non-motion first, lexicographic, then the PCA block. The three motion
    // columns are exact linear combinations of one another, so 95% variance
    // needs a single component.
    assert_eq!(
        out.names(),
        ["cosine00", "csf", "white_matter", "motion_pca_1"]
    );
    assert_eq!(out.n_rows(), 12);
}

#[test]
fn no_reduction_round_trips_motion_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "run1.tsv", 0.5);

    let raw = load_table(&path).unwrap();
    let out = load_confounds(path.as_path(), &no_reduction())
        .unwrap()
        .single()
        .unwrap();

    for motion in ["rot_z", "trans_x", "trans_y"] {
        assert_eq!(out.column(motion).unwrap(), raw.column(motion).unwrap());
    }
    assert_eq!(out.n_rows(), raw.n_rows());
}

#[test]
fn batch_preserves_length_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        fixture(dir.path(), "run1.tsv", 0.0),
        fixture(dir.path(), "run2.tsv", 10.0),
        fixture(dir.path(), "run3.tsv", 20.0),
    ];

    let out = load_confounds(paths, &no_reduction())
        .unwrap()
        .batch()
        .unwrap();

    assert_eq!(out.len(), 3);
    // The csf column carries each run's offset, so order is observable.
    assert_eq!(out[0].column("csf").unwrap()[0], 600.0);
    assert_eq!(out[1].column("csf").unwrap()[0], 610.0);
    assert_eq!(out[2].column("csf").unwrap()[0], 620.0);
}

#[test]
fn batch_fails_fast_on_one_bad_element() {
    let dir = tempfile::tempdir().unwrap();
    let good = fixture(dir.path(), "run1.tsv", 0.0);
    let missing = dir.path().join("run2.tsv");

    let err = load_confounds(vec![good, missing], &no_reduction()).unwrap_err();
    assert!(matches!(err, ConfoundsError::Io { .. }));
}

#[test]
fn try_load_each_collects_per_element_results() {
    let dir = tempfile::tempdir().unwrap();
    let good = fixture(dir.path(), "run1.tsv", 0.0);
    let corrupt = write_tsv(
        dir.path(),
        "run2.tsv",
        &["trans_x", "csf"],
        &[vec!["0.1", "600.0"], vec!["oops", "601.0"]],
    );
    let also_good = fixture(dir.path(), "run3.tsv", 1.0);

    let results = try_load_each(&[good, corrupt, also_good], &no_reduction());

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(ConfoundsError::Parse { .. })));
    assert!(results[2].is_ok());
}

#[test]
fn image_path_is_normalized_before_loading() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path(), "sub-01_task-rest_desc-confounds_regressors.tsv", 0.0);
    let image = dir
        .path()
        .join("sub-01_task-rest_space-MNI152NLin2009cAsym_desc-preproc_bold.nii.gz");

    let out = load_confounds(image.as_path(), &no_reduction())
        .unwrap()
        .single()
        .unwrap();
    assert!(out.column("csf").is_some());
}

#[test]
fn literal_requests_combine_with_strategies() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "run1.tsv", 0.0);

    let options = LoadOptions {
        strategies: vec![
            ConfoundSpec::from("high_pass_filter"),
            ConfoundSpec::from("t_comp_cor_00"),
        ],
        reduction: Reduction::None,
        ..LoadOptions::default()
    };
    let out = load_confounds(path.as_path(), &options)
        .unwrap()
        .single()
        .unwrap();

    // No motion requested at all, so no motion block appears.
    assert_eq!(out.names(), ["cosine00", "t_comp_cor_00"]);
}

#[test]
fn missing_literal_column_is_reported_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "run1.tsv", 0.0);

    let options = LoadOptions {
        strategies: vec![ConfoundSpec::from("global_signal")],
        ..LoadOptions::default()
    };
    let err = load_confounds(path.as_path(), &options).unwrap_err();
    match err {
        ConfoundsError::MissingColumn { name } => assert_eq!(name, "global_signal"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn options_document_drives_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "run1.tsv", 0.0);

    let options = LoadOptions::from_json(
        r#"{"strategies": ["motion"], "n_components": 1, "motion_model": "6params"}"#,
    )
    .unwrap();
    let out = load_confounds(path.as_path(), &options)
        .unwrap()
        .single()
        .unwrap();
    assert_eq!(out.names(), ["motion_pca_1"]);
}
