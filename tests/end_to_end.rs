use std::io::Cursor;

use km_curves::app::pipeline::{plot_categorical, plot_continuous};
use km_curves::domain::{BinSpec, BinnedColumn};
use km_curves::estimate::KaplanMeier;
use km_curves::figure::Figure;
use km_curves::io::{read_dataset, write_survival_csv};
use km_curves::render::write_svg;
use km_curves::report::summarize;

const CSV: &str = "\
age,anaemia,ejection_fraction,sex,smoking,time,DEATH_EVENT
75,0,20,1,0,4,1
55,0,38,1,0,6,1
65,0,20,1,1,7,1
50,1,20,1,0,7,1
65,1,20,0,0,8,1
90,1,40,1,1,8,1
75,1,15,1,0,10,1
60,1,60,1,0,10,1
65,0,65,0,0,10,1
80,1,35,1,1,10,1
62,0,25,0,0,140,0
45,1,30,1,1,180,0
49,0,45,0,0,200,0
53,1,60,0,0,215,0
70,0,35,0,0,250,0
not-a-row
";

#[test]
fn csv_to_svg_and_export() {
    let loaded = read_dataset(Cursor::new(CSV)).unwrap();
    assert_eq!(loaded.rows_used, 15);
    assert_eq!(loaded.row_errors.len(), 1);
    let data = loaded.dataset;
    let before = data.clone();
    let km = KaplanMeier::new();

    let mut categorical = Figure::categorical();
    let columns: Vec<String> = ["anaemia", "sex", "smoking"].iter().map(|s| s.to_string()).collect();
    plot_categorical(&data, &columns, &km, &mut categorical).unwrap();
    assert_eq!(categorical.visible_panels().count(), 3);

    let mut continuous = Figure::continuous();
    let binned = vec![
        BinnedColumn::new("age", BinSpec::Edges(vec![30.0, 60.0, 80.0, 100.0])),
        BinnedColumn::new("ejection_fraction", BinSpec::Edges(vec![0.0, 30.0, 45.0, 100.0])),
    ];
    plot_continuous(&data, &binned, &km, &mut continuous).unwrap();
    assert_eq!(continuous.visible_panels().count(), 2);
    assert_eq!(data, before);

    let age_labels: Vec<&str> = continuous
        .panel(0)
        .unwrap()
        .curves
        .iter()
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(age_labels, vec!["30.0 - 60.0)", "60.0 - 80.0)", "80.0 - 100.0)"]);

    let rows = summarize(&categorical);
    let sex: Vec<_> = rows.iter().filter(|r| r.feature == "sex").collect();
    assert_eq!(sex.len(), 2);
    assert_eq!(sex[0].n + sex[1].n, 15);

    let dir = tempfile::tempdir().unwrap();
    for fig in [&categorical, &continuous] {
        let path = dir.path().join(format!("km_{}.svg", fig.kind));
        write_svg(fig, &path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains(&fig.title));
    }

    let export = dir.path().join("survival.csv");
    write_survival_csv(&export, &[categorical, continuous]).unwrap();
    let text = std::fs::read_to_string(&export).unwrap();
    assert!(text.lines().any(|l| l.starts_with("continuous,ejection_fraction,")));
}

#[test]
fn too_many_columns_is_rejected_up_front() {
    let data = read_dataset(Cursor::new(CSV)).unwrap().dataset;
    let mut figure = Figure::categorical();
    let columns: Vec<String> = std::iter::repeat("sex".to_string()).take(7).collect();

    let err = plot_categorical(&data, &columns, &KaplanMeier::new(), &mut figure).unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert_eq!(figure, Figure::categorical());
}
