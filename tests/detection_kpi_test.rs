use photo_kpi_etl::core::detection_parser::{normalize_score, parse, parse_with_extension};
use photo_kpi_etl::core::kpi::aggregate;
use photo_kpi_etl::core::report::assemble;
use photo_kpi_etl::domain::model::ScoreRange;
use photo_kpi_etl::{Detection, DetectionFormat};

#[test]
fn test_scores_always_in_unit_range() {
    let raw_scores = [
        -1000.0, -1.0, -0.0001, 0.0, 0.2, 0.5, 1.0, 1.0001, 42.0, 100.0, 100.0001, 1e9,
        f64::INFINITY, f64::NEG_INFINITY,
    ];
    for raw in raw_scores {
        let detection = Detection::new("x", normalize_score(raw));
        assert!(
            (0.0..=1.0).contains(&detection.score()),
            "raw score {} escaped the unit range",
            raw
        );
    }
}

#[test]
fn test_malformed_json_is_empty_not_error() {
    assert!(parse("not json", DetectionFormat::Json).is_empty());
}

#[test]
fn test_json_and_xml_agree() {
    let json = r#"[
        {"class_name": "meter", "score": 12},
        {"class_name": "pole", "score": 0.66}
    ]"#;
    let xml = r#"<results>
        <detection><class_name>meter</class_name><score>12</score></detection>
        <detection><class_name>pole</class_name><score>0.66</score></detection>
    </results>"#;

    assert_eq!(parse(json, DetectionFormat::Json), parse(xml, DetectionFormat::Xml));
}

#[test]
fn test_unknown_extension_yields_nothing() {
    assert!(parse_with_extension("class_name,score\nmeter,0.5", "csv").is_empty());
    assert_eq!(
        parse_with_extension(r#"[{"class_name": "a", "score": 1}]"#, "JSON").len(),
        1
    );
}

#[test]
fn test_single_bucket_aggregation() {
    let detections: Vec<Detection> = (0..25)
        .map(|i| Detection::new("insulator", 0.50 + i as f64 * 0.01))
        .collect();

    let groups = aggregate(&detections);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].total(), detections.len());

    let non_zero: Vec<_> = groups[0].score_ranges().filter(|(_, c)| *c > 0).collect();
    assert_eq!(non_zero, vec![("50-79%", 25)]);
}

#[test]
fn test_buckets_partition_unit_interval() {
    let classes = ["meter", "pole", "wire", "transformer"];
    let detections: Vec<Detection> = (0..10_000)
        .map(|i| Detection::new(classes[i % classes.len()], i as f64 / 9_999.0))
        .collect();

    let groups = aggregate(&detections);
    let total: usize = groups
        .iter()
        .flat_map(|g| ScoreRange::ALL.map(|r| g.count(r)))
        .sum();
    assert_eq!(total, 10_000);

    for group in &groups {
        let labels: Vec<_> = group.score_ranges().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["0-20%", "20-49%", "50-79%", "80-100%"]);
    }
}

#[test]
fn test_meter_pole_report() {
    let detections = vec![
        Detection::new("meter", 0.05),
        Detection::new("meter", 0.95),
        Detection::new("pole", 0.95),
    ];

    let report = assemble(aggregate(&detections), "field run 3");
    let summary: Vec<_> = report
        .groups
        .iter()
        .map(|g| (g.class_name(), g.total()))
        .collect();
    assert_eq!(summary, vec![("meter", 2), ("pole", 1)]);

    let meter = &report.groups[0];
    assert_eq!(meter.count(ScoreRange::VeryLow), 1);
    assert_eq!(meter.count(ScoreRange::High), 1);
    assert_eq!(meter.fraction(ScoreRange::High), 0.5);
}

#[test]
fn test_report_sorted_descending() {
    let mut detections = Vec::new();
    for (class, count) in [("a", 1), ("b", 5), ("c", 3), ("d", 5)] {
        for _ in 0..count {
            detections.push(Detection::new(class, 0.3));
        }
    }

    let report = assemble(aggregate(&detections), "sorted");
    let totals: Vec<_> = report.groups.iter().map(|g| g.total()).collect();
    assert_eq!(totals, vec![5, 5, 3, 1]);
}
