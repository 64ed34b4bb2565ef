//! Integration tests for page layout reconstruction.

use ocrtab::layout::{assemble_lines, bin, format_line, map_positions, AxisRange, LineFormatter};
use ocrtab::{layout_page, Detection, Error, Fragment, LayoutEngine, LayoutOptions, Line};

fn receipt() -> Vec<Detection> {
    vec![
        Detection::new("ACME STORE", 40.0, 0.0),
        Detection::new("Item", 0.0, 20.0),
        Detection::new("Qty", 60.0, 20.0),
        Detection::new("Price", 100.0, 20.0),
        Detection::new("Coffee", 0.0, 40.0),
        Detection::new("2", 60.0, 40.0),
        Detection::new("5.00", 100.0, 40.0),
    ]
}

fn tabs_between(text: &str, left: &str, right: &str) -> usize {
    let start = text.find(left).expect("left fragment") + left.len();
    let end = text.find(right).expect("right fragment");
    text[start..end].chars().filter(|c| *c == '\t').count()
}

#[test]
fn test_bin_within_bounds() {
    let range = AxisRange::new(-3.5, 812.25);
    for n in [1usize, 2, 7, 35] {
        let mut previous = 0;
        for step in 0..=200 {
            let value = range.min + range.span() * step as f64 / 200.0;
            let class = bin(value, &range, n).unwrap();
            assert!(class < n, "class {} out of [0, {})", class, n);
            assert!(class >= previous, "not monotonic at {}", value);
            previous = class;
        }
    }
}

#[test]
fn test_bin_degenerate_range() {
    let range = AxisRange::new(42.0, 42.0);
    for value in [0.0, 42.0, 1e9] {
        assert_eq!(bin(value, &range, 20).unwrap(), 0);
    }
}

#[test]
fn test_bin_zero_classes() {
    let range = AxisRange::new(0.0, 1.0);
    assert!(matches!(bin(0.5, &range, 0), Err(Error::Configuration(_))));
}

#[test]
fn test_hello_world_end_to_end() {
    let options = LayoutOptions::new().with_rows(2).with_columns(2);
    let page = layout_page(
        1,
        "page_1.jpg",
        vec![
            Detection::new("Hello", 0.0, 0.0),
            Detection::new("World", 50.0, 1.0),
        ],
        &options,
    )
    .unwrap();

    assert_eq!(page.formatted, vec!["Hello", "World"]);
}

#[test]
fn test_space_redutor_monotonic() {
    let detections = vec![Detection::new("A", 0.0, 0.0), Detection::new("B", 100.0, 0.0)];

    let narrow = layout_page(
        1,
        "p",
        detections.clone(),
        &LayoutOptions::new().with_columns(10).with_space_redutor(10),
    )
    .unwrap();
    let wide = layout_page(
        1,
        "p",
        detections,
        &LayoutOptions::new().with_columns(10).with_space_redutor(50),
    )
    .unwrap();

    let small = tabs_between(&narrow.formatted[0], "A", "B");
    let large = tabs_between(&wide.formatted[0], "A", "B");
    assert!(small >= large, "{} < {}", small, large);
    assert_eq!(small, 6);
    assert_eq!(large, 1);
}

#[test]
fn test_font_size_regulator_monotonic() {
    let detections = vec![Detection::new("A", 0.0, 0.0), Detection::new("B", 100.0, 0.0)];
    let mut previous = 0;
    for regulator in 0..10 {
        let page = layout_page(
            1,
            "p",
            detections.clone(),
            &LayoutOptions::new().with_font_size_regulator(regulator),
        )
        .unwrap();
        let tabs = tabs_between(&page.formatted[0], "A", "B");
        assert!(tabs >= previous);
        previous = tabs;
    }
}

#[test]
fn test_every_fragment_in_exactly_one_line() {
    let fragments: Vec<Fragment> = receipt()
        .into_iter()
        .map(|d| Fragment::from_detection(d, 1, "receipt"))
        .collect();
    let placed = map_positions(fragments, 35, 20).unwrap();
    let lines = assemble_lines(placed);

    assert!(lines.iter().all(|l| !l.is_empty()));
    let total: usize = lines.iter().map(Line::len).sum();
    assert_eq!(total, receipt().len());

    for line in &lines {
        let columns = line.columns();
        assert!(columns.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn test_arrival_order_does_not_matter() {
    let engine = LayoutEngine::new(LayoutOptions::default()).unwrap();
    let forward = engine.layout_detections(1, "r", receipt()).unwrap();

    let mut reversed = receipt();
    reversed.reverse();
    let backward = engine.layout_detections(1, "r", reversed).unwrap();

    let mut shuffled = receipt();
    shuffled.rotate_left(3);
    let rotated = engine.layout_detections(1, "r", shuffled).unwrap();

    assert_eq!(forward.formatted, backward.formatted);
    assert_eq!(forward.formatted, rotated.formatted);
    assert_eq!(forward.lines, backward.lines);
}

#[test]
fn test_equal_column_ordered_by_x() {
    // Both land in column 0 of a single-column grid.
    let fragments = vec![
        Fragment::new("second", 7.0, 0.0),
        Fragment::new("first", 3.0, 0.0),
        Fragment::new("edge", 0.0, 10.0),
    ];
    let lines = assemble_lines(map_positions(fragments, 1, 1).unwrap());
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].plain_text(), "edge first second");
}

#[test]
fn test_formatter_never_glues_fragments() {
    // Long fragments in adjacent columns leave no room for tabs.
    let fragments = vec![
        Fragment::new("Supercalifragilistic", 0.0, 0.0),
        Fragment::new("expialidocious", 10.0, 0.0),
        Fragment::new("again", 20.0, 0.0),
    ];
    let lines = assemble_lines(map_positions(fragments, 1, 3).unwrap());
    for redutor in 1..20 {
        for regulator in 0..8 {
            let text = format_line(&lines[0], redutor, regulator).unwrap();
            assert!(!text.contains("Supercalifragilisticexpialidocious"));
            assert!(!text.contains("expialidociousagain"));
        }
    }
}

#[test]
fn test_formatter_rejects_zero_redutor() {
    assert!(matches!(
        LineFormatter::new(0, 6),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn test_receipt_rows() {
    let page = layout_page(1, "receipt.jpg", receipt(), &LayoutOptions::default()).unwrap();
    assert_eq!(page.line_count(), 3);
    assert!(page.formatted[0].ends_with("ACME STORE"));
    assert!(page.formatted[1].starts_with("Item"));
    assert!(page.formatted[2].starts_with("Coffee"));

    // Columns line up: the price column gets the same tab offset on both rows.
    let header_tabs = tabs_between(&page.formatted[1], "Qty", "Price");
    let row_tabs = tabs_between(&page.formatted[2], "2", "5.00");
    assert_eq!(header_tabs, row_tabs);
}

#[test]
fn test_empty_page() {
    let page = layout_page(3, "blank.png", Vec::new(), &LayoutOptions::default()).unwrap();
    assert!(page.is_empty());
    assert_eq!(page.text(), "");
}

#[test]
fn test_layout_options_from_json() {
    let options = LayoutOptions::from_json(r#"{"num_rows": 50, "space_redutor": 4}"#).unwrap();
    assert_eq!(options.num_rows, 50);
    assert_eq!(options.num_columns, 20);
    assert_eq!(options.space_redutor, 4);

    assert!(LayoutOptions::from_json(r#"{"num_columns": 0}"#).is_err());
}
