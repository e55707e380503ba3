mod common;

use case_report_pdf::{ReportGenerator, Variant};

#[test]
fn same_input_and_timestamp_give_identical_bytes() {
    let generator = ReportGenerator::default();
    let case = common::sample_case();
    for variant in Variant::ALL {
        let first = generator.generate_at(&case, variant, common::fixed_time()).unwrap();
        let second = generator.generate_at(&case, variant, common::fixed_time()).unwrap();
        assert_eq!(first.bytes, second.bytes, "{variant} output differs");
        assert_eq!(first.filename, second.filename);
    }
}

#[test]
fn layouts_are_equal_across_threads() {
    let generator = ReportGenerator::default();
    let case = common::checklist_case(150, 80);
    let docs: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| generator.layout(&case, Variant::Lab, common::fixed_time())))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(docs.windows(2).all(|w| w[0] == w[1]));
}
