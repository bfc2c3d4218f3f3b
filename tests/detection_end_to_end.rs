use iconmatch::{
    aggregate, classify, BandTally, Candidate, BBox, DetectConfig, Detector, LabelPolicy, RawMatch,
    TemplateResult,
};

fn result(max_confidence: f32, matches: Vec<RawMatch>) -> TemplateResult {
    TemplateResult {
        max_confidence,
        matches,
    }
}

#[test]
fn three_template_scenario() {
    let ids = ["A", "B", "C"];
    let results = vec![
        result(
            0.95,
            vec![
                RawMatch::new(100.0, 100.0, 50.0, 35.0, 0.95),
                RawMatch::new(103.0, 101.0, 50.0, 35.0, 0.88),
            ],
        ),
        result(0.82, vec![RawMatch::new(400.0, 100.0, 50.0, 35.0, 0.82)]),
        result(0.41, Vec::new()),
    ];

    let detection = Detector::new(DetectConfig::default())
        .detect(&ids, results)
        .unwrap();

    assert_eq!(detection.total_before, 3);
    assert_eq!(detection.selected.len(), 2);
    assert_eq!(detection.selected[0].template, "A");
    assert_eq!(detection.selected[0].confidence, 0.95);
    assert_eq!(detection.selected[1].template, "B");
    assert_eq!(detection.not_found, vec!["C".to_string()]);
    assert_eq!(detection.found_templates(), 2);
    assert_eq!(detection.annotations.len(), 2);
    assert_eq!(
        detection.tally,
        BandTally {
            high: 1,
            good: 1,
            fair: 0,
            weak: 0
        }
    );
}

#[test]
fn pool_size_is_sum_of_non_empty_match_lists() {
    let ids = ["t0", "t1", "t2", "t3"];
    let results = vec![
        result(0.9, vec![RawMatch::new(0.0, 0.0, 5.0, 5.0, 0.9); 3]),
        result(0.2, Vec::new()),
        result(0.85, vec![RawMatch::new(9.0, 9.0, 5.0, 5.0, 0.85); 2]),
        result(0.1, Vec::new()),
    ];
    let agg = aggregate(&ids, results).unwrap();
    assert_eq!(agg.pool.len(), 5);
    assert_eq!(agg.not_found, vec!["t1".to_string(), "t3".to_string()]);
    assert!(agg
        .pool
        .iter()
        .all(|c| c.template == "t0" || c.template == "t2"));
}

#[test]
fn tally_skips_the_documented_gap() {
    let selected: Vec<Candidate> = [0.65f32, 0.6, 0.9, 0.75, 0.55]
        .iter()
        .enumerate()
        .map(|(i, &c)| Candidate::new(BBox::new(i as f32 * 100.0, 0.0, 50.0, 35.0), c, "x"))
        .collect();
    let out = classify(&selected, &LabelPolicy::default());
    assert_eq!(out.annotations.len(), 5);
    assert_eq!(
        out.tally,
        BandTally {
            high: 1,
            good: 0,
            fair: 1,
            weak: 2
        }
    );
}

#[test]
fn labels_follow_policy() {
    let ids = ["crown_png.png"];
    let results = vec![result(0.97, vec![RawMatch::new(1.5, 2.5, 50.0, 35.0, 0.97)])];
    let detector = Detector::new(DetectConfig {
        labels: LabelPolicy {
            strip_token: "_png".to_string(),
            max_chars: 3,
        },
        ..DetectConfig::default()
    });
    let detection = detector.detect(&ids, results).unwrap();
    let desc = &detection.annotations[0];
    assert_eq!(desc.label, "cro");
    assert_eq!((desc.left, desc.top), (1, 2));
}
