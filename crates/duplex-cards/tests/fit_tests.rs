use duplex_cards::fit::{Extent, MAX_FIT_ITERATIONS};
use duplex_cards::layout::TextBox;
use duplex_cards::*;
use std::cell::Cell;

/// Extent grows linearly with the font size, independent of wrap width
struct LinearMeasure {
    width_per_pt: f32,
    height_per_pt: f32,
    calls: Cell<usize>,
}

impl LinearMeasure {
    fn new(width_per_pt: f32, height_per_pt: f32) -> Self {
        Self {
            width_per_pt,
            height_per_pt,
            calls: Cell::new(0),
        }
    }
}

impl TextMeasure for LinearMeasure {
    fn measure(&self, _text: &str, size_pt: f32, _max_width_pt: f32) -> Extent {
        self.calls.set(self.calls.get() + 1);
        Extent {
            width_pt: size_pt * self.width_per_pt,
            height_pt: size_pt * self.height_per_pt,
        }
    }
}

#[test]
fn test_fits_at_base_without_shrinking() {
    let measure = LinearMeasure::new(10.0, 5.0);
    let outcome = fit_text("x", ContentBox::new(200.0, 100.0), &measure, &FitParams::default());
    assert_eq!(outcome, FitOutcome::Fitted { size_pt: 10.0 });
    assert_eq!(measure.calls.get(), 1);
}

#[test]
fn test_shrinks_until_both_axes_fit() {
    let measure = LinearMeasure::new(10.0, 5.0);
    // Width allows 9pt, height allows 8pt
    let outcome = fit_text("x", ContentBox::new(90.0, 40.0), &measure, &FitParams::default());
    assert_eq!(outcome, FitOutcome::Fitted { size_pt: 8.0 });
}

#[test]
fn test_impossible_container_stops_at_floor() {
    let measure = LinearMeasure::new(10.0, 5.0);
    let params = FitParams::default();
    let outcome = fit_text("x", ContentBox::new(1.0, 1.0), &measure, &params);
    assert_eq!(outcome, FitOutcome::Overflowing { size_pt: 7.0 });

    // (10 - 7) / 0.25 shrink steps plus the first measurement
    assert_eq!(measure.calls.get(), 13);
}

#[test]
fn test_size_stays_within_bounds() {
    let measure = LinearMeasure::new(10.0, 5.0);
    let params = FitParams::default();
    for width in [0.5, 10.0, 70.0, 72.5, 85.0, 100.0, 1000.0] {
        let outcome = fit_text("x", ContentBox::new(width, 1000.0), &measure, &params);
        let size = outcome.size_pt().unwrap();
        assert!(size <= params.base_size_pt, "{size} above base");
        assert!(size >= params.min_size_pt, "{size} below floor");
    }
}

#[test]
fn test_large_step_clamps_to_floor() {
    let measure = LinearMeasure::new(10.0, 5.0);
    let params = FitParams {
        step_pt: 5.0,
        ..Default::default()
    };
    let outcome = fit_text("x", ContentBox::new(1.0, 1.0), &measure, &params);
    assert_eq!(outcome, FitOutcome::Overflowing { size_pt: 7.0 });
}

#[test]
fn test_zero_step_is_bounded() {
    let measure = LinearMeasure::new(10.0, 5.0);
    let params = FitParams {
        step_pt: 0.0,
        ..Default::default()
    };
    let outcome = fit_text("x", ContentBox::new(1.0, 1.0), &measure, &params);
    assert_eq!(outcome, FitOutcome::Overflowing { size_pt: 10.0 });
    assert_eq!(measure.calls.get(), MAX_FIT_ITERATIONS + 1);
}

#[test]
fn test_negative_step_never_grows_text() {
    let params = FitParams {
        step_pt: -0.25,
        ..Default::default()
    };
    let outcome = fit_text(
        &"word ".repeat(500),
        ContentBox::new(150.0, 60.0),
        &HelveticaMetrics,
        &params,
    );
    assert_eq!(outcome, FitOutcome::Overflowing { size_pt: 10.0 });

    let measure = LinearMeasure::new(10.0, 5.0);
    let outcome = fit_text("x", ContentBox::new(1.0, 1.0), &measure, &params);
    assert_eq!(outcome.size_pt(), Some(params.base_size_pt));
    assert_eq!(measure.calls.get(), MAX_FIT_ITERATIONS + 1);
}

#[test]
fn test_unlaid_container_is_skipped() {
    let measure = LinearMeasure::new(10.0, 5.0);
    let params = FitParams::default();

    for container in [
        ContentBox::default(),
        ContentBox::new(0.0, 100.0),
        ContentBox::new(100.0, 0.0),
    ] {
        assert_eq!(
            fit_text("x", container, &measure, &params),
            FitOutcome::Skipped
        );
    }
    assert_eq!(measure.calls.get(), 0);
}

#[test]
fn test_skipped_box_keeps_its_size() {
    let mut text_box = TextBox {
        slot: SlotPosition::TopLeft,
        card_id: Some("a".to_string()),
        text: "some text".to_string(),
        size_pt: 10.0,
        rotated: false,
        fit: None,
    };
    let outcome = text_box.fit(ContentBox::default(), &HelveticaMetrics, &FitParams::default());
    assert_eq!(outcome, FitOutcome::Skipped);
    assert_eq!(text_box.size_pt, 10.0);
    assert_eq!(text_box.fit, Some(FitOutcome::Skipped));
}

#[test]
fn test_helvetica_long_answer_shrinks() {
    let container = ContentBox::new(150.0, 40.0);
    let params = FitParams::default();

    let short = fit_text("Capital of France?", container, &HelveticaMetrics, &params);
    assert_eq!(short, FitOutcome::Fitted { size_pt: 10.0 });

    let long = "Mitochondria generate most of the chemical energy needed to power \
                the biochemical reactions of the cell";
    let outcome = fit_text(long, container, &HelveticaMetrics, &params);
    let size = outcome.size_pt().unwrap();
    assert!(size < 10.0);
    assert!(size >= 7.0);
    if let FitOutcome::Fitted { size_pt } = outcome {
        let extent = HelveticaMetrics.measure(long, size_pt, container.width_pt);
        assert!(container.contains(extent));
    }
}

#[test]
fn test_helvetica_wall_of_text_stops_at_floor() {
    let text = "word ".repeat(500);
    let outcome = fit_text(
        &text,
        ContentBox::new(150.0, 60.0),
        &HelveticaMetrics,
        &FitParams::default(),
    );
    assert_eq!(outcome, FitOutcome::Overflowing { size_pt: 7.0 });
}
