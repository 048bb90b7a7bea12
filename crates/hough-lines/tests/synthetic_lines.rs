use hough_core::{find_peaks, EdgeMask, Neighborhood, PeakParams, Threshold};
use hough_lines::{
    hough_lines_acc, LineAccumulatorParams, LineDetector, LineDetectorParams, LineFilterParams,
    PolarLine,
};

/// Rasterize `x cos t + y sin t = rho` by marking pixels within half a pixel.
fn raster_line(width: usize, height: usize, rho: f64, theta_deg: f64) -> EdgeMask {
    let line = PolarLine::new(rho, theta_deg);
    EdgeMask::from_fn(width, height, |x, y| {
        let p = nalgebra_point(x, y);
        line.signed_distance(p).abs() <= 0.5
    })
}

fn nalgebra_point(x: usize, y: usize) -> nalgebra::Point2<f64> {
    nalgebra::Point2::new(x as f64, y as f64)
}

#[test]
fn oblique_line_peak_is_within_one_bin() {
    for &(rho, theta) in &[(40.0, 30.0), (25.0, 60.0), (-20.0, 120.0), (55.0, 10.0)] {
        let mask = raster_line(100, 80, rho, theta);
        let space = hough_lines_acc(&mask, &LineAccumulatorParams::default()).unwrap();
        let (row, col, _) = space.accumulator.argmax().unwrap();
        let found = PolarLine::from_peak(&hough_core::Peak::new(col, row, 0), &space);
        assert!(
            (found.theta_deg - theta).abs() <= 1.0,
            "theta {theta}: found {}",
            found.theta_deg
        );
        assert!(
            (found.rho - rho).abs() <= 1.0 + 1e-9,
            "rho {rho}: found {}",
            found.rho
        );
    }
}

#[test]
fn votes_are_conserved_for_random_masks() {
    let mut state = 12345u32;
    let mask = EdgeMask::from_fn(64, 48, |_, _| {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (state >> 16) % 7 == 0
    });
    let params = LineAccumulatorParams::default();
    let space = hough_lines_acc(&mask, &params).unwrap();
    assert_eq!(
        space.accumulator.total_votes(),
        (mask.edge_count() * params.theta.len()) as u64
    );
}

#[test]
fn clustered_double_edges_survive_filtering() {
    // Two parallel edges of a thick bar plus one lone oblique line.
    let bar = EdgeMask::from_fn(120, 100, |x, _| x == 40 || x == 46);
    let lone = raster_line(120, 100, 60.0, 60.0);
    let mask = EdgeMask::from_fn(120, 100, |x, y| bar.is_edge(x, y) || lone.is_edge(x, y));

    let params = LineDetectorParams {
        peaks: PeakParams {
            num_peaks: 3,
            threshold: Threshold::RelativeToMax(0.4),
            neighborhood: Some(Neighborhood::new(5, 5)),
        },
        filter: Some(LineFilterParams {
            theta_hood: 3,
            rho_hood: 10,
        }),
        ..LineDetectorParams::default()
    };
    let res = LineDetector::new(params).detect(&mask).unwrap();
    assert_eq!(res.raw_peaks.len(), 3, "raw peaks {:?}", res.raw_peaks);
    assert_eq!(res.peaks.len(), 2);
    let mut rhos: Vec<f64> = res.lines.iter().map(|l| l.rho).collect();
    rhos.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(rhos, vec![40.0, 46.0]);
}

#[test]
fn zero_accumulator_round_trip_is_empty() {
    let space = hough_lines_acc(&EdgeMask::new(50, 50), &LineAccumulatorParams::default()).unwrap();
    for threshold in [Threshold::Absolute(0), Threshold::RelativeToMax(0.1)] {
        let params = PeakParams {
            threshold,
            ..PeakParams::default()
        };
        assert!(find_peaks(&space.accumulator, &params).unwrap().is_empty());
    }
}
