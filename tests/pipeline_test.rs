mod test_signals;

use approx::assert_relative_eq;
use echoscope::config::{DetectionParams, DetectorMode, EchoConfig, GeometryModel};
use echoscope::signal_processing::{
    compute_envelope, compute_threshold, find_first_crossing, find_peaks, refine_peak,
};
use echoscope::tof::StartEvent;
use echoscope::{analyze, detect};
use test_signals::{impulse_buffer, pulse_echo_buffer, step_envelope};

fn peak_pair_config(min_separation_ms: f32) -> EchoConfig {
    EchoConfig {
        detection: DetectionParams {
            min_separation_ms,
            ..DetectionParams::default()
        },
        ..EchoConfig::default()
    }
}

#[test]
fn test_pulse_echo_measurement() {
    let buffer = pulse_echo_buffer();
    let analysis = analyze(&buffer, &peak_pair_config(5.0));

    assert_eq!(analysis.detection.events, vec![480, 960]);

    let m = analysis.measurement;
    assert_relative_eq!(m.timing.t_a.unwrap(), 0.01, epsilon = 1e-12);
    assert_relative_eq!(m.timing.t_b.unwrap(), 0.02, epsilon = 1e-12);
    assert_relative_eq!(m.timing.dt.unwrap(), 0.01, epsilon = 1e-12);
    assert_relative_eq!(m.speed_mps.unwrap(), 340.0, max_relative = 1e-6);

    let start = m.start.mark().unwrap();
    assert_eq!(start.amplitude, 0.9);
    assert_eq!(m.end.unwrap().amplitude, 0.5);
}

#[test]
fn test_separation_wider_than_gap_hides_echo() {
    // 40 ms is 1920 samples: the echo 480 samples later falls in the exclusion zone.
    let buffer = pulse_echo_buffer();
    let analysis = analyze(&buffer, &peak_pair_config(40.0));

    assert_eq!(analysis.detection.events, vec![480]);
    assert_eq!(analysis.measurement.end, None);
    assert_eq!(analysis.measurement.timing.dt, None);
    assert_eq!(analysis.measurement.speed_mps, None);
}

#[test]
fn test_silence_yields_no_events() {
    let buffer = impulse_buffer(4800, &[]);
    for mode in [DetectorMode::PeakPair, DetectorMode::FirstCrossing] {
        let detection = detect(&buffer, &DetectionParams::default(), mode);
        assert_eq!(detection.threshold, 0.08);
        assert!(detection.events.is_empty(), "{:?} found events", mode);
    }

    let analysis = analyze(&buffer, &EchoConfig::default());
    assert_eq!(analysis.measurement.timing.dt, None);
    assert_eq!(analysis.measurement.speed_mps, None);
}

#[test]
fn test_analysis_is_repeatable() {
    let buffer = pulse_echo_buffer();
    let config = peak_pair_config(5.0);
    assert_eq!(analyze(&buffer, &config), analyze(&buffer, &config));
}

#[test]
fn test_accepted_peaks_respect_separation() {
    let mut envelope = vec![0.0f32; 2000];
    for (k, value) in envelope.iter_mut().enumerate() {
        // Peaks every 50 samples
        if k % 50 == 25 {
            *value = 1.0;
        }
    }

    let peaks = find_peaks(&envelope, 0.5, 120, 100);
    assert!(peaks.len() > 1);
    for pair in peaks.windows(2) {
        assert!(pair[1] - pair[0] >= 120, "peaks {:?} too close", pair);
    }
}

#[test]
fn test_first_crossing_on_step() {
    let envelope = step_envelope(2000, 1000, 1.0);
    let threshold = compute_threshold(&envelope, 0.5);
    assert_eq!(find_first_crossing(&envelope, threshold), Some(1000));
    assert!(find_peaks(&envelope, threshold, 10, 2).iter().all(|&p| p >= 1000));
}

#[test]
fn test_first_crossing_measures_from_emission() {
    let buffer = impulse_buffer(4800, &[(960, 0.5)]);
    let config = EchoConfig {
        mode: DetectorMode::FirstCrossing,
        emission_time_s: Some(0.01),
        geometry: GeometryModel::OneWay { length_m: 3.4 },
        ..EchoConfig::default()
    };

    let analysis = analyze(&buffer, &config);
    assert_eq!(analysis.detection.events, vec![960]);
    assert_eq!(analysis.measurement.start, StartEvent::Emission(Some(0.01)));
    assert_relative_eq!(analysis.measurement.timing.dt.unwrap(), 0.01, epsilon = 1e-12);
    assert_relative_eq!(analysis.measurement.speed_mps.unwrap(), 340.0, max_relative = 1e-6);
}

#[test]
fn test_refined_index_is_window_maximum() {
    let buffer = impulse_buffer(4800, &[(470, 0.3), (478, -0.95), (490, 0.6)]);
    let samples = buffer.samples();
    let window = 48;

    let refined = refine_peak(samples, 480, window);
    assert_eq!(refined, 478);
    let best = samples[refined].abs();
    for &sample in &samples[480 - window..=480 + window] {
        assert!(sample.abs() <= best);
    }
}

#[test]
fn test_envelope_is_non_negative_and_aligned() {
    let buffer = pulse_echo_buffer();
    let envelope = compute_envelope(buffer.samples(), 72);
    assert_eq!(envelope.len(), buffer.len());
    assert!(envelope.iter().all(|&v| v >= 0.0));
    assert_eq!(envelope[479], 0.0);
    assert_relative_eq!(envelope[480], 0.9 / 72.0, epsilon = 1e-7);
}

#[test]
fn test_speed_follows_geometry() {
    let buffer = pulse_echo_buffer();
    let m = analyze(&buffer, &peak_pair_config(5.0)).measurement;

    let round_trip = m.with_geometry(GeometryModel::RoundTrip { length_m: 1.7 });
    let one_way = m.with_geometry(GeometryModel::OneWay { length_m: 1.7 });
    let custom = m.with_geometry(GeometryModel::Custom { path_m: 3.4 });

    assert_relative_eq!(
        round_trip.speed_mps.unwrap(),
        2.0 * one_way.speed_mps.unwrap(),
        max_relative = 1e-12
    );
    assert_relative_eq!(
        custom.speed_mps.unwrap(),
        round_trip.speed_mps.unwrap(),
        max_relative = 1e-12
    );
    assert_eq!(round_trip.timing, m.timing);
}
