//! Controller cycle tests against the recording board.

use envirocontrol::config::ControllerConfig;
use envirocontrol::controller::{ClimateSample, Controller, CycleOutcome, LightMode};
use envirocontrol::error::SensorError;
use envirocontrol::protocol::{MemoryTransport, Transport, parse_line};

use super::mock_hw::{ActuatorCall, MockBoard};

fn controller() -> Controller {
    Controller::new(ControllerConfig::default())
}

fn ok(t: f32, h: f32) -> Result<ClimateSample, SensorError> {
    Ok(ClimateSample {
        temperature_c: t,
        humidity_pct: h,
    })
}

#[test]
fn emitted_line_parses_back_to_the_reading() {
    let mut c = controller();
    let mut board = MockBoard::new(25.3, 48.0, 612);
    let (mut node, mut host) = MemoryTransport::pair();

    let CycleOutcome::Emitted(report) = c.cycle(&mut board, &mut node) else {
        panic!("expected an emitted line");
    };
    let wire = String::from_utf8(host.take_all()).unwrap();
    assert!(wire.ends_with('\n'));
    let parsed = parse_line(&wire).unwrap();
    assert!((parsed.temperature - report.reading.temperature).abs() < 0.01);
    assert!((parsed.humidity - report.reading.humidity).abs() < 0.01);
    assert_eq!(parsed.light_raw, 612);
}

#[test]
fn outputs_are_driven_every_good_cycle() {
    let mut c = controller();
    let mut board = MockBoard::new(22.0, 40.0, 300);
    let (mut node, _host) = MemoryTransport::pair();

    c.cycle(&mut board, &mut node);
    c.cycle(&mut board, &mut node);
    assert_eq!(
        board.calls,
        vec![
            ActuatorCall::Fan(false),
            ActuatorCall::Light(true),
            ActuatorCall::Fan(false),
            ActuatorCall::Light(true),
        ]
    );
}

#[test]
fn failed_reads_never_reach_the_wire() {
    let mut c = controller();
    let mut board = MockBoard::scripted(
        vec![
            ok(24.0, 50.0),
            ok(f32::NAN, 50.0),
            Err(SensorError::ReadFailed),
            ok(24.5, 51.0),
        ],
        800,
    );
    let (mut node, mut host) = MemoryTransport::pair();

    let outcomes: Vec<bool> = (0..4)
        .map(|_| matches!(c.cycle(&mut board, &mut node), CycleOutcome::Emitted(_)))
        .collect();
    assert_eq!(outcomes, vec![true, false, false, true]);

    let wire = String::from_utf8(host.take_all()).unwrap();
    assert_eq!(wire, "24.00,50.00,800\n24.50,51.00,800\n");
    assert!(!wire.to_lowercase().contains("nan"));
    assert_eq!(c.skipped_count(), 2);
}

#[test]
fn override_then_release_returns_fan_to_auto() {
    let mut c = controller();
    let mut board = MockBoard::new(25.0, 40.0, 800);
    let (mut node, mut host) = MemoryTransport::pair();

    host.write(b"P").unwrap();
    c.cycle(&mut board, &mut node);
    assert!(board.fan_on());

    host.write(b"N").unwrap();
    c.cycle(&mut board, &mut node);
    assert!(!board.fan_on(), "25 °C is below the local auto threshold");
}

#[test]
fn reset_clears_both_overrides_from_any_state() {
    for prelude in [&b""[..], b"P", b"L", b"l", b"Pl", b"PL", b"AAA"] {
        let mut c = controller();
        let mut board = MockBoard::new(25.0, 40.0, 800);
        let (mut node, mut host) = MemoryTransport::pair();

        host.write(prelude).unwrap();
        host.write(b"A").unwrap();
        c.cycle(&mut board, &mut node);

        let state = c.state();
        assert!(!state.fan_override, "prelude {:?}", prelude);
        assert_eq!(state.light_mode, LightMode::Auto, "prelude {:?}", prelude);
        assert!(!board.light_on(), "light 800 is bright: auto means off");
    }
}

#[test]
fn forced_light_ignores_ambient_level() {
    let mut c = controller();
    let mut board = MockBoard::new(25.0, 40.0, 100);
    let (mut node, mut host) = MemoryTransport::pair();

    host.write(b"l").unwrap();
    c.cycle(&mut board, &mut node);
    assert!(!board.light_on(), "forced off in the dark");

    board.light = 1000;
    host.write(b"L").unwrap();
    c.cycle(&mut board, &mut node);
    assert!(board.light_on(), "forced on in daylight");
}

#[test]
fn darkness_threshold_is_exclusive() {
    let mut c = controller();
    let (mut node, _host) = MemoryTransport::pair();

    let mut board = MockBoard::new(25.0, 40.0, 499);
    c.cycle(&mut board, &mut node);
    assert!(board.light_on());

    let mut board = MockBoard::new(25.0, 40.0, 500);
    c.cycle(&mut board, &mut node);
    assert!(!board.light_on());
}
