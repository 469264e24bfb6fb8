//! End-to-end: controller ⇄ gateway relay ⇄ command source, over
//! in-memory serial pipes.

use envirocontrol::app::ports::CommandLink;
use envirocontrol::app::{CommandSource, Intent};
use envirocontrol::config::{ControllerConfig, SystemConfig};
use envirocontrol::controller::{Controller, CycleOutcome};
use envirocontrol::error::LinkError;
use envirocontrol::gateway::Relay;
use envirocontrol::protocol::{CommandByte, LineDecoder, MemoryTransport, Transport};

use super::mock_hw::{MockBoard, MockStore, RecordingEventSink};

/// Host-side command link over the dashboard's pipe end.
struct PipeLink<'a>(&'a mut MemoryTransport);

impl CommandLink for PipeLink<'_> {
    fn send(&mut self, command: CommandByte) -> Result<(), LinkError> {
        match self.0.write(&[command.as_byte()]) {
            Ok(_) => Ok(()),
            Err(never) => match never {},
        }
    }
}

struct Bench {
    controller: Controller,
    board: MockBoard,
    node: MemoryTransport,
    relay: Relay<MemoryTransport, MemoryTransport>,
    dashboard: MemoryTransport,
    decoder: LineDecoder,
    source: CommandSource,
    store: MockStore,
    sink: RecordingEventSink,
}

impl Bench {
    fn new(board: MockBoard) -> Self {
        let (node, device_side) = MemoryTransport::pair();
        let (host_side, dashboard) = MemoryTransport::pair();
        Self {
            controller: Controller::new(ControllerConfig::default()),
            board,
            node,
            relay: Relay::new(device_side, host_side),
            dashboard,
            decoder: LineDecoder::new(),
            source: CommandSource::new(&SystemConfig::default()),
            store: MockStore::default(),
            sink: RecordingEventSink::default(),
        }
    }

    /// One controller cycle, one relay tick, then the host drains its end.
    fn step(&mut self) -> CycleOutcome {
        let outcome = self.controller.cycle(&mut self.board, &mut self.node);
        self.relay.poll().unwrap();

        let bytes = self.dashboard.take_all();
        let mut lines = Vec::new();
        self.decoder.feed(&bytes, |item| {
            if let Ok(line) = item {
                lines.push(line.to_string());
            }
        });
        for line in lines {
            let _ = self.source.handle_line(
                &line,
                &mut self.store,
                &mut PipeLink(&mut self.dashboard),
                &mut self.sink,
            );
        }
        self.relay.poll().unwrap();
        outcome
    }

    fn intent(&mut self, intent: Intent) {
        self.source
            .handle_intent(intent, &mut PipeLink(&mut self.dashboard), &mut self.sink)
            .unwrap();
        self.relay.poll().unwrap();
    }
}

#[test]
fn readings_flow_to_the_store_unchanged() {
    let mut bench = Bench::new(MockBoard::new(25.3, 48.0, 612));
    for _ in 0..3 {
        bench.step();
    }
    assert_eq!(bench.store.rows.len(), 3);
    let r = bench.store.rows[0];
    assert!((r.temperature - 25.3).abs() < 0.01);
    assert!((r.humidity - 48.0).abs() < 0.01);
    assert_eq!(r.light_raw, 612);
    assert!(!bench.board.light_on(), "612 is bright enough");
    assert_eq!(bench.relay.stats().dropped, 0);
}

#[test]
fn dashboard_switch_reaches_the_controller_next_cycle() {
    let mut bench = Bench::new(MockBoard::new(22.0, 40.0, 900));
    bench.step();
    assert!(!bench.board.light_on());

    bench.intent(Intent::LightOn);
    bench.step();
    assert!(bench.board.light_on());

    bench.intent(Intent::ResetAll);
    bench.step();
    assert!(!bench.board.light_on());
}

#[test]
fn learned_threshold_drives_the_fan_below_the_local_threshold() {
    // 27 °C: under the controller's own 30 °C auto threshold, but above the
    // host's default comfort threshold plus band.
    let mut bench = Bench::new(MockBoard::new(27.0, 40.0, 900));
    bench.step();
    assert!(!bench.board.fan_on(), "override not applied yet");
    assert!(bench.source.is_cooling());

    bench.step();
    assert!(bench.board.fan_on());
    assert!(bench.controller.state().fan_override);
}
