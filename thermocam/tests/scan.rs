// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

mod common;

use common::{camera, camera_with, exchange, FakeBus, FakeLink, AMBIENT_RAW, OBJECT_RAW};
use thermocam::control::{ScanConfig, ScanPhase};
use thermocam::CameraConfig;

fn scan_lines(lines: &[String]) -> Vec<&str> {
    lines
        .iter()
        .map(String::as_str)
        .filter(|l| l.starts_with("<Scan:"))
        .collect()
}

#[test]
fn full_scan_with_one_failed_sample() {
    let mut bus = FakeBus::new(OBJECT_RAW, AMBIENT_RAW);
    bus.fail_on = vec![5];
    let mut cam = camera_with(bus, CameraConfig::default());
    let mut link = FakeLink::default();

    link.host_sends("<s>");
    cam.receive(&mut link);
    assert_eq!(cam.axes().positions(), (295, 488));

    let mut ticks = 0;
    while cam.scan().is_active() {
        cam.tick(&mut link);
        ticks += 1;
    }
    // 25 settle ticks, then one per cell.
    assert_eq!(ticks, 25 + 64 * 64);

    let lines = link.take_lines();
    let samples = scan_lines(&lines);
    assert_eq!(samples.len(), 64 * 64);
    assert_eq!(samples[0], format!("<Scan:0:0:{}>", OBJECT_RAW));
    assert_eq!(samples[3], format!("<Scan:0:3:{}>", OBJECT_RAW));
    assert_eq!(samples[4], "<Scan:0>");
    assert_eq!(samples[5], format!("<Scan:0:5:{}>", OBJECT_RAW));
    // Second column runs bottom to top.
    assert_eq!(samples[64], format!("<Scan:1:63:{}>", OBJECT_RAW));
    assert_eq!(samples[127], format!("<Scan:1:0:{}>", OBJECT_RAW));
    assert_eq!(samples[4095], format!("<Scan:63:0:{}>", OBJECT_RAW));

    // Parked on the last sampled cell.
    assert_eq!(cam.axes().positions(), (295 + 63 * 3, 488));
    assert_eq!(cam.scan_phase(), ScanPhase::Idle);

    let debug: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|l| l.starts_with("<DEBUG:"))
        .collect();
    if cfg!(feature = "debug-messages") {
        assert_eq!(
            debug,
            [
                "<DEBUG:Scan started>",
                "<DEBUG:Scan settled>",
                "<DEBUG:Scan complete>"
            ]
        );
    } else {
        assert!(debug.is_empty());
    }
}

#[test]
fn start_while_running_is_refused() {
    let (mut cam, mut link) = (camera(), FakeLink::default());
    exchange(&mut cam, &mut link, "<s>");
    assert!(cam.scan().is_active());

    assert_eq!(
        exchange(&mut cam, &mut link, "<s>"),
        "<WARNING:Scan already running.>\r\n"
    );
    assert_eq!(cam.scan_phase(), ScanPhase::Initializing { elapsed: 0 });
}

#[test]
fn commands_are_served_during_a_scan() {
    let (mut cam, mut link) = (camera(), FakeLink::default());
    exchange(&mut cam, &mut link, "<s>");
    cam.tick(&mut link);
    link.take_output();

    assert_eq!(
        exchange(&mut cam, &mut link, "<a?>"),
        "<ABSPOS:295,488>\r\n"
    );
    assert_eq!(
        exchange(&mut cam, &mut link, "<ta?>"),
        format!("<AMBIENT:{}>\r\n", AMBIENT_RAW)
    );
}

#[test]
fn error_bit_during_scan_warns_and_keeps_sample() {
    let mut bus = FakeBus::new(OBJECT_RAW, AMBIENT_RAW);
    bus.error_flag = true;
    let config = CameraConfig::default()
        .with_scan(ScanConfig::default().with_resolution(1).with_settle_ticks(1));
    let mut cam = camera_with(bus, config);
    let mut link = FakeLink::default();

    exchange(&mut cam, &mut link, "<s>");
    cam.tick(&mut link);
    link.take_output();

    cam.tick(&mut link);
    let lines = link.take_lines();
    let expected = format!("<Scan:0:0:{}>", OBJECT_RAW);
    assert_eq!(
        lines.iter().filter(|l| !l.starts_with("<DEBUG:")).collect::<Vec<_>>(),
        ["<WARNING:Temp sensor errorbit high>", expected.as_str()]
    );
    assert!(!cam.scan().is_active());
}

#[test]
fn poll_paces_scan_by_tick_period() {
    let config = CameraConfig::default()
        .with_tick_period(20)
        .with_scan(ScanConfig::default().with_resolution(2).with_settle_ticks(2));
    let mut cam = camera_with(FakeBus::new(OBJECT_RAW, AMBIENT_RAW), config);
    let mut link = FakeLink::default();

    link.host_sends("<s>");
    cam.poll(0, &mut link);
    assert!(cam.scan().is_active());

    cam.poll(10, &mut link);
    assert_eq!(cam.scan_phase(), ScanPhase::Initializing { elapsed: 0 });
    cam.poll(20, &mut link);
    assert_eq!(cam.scan_phase(), ScanPhase::Initializing { elapsed: 1 });
    cam.poll(40, &mut link);
    assert_eq!(cam.scan_phase(), ScanPhase::Stepping);
    link.take_output();

    let mut sampled = Vec::new();
    for now in [59, 60, 79, 80, 100, 120] {
        cam.poll(now, &mut link);
        sampled.push(scan_lines(&link.take_lines()).len());
    }
    assert_eq!(sampled, [0, 1, 0, 1, 1, 1]);
    assert!(!cam.scan().is_active());
    assert_eq!(cam.scan().position(), (2, 0));
}

#[test]
fn oversized_grid_warns_but_still_scans() {
    let config = CameraConfig::default()
        .with_scan(ScanConfig::default().with_resolution(200).with_settle_ticks(1));
    let mut cam = camera_with(FakeBus::new(OBJECT_RAW, AMBIENT_RAW), config);
    let mut link = FakeLink::default();

    let reply = exchange(&mut cam, &mut link, "<s>");
    assert!(reply.contains("<WARNING:Servo position value has to be between 175 and 608."));
    assert!(cam.scan().is_active());
}
