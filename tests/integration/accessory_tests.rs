//! Characteristic read/write behaviour through the full dispatch chain.

use crate::mock_ports::{MemPrefs, RecordingSink};

use melhap::app::ports::HvacPort;
use melhap::app::service::AccessoryService;
use melhap::hap::chars::TemperatureDisplayUnits;
use melhap::hap::db::{ATTRIBUTE_DB, CharacteristicId, Format, ServiceId};
use melhap::hap::{HapError, HapValue};
use melhap::hvac::sim::SimulatedHvac;
use melhap::hvac::{FanSpeed, Mode, Power, VaneHoriz, VaneVert};

fn fixture() -> (AccessoryService, SimulatedHvac, MemPrefs, RecordingSink) {
    let mut svc = AccessoryService::new();
    svc.set_server_running(true);
    (
        svc,
        SimulatedHvac::connected(),
        MemPrefs::new(),
        RecordingSink::new(),
    )
}

// ── Read sweep ────────────────────────────────────────────────

#[test]
fn every_characteristic_reads_with_its_declared_format() {
    let (svc, hvac, _, _) = fixture();

    for desc in ATTRIBUTE_DB {
        let value = svc
            .read(desc.id, &hvac)
            .unwrap_or_else(|e| panic!("read {:?} failed: {}", desc.id, e));
        let format_matches = matches!(
            (desc.format, value),
            (Format::Bool, HapValue::Bool(_))
                | (Format::UInt8, HapValue::U8(_))
                | (Format::Int, HapValue::Int(_))
                | (Format::Float, HapValue::Float(_))
        );
        assert!(
            format_matches,
            "{:?} declared {:?} but read {:?}",
            desc.id, desc.format, value
        );

        if let Some(range) = desc.range {
            let raw = match value {
                HapValue::U8(v) => f32::from(v),
                HapValue::Int(v) => v as f32,
                HapValue::Float(v) => v,
                HapValue::Bool(_) => continue,
            };
            assert!(
                raw >= range.min && raw <= range.max,
                "{:?} read {} outside [{}, {}]",
                desc.id,
                raw,
                range.min,
                range.max
            );
        }
    }
}

#[test]
fn reads_succeed_while_disconnected() {
    let (svc, mut hvac, _, _) = fixture();
    hvac.set_connected(false);

    for desc in ATTRIBUTE_DB {
        assert!(svc.read(desc.id, &hvac).is_ok(), "{:?}", desc.id);
    }
    assert_eq!(
        svc.read(CharacteristicId::ThermostatStatusActive, &hvac),
        Ok(HapValue::Bool(false))
    );
}

// ── Thermostat ────────────────────────────────────────────────

#[test]
fn setpoint_write_applies_only_while_powered() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();

    // Powered off: the write is accepted but not forwarded.
    svc.write(
        CharacteristicId::TargetTemperature,
        HapValue::Float(24.0),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert!((hvac.state().setpoint - 21.0).abs() < f32::EPSILON);
    assert_eq!(
        sink.characteristics(),
        vec![CharacteristicId::TargetTemperature],
        "the written characteristic still re-notifies"
    );

    hvac.set_power(Power::On);
    sink.clear();
    svc.write(
        CharacteristicId::TargetTemperature,
        HapValue::Float(24.0),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert!((hvac.state().setpoint - 24.0).abs() < f32::EPSILON);
}

#[test]
fn target_state_write_cool_powers_on() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();

    svc.write(
        CharacteristicId::TargetHeatingCoolingState,
        HapValue::U8(2),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();

    assert_eq!(hvac.state().power, Power::On);
    assert_eq!(hvac.state().mode, Mode::Cool);
    // The target state itself is not echoed back.
    assert_eq!(
        sink.count_for(CharacteristicId::TargetHeatingCoolingState),
        0
    );
    assert_eq!(sink.count_for(CharacteristicId::CurrentHeatingCoolingState), 1);
    assert_eq!(sink.count_for(CharacteristicId::FanRotationSpeed), 1);
    assert_eq!(sink.count_for(CharacteristicId::ModeFanOn), 1);
    assert_eq!(sink.count_for(CharacteristicId::ModeDryOn), 1);
}

#[test]
fn target_state_off_keeps_dry_mode_running() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();
    hvac.set_power(Power::On);
    hvac.set_mode(Mode::Dry);

    svc.write(
        CharacteristicId::TargetHeatingCoolingState,
        HapValue::U8(0),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();

    assert_eq!(hvac.state().power, Power::On, "dry mode owns the unit");
    assert_eq!(hvac.state().mode, Mode::Dry);

    // Same write with a thermostat-owned mode powers down.
    hvac.set_mode(Mode::Heat);
    svc.write(
        CharacteristicId::TargetHeatingCoolingState,
        HapValue::U8(0),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert_eq!(hvac.state().power, Power::Off);
}

#[test]
fn target_state_round_trips_through_read() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();

    for raw in [3u8, 2, 1, 0] {
        svc.write(
            CharacteristicId::TargetHeatingCoolingState,
            HapValue::U8(raw),
            &mut hvac,
            &cfg,
            &mut sink,
        )
        .unwrap();
        assert_eq!(
            svc.read(CharacteristicId::TargetHeatingCoolingState, &hvac),
            Ok(HapValue::U8(raw))
        );
    }
}

#[test]
fn out_of_range_target_state_rejected() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();
    let err = svc.write(
        CharacteristicId::TargetHeatingCoolingState,
        HapValue::U8(4),
        &mut hvac,
        &cfg,
        &mut sink,
    );
    assert_eq!(err, Err(HapError::InvalidValue));
    assert!(sink.raised.is_empty());
}

#[test]
fn current_state_auto_mode_tracks_temperature_delta() {
    let (svc, mut hvac, _, _) = fixture();
    hvac.set_power(Power::On);
    hvac.set_mode(Mode::Auto);
    hvac.set_operating(true);
    hvac.set_setpoint(22.0);

    hvac.set_room_temperature(26.0);
    assert_eq!(
        svc.read(CharacteristicId::CurrentHeatingCoolingState, &hvac),
        Ok(HapValue::U8(2)),
        "warmer than setpoint reads Cool"
    );

    hvac.set_room_temperature(18.0);
    assert_eq!(
        svc.read(CharacteristicId::CurrentHeatingCoolingState, &hvac),
        Ok(HapValue::U8(1)),
        "colder than setpoint reads Heat"
    );

    hvac.set_operating(false);
    assert_eq!(
        svc.read(CharacteristicId::CurrentHeatingCoolingState, &hvac),
        Ok(HapValue::U8(0)),
        "idle unit reads Off"
    );
}

// ── Display units ─────────────────────────────────────────────

#[test]
fn display_units_survive_a_service_restart() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();

    svc.write(
        CharacteristicId::TemperatureDisplayUnits,
        HapValue::U8(1),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert_eq!(
        cfg.stored().unwrap().display_units,
        TemperatureDisplayUnits::Fahrenheit
    );

    // "Reboot": a fresh service picks the preference back up.
    let mut svc2 = AccessoryService::new();
    svc2.load_prefs(&cfg);
    assert_eq!(svc2.display_units(), TemperatureDisplayUnits::Fahrenheit);

    hvac.set_room_temperature(20.0);
    assert_eq!(
        svc2.read(CharacteristicId::CurrentTemperature, &hvac),
        Ok(HapValue::Float(20.0 * 9.0 / 5.0 + 32.0))
    );
}

#[test]
fn display_units_write_survives_flash_failure() {
    let (mut svc, mut hvac, _, mut sink) = fixture();
    let cfg = MemPrefs {
        fail_saves: true,
        ..Default::default()
    };

    // The save fails but the in-memory preference still flips.
    svc.write(
        CharacteristicId::TemperatureDisplayUnits,
        HapValue::U8(1),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert_eq!(svc.display_units(), TemperatureDisplayUnits::Fahrenheit);
    assert!(cfg.stored().is_none());
}

// ── Fan ───────────────────────────────────────────────────────

#[test]
fn rotation_speed_grid_round_trips() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();
    hvac.set_power(Power::On);

    for (percent, speed) in [
        (0.0, FanSpeed::Quiet),
        (25.0, FanSpeed::Low),
        (50.0, FanSpeed::Med),
        (75.0, FanSpeed::High),
        (100.0, FanSpeed::Turbo),
    ] {
        svc.write(
            CharacteristicId::FanRotationSpeed,
            HapValue::Float(percent),
            &mut hvac,
            &cfg,
            &mut sink,
        )
        .unwrap();
        assert_eq!(hvac.state().fan, speed);
        assert_eq!(
            svc.read(CharacteristicId::FanRotationSpeed, &hvac),
            Ok(HapValue::Float(percent))
        );
    }
}

#[test]
fn off_grid_rotation_write_leaves_fan_unchanged() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();
    hvac.set_power(Power::On);
    hvac.set_fan(FanSpeed::High);

    svc.write(
        CharacteristicId::FanRotationSpeed,
        HapValue::Float(60.0),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert_eq!(hvac.state().fan, FanSpeed::High);
    assert_eq!(
        sink.count_for(CharacteristicId::FanRotationSpeed),
        1,
        "fan group still re-notifies so the slider snaps back"
    );
}

#[test]
fn fan_target_state_auto_and_manual() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();
    hvac.set_power(Power::On);

    svc.write(
        CharacteristicId::FanTargetState,
        HapValue::U8(1),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert_eq!(hvac.state().fan, FanSpeed::Auto);
    assert_eq!(
        svc.read(CharacteristicId::FanTargetState, &hvac),
        Ok(HapValue::U8(1))
    );

    svc.write(
        CharacteristicId::FanTargetState,
        HapValue::U8(0),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert_eq!(hvac.state().fan, FanSpeed::Med);
}

// ── Vanes ─────────────────────────────────────────────────────

#[test]
fn tilt_write_positions_the_wide_vane() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();
    hvac.set_power(Power::On);

    svc.write(
        CharacteristicId::VaneVertTargetTilt,
        HapValue::Int(-90),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert_eq!(hvac.state().vane_vert, VaneVert::Leftest);
    assert_eq!(
        svc.read(CharacteristicId::VaneVertCurrentTilt, &hvac),
        Ok(HapValue::Int(-90))
    );
    assert_eq!(sink.count_for(CharacteristicId::VaneVertSwingMode), 1);
}

#[test]
fn swing_write_toggles_both_vanes_independently() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();
    hvac.set_power(Power::On);

    svc.write(
        CharacteristicId::VaneVertSwingMode,
        HapValue::U8(1),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert_eq!(hvac.state().vane_vert, VaneVert::Swing);
    assert_eq!(hvac.state().vane_horiz, VaneHoriz::Auto);
    assert_eq!(
        svc.read(CharacteristicId::VaneVertCurrentState, &hvac),
        Ok(HapValue::U8(2)),
        "slat reads Swinging"
    );

    svc.write(
        CharacteristicId::VaneHorizSwingMode,
        HapValue::U8(1),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert_eq!(hvac.state().vane_horiz, VaneHoriz::Swing);

    svc.write(
        CharacteristicId::VaneVertSwingMode,
        HapValue::U8(0),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert_eq!(hvac.state().vane_vert, VaneVert::Auto, "swing off → auto");
    assert_eq!(hvac.state().vane_horiz, VaneHoriz::Swing);
}

#[test]
fn vane_writes_ignored_while_powered_off() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();

    svc.write(
        CharacteristicId::VaneHorizTargetTilt,
        HapValue::Int(45),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert_eq!(hvac.state().vane_horiz, VaneHoriz::Auto);
    assert_eq!(
        sink.count_for(CharacteristicId::VaneHorizTargetTilt),
        1,
        "group still re-notifies"
    );
}

// ── Mode switches ─────────────────────────────────────────────

#[test]
fn fan_mode_switch_powers_the_unit_in_fan_mode() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();

    svc.write(
        CharacteristicId::ModeFanOn,
        HapValue::Bool(true),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert_eq!(hvac.state().power, Power::On);
    assert_eq!(hvac.state().mode, Mode::Fan);
    assert_eq!(svc.read(CharacteristicId::ModeFanOn, &hvac), Ok(HapValue::Bool(true)));
    assert_eq!(svc.read(CharacteristicId::ModeDryOn, &hvac), Ok(HapValue::Bool(false)));
    // Thermostat reads Off while fan mode runs.
    assert_eq!(
        svc.read(CharacteristicId::TargetHeatingCoolingState, &hvac),
        Ok(HapValue::U8(0))
    );

    sink.clear();
    svc.write(
        CharacteristicId::ModeFanOn,
        HapValue::Bool(false),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert_eq!(hvac.state().power, Power::Off);
    assert_eq!(hvac.state().mode, Mode::Auto);
    // Full fan-out: thermostat (3) + fan (4) + both switches (2).
    assert_eq!(sink.raised.len(), 9);
}

#[test]
fn dry_switch_on_then_thermostat_heat_takes_over() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();

    svc.write(
        CharacteristicId::ModeDryOn,
        HapValue::Bool(true),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert_eq!(hvac.state().mode, Mode::Dry);

    svc.write(
        CharacteristicId::TargetHeatingCoolingState,
        HapValue::U8(1),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    assert_eq!(hvac.state().mode, Mode::Heat);
    assert_eq!(svc.read(CharacteristicId::ModeDryOn, &hvac), Ok(HapValue::Bool(false)));
}

// ── Error paths ───────────────────────────────────────────────

#[test]
fn every_write_fails_while_disconnected() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();
    hvac.set_connected(false);

    for desc in ATTRIBUTE_DB.iter().filter(|d| d.writable) {
        let value = match desc.format {
            Format::Bool => HapValue::Bool(true),
            Format::UInt8 => HapValue::U8(0),
            Format::Int => HapValue::Int(0),
            Format::Float => HapValue::Float(20.0),
        };
        assert_eq!(
            svc.write(desc.id, value, &mut hvac, &cfg, &mut sink),
            Err(HapError::InvalidState),
            "{:?}",
            desc.id
        );
    }
    assert!(sink.raised.is_empty());
}

#[test]
fn read_only_characteristics_reject_writes() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();
    let err = svc.write(
        CharacteristicId::CurrentTemperature,
        HapValue::Float(25.0),
        &mut hvac,
        &cfg,
        &mut sink,
    );
    assert_eq!(err, Err(HapError::InvalidValue));
}

#[test]
fn notifications_carry_the_owning_service() {
    let (mut svc, mut hvac, cfg, mut sink) = fixture();

    svc.write(
        CharacteristicId::ModeFanOn,
        HapValue::Bool(true),
        &mut hvac,
        &cfg,
        &mut sink,
    )
    .unwrap();
    for (service, characteristic) in &sink.raised {
        assert_eq!(
            *service,
            characteristic.service(),
            "{:?} raised against the wrong service",
            characteristic
        );
    }
    assert!(sink.raised.iter().any(|(s, _)| *s == ServiceId::Thermostat));
    assert!(sink.raised.iter().any(|(s, _)| *s == ServiceId::Fan));
}
