//! Driver event → notification fan-out behaviour.

use crate::mock_ports::{MemPrefs, RecordingSink};

use melhap::app::service::{AccessoryService, LedFeedback};
use melhap::config::AccessoryPrefs;
use melhap::hap::chars::TemperatureDisplayUnits;
use melhap::hap::db::{CharacteristicId, ServiceId};
use melhap::hvac::HvacEvent;
use melhap::hvac::sim::SimulatedHvac;

fn running_service() -> AccessoryService {
    let mut svc = AccessoryService::new();
    svc.set_server_running(true);
    svc
}

#[test]
fn connected_event_raises_status_active_on_every_service() {
    let mut svc = running_service();
    let hvac = SimulatedHvac::connected();
    let mut sink = RecordingSink::new();

    let fb = svc.handle_event(HvacEvent::Connected, &hvac, &mut sink);
    assert_eq!(fb, None);
    assert_eq!(sink.raised.len(), 6);
    for service in ServiceId::ALL {
        assert!(
            sink.raised.iter().any(|(s, _)| *s == service),
            "missing status-active for {:?}",
            service
        );
    }
}

#[test]
fn params_changed_fans_out_to_every_group() {
    let mut svc = running_service();
    let hvac = SimulatedHvac::connected();
    let mut sink = RecordingSink::new();

    let fb = svc.handle_event(HvacEvent::ParamsChanged, &hvac, &mut sink);
    assert_eq!(fb, Some(LedFeedback::Sync));
    // thermostat 3 + fan 4 + vanes 4+4 + switches 1+1
    assert_eq!(sink.raised.len(), 17);
    assert_eq!(sink.count_for(CharacteristicId::TargetHeatingCoolingState), 1);
    assert_eq!(sink.count_for(CharacteristicId::VaneVertTargetTilt), 1);
    assert_eq!(sink.count_for(CharacteristicId::ModeDryOn), 1);
}

#[test]
fn room_temperature_event_notifies_current_temperature_only() {
    let mut svc = running_service();
    let hvac = SimulatedHvac::connected();
    let mut sink = RecordingSink::new();

    let fb = svc.handle_event(HvacEvent::RoomTempChanged, &hvac, &mut sink);
    assert_eq!(fb, Some(LedFeedback::Room));
    assert_eq!(
        sink.raised,
        vec![(ServiceId::Thermostat, CharacteristicId::CurrentTemperature)]
    );
}

#[test]
fn operating_change_notifies_current_state_only() {
    let mut svc = running_service();
    let hvac = SimulatedHvac::connected();
    let mut sink = RecordingSink::new();

    svc.handle_event(HvacEvent::OperatingChanged, &hvac, &mut sink);
    assert_eq!(
        sink.raised,
        vec![(
            ServiceId::Thermostat,
            CharacteristicId::CurrentHeatingCoolingState
        )]
    );
}

#[test]
fn params_set_pulses_the_led_without_notifying() {
    let mut svc = running_service();
    let hvac = SimulatedHvac::connected();
    let mut sink = RecordingSink::new();

    let fb = svc.handle_event(HvacEvent::ParamsSet, &hvac, &mut sink);
    assert_eq!(fb, Some(LedFeedback::Update));
    assert!(sink.raised.is_empty());

    let fb = svc.handle_event(HvacEvent::ParamsNotSet, &hvac, &mut sink);
    assert_eq!(fb, None);
    assert!(sink.raised.is_empty());
}

#[test]
fn serial_debug_events_are_silent() {
    let mut svc = running_service();
    let hvac = SimulatedHvac::connected();
    let mut sink = RecordingSink::new();

    for event in [
        HvacEvent::Initialized,
        HvacEvent::ConnectError,
        HvacEvent::PacketRead,
        HvacEvent::PacketWrite,
        HvacEvent::PacketReadError,
        HvacEvent::Timer,
    ] {
        let fb = svc.handle_event(event, &hvac, &mut sink);
        assert_eq!(fb, None, "{:?}", event);
    }
    assert!(sink.raised.is_empty());
}

#[test]
fn no_notifications_before_the_server_starts() {
    let mut svc = AccessoryService::new();
    let hvac = SimulatedHvac::connected();
    let mut sink = RecordingSink::new();

    // LED feedback still flows — the serial link is alive either way.
    let fb = svc.handle_event(HvacEvent::ParamsChanged, &hvac, &mut sink);
    assert_eq!(fb, Some(LedFeedback::Sync));
    svc.handle_event(HvacEvent::Connected, &hvac, &mut sink);
    svc.handle_event(HvacEvent::RoomTempChanged, &hvac, &mut sink);
    assert!(sink.raised.is_empty());

    svc.set_server_running(true);
    svc.handle_event(HvacEvent::Connected, &hvac, &mut sink);
    assert_eq!(sink.raised.len(), 6);
}

// ── Event queue plumbing ──────────────────────────────────────

#[test]
fn queued_events_drain_into_the_service_in_order() {
    let mut svc = running_service();
    let hvac = SimulatedHvac::connected();
    let mut sink = RecordingSink::new();

    assert!(melhap::events::push_event(HvacEvent::Connected));
    assert!(melhap::events::push_event(HvacEvent::RoomTempChanged));

    let mut feedback = Vec::new();
    melhap::events::drain_events(|event| {
        if let Some(fb) = svc.handle_event(event, &hvac, &mut sink) {
            feedback.push(fb);
        }
    });

    assert_eq!(feedback, vec![LedFeedback::Room]);
    assert_eq!(sink.raised.len(), 7, "6 status-active + 1 current temp");
    assert_eq!(melhap::events::queue_len(), 0);
}

// ── Factory reset ─────────────────────────────────────────────

#[test]
fn factory_reset_purges_the_stored_preference() {
    let mut svc = AccessoryService::new();
    let mut cfg = MemPrefs::with_stored(AccessoryPrefs {
        display_units: TemperatureDisplayUnits::Fahrenheit,
    });

    svc.load_prefs(&cfg);
    assert_eq!(svc.display_units(), TemperatureDisplayUnits::Fahrenheit);

    svc.factory_reset(&mut cfg);
    assert_eq!(svc.display_units(), TemperatureDisplayUnits::Celsius);
    assert!(cfg.stored().is_none());

    // A fresh boot after the reset comes up with defaults.
    let mut svc2 = AccessoryService::new();
    svc2.load_prefs(&cfg);
    assert_eq!(svc2.display_units(), TemperatureDisplayUnits::Celsius);
}
