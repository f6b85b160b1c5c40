//! Tests for the automation engine

use super::*;
use crate::config::AppConfig;
use proptest::prelude::*;

const ON: u16 = 0x3FFF;
const OFF: u16 = 0x0000;
const UNITY: u16 = 0x3370;
const NEG_INF: u16 = 0x0000;

fn directory() -> Arc<ControllerDirectory> {
    Arc::new(ControllerDirectory::new().unwrap())
}

fn engine() -> AutomationEngine {
    let config = AppConfig::default();
    AutomationEngine::new(directory(), config.levels, &config.routing)
}

fn on_off(name: &str) -> u16 {
    directory()
        .resolve_address(ControlClass::OnOff, name)
        .unwrap()
}

fn fader(name: &str) -> u16 {
    directory()
        .resolve_address(ControlClass::Fader, name)
        .unwrap()
}

fn send(name: &str) -> u16 {
    directory()
        .resolve_address(ControlClass::SendOnFader, name)
        .unwrap()
}

fn switch(name: &str, value: u16) -> NrpnMessage {
    NrpnMessage::new(on_off(name), value)
}

fn level(name: &str, value: u16) -> NrpnMessage {
    NrpnMessage::new(fader(name), value)
}

#[test]
fn test_duplicate_on_turns_partner_off() {
    let mut engine = engine();
    assert_eq!(engine.process(switch("CH05", ON)), vec![switch("CH37", OFF)]);
}

#[test]
fn test_duplicate_off_turns_partner_on() {
    let mut engine = engine();
    assert_eq!(engine.process(switch("CH37", OFF)), vec![switch("CH05", ON)]);
    assert_eq!(engine.process(switch("CH10", OFF)), vec![switch("CH42", ON)]);
}

#[test]
fn test_wireless_on_closes_other_roles() {
    let mut engine = engine();
    for triple in roles::WIRELESS_TRIPLES.iter() {
        for (pressed, others) in [
            (triple.mc, [triple.chr, triple.lead]),
            (triple.lead, [triple.chr, triple.mc]),
            (triple.chr, [triple.mc, triple.lead]),
        ] {
            let commands = engine.process(switch(pressed, ON));
            assert_eq!(
                commands,
                vec![switch(others[0], OFF), switch(others[1], OFF)],
                "{} ON",
                pressed
            );
        }
    }
}

#[test]
fn test_wireless_off_returns_to_mc() {
    let mut engine = engine();
    assert_eq!(
        engine.process(switch("CH43", OFF)),
        vec![switch("CH11", ON), switch("CH47", OFF)]
    );
    assert_eq!(
        engine.process(switch("CH48", OFF)),
        vec![switch("CH12", ON), switch("CH44", OFF)]
    );
}

#[test]
fn test_wireless_mc_off_promotes_mc() {
    let mut engine = engine();
    assert_eq!(
        engine.process(switch("CH12", OFF)),
        vec![switch("CH12", ON), switch("CH48", OFF), switch("CH44", OFF)]
    );
}

#[test]
fn test_talkback_engage() {
    let mut engine = engine();
    let commands = engine.process(switch("ST-IN4", ON));

    assert_eq!(
        commands,
        vec![
            switch("CH13", OFF),
            switch("CH14", OFF),
            switch("CH45", OFF),
            switch("CH46", OFF),
            switch("CH49", OFF),
            switch("CH50", OFF),
        ]
    );
    assert!(engine.talkback_override());
}

#[test]
fn test_talkback_reverts_roles_and_skips_cycle() {
    let mut engine = engine();
    engine.process(switch("ST-IN4", ON));

    assert_eq!(engine.process(switch("CH13", ON)), vec![switch("CH13", OFF)]);
    assert_eq!(engine.process(switch("CH50", ON)), vec![switch("CH50", OFF)]);
    assert!(engine.process(switch("CH45", OFF)).is_empty());

    // Receivers 1 and 2 keep cycling
    assert_eq!(
        engine.process(switch("CH11", ON)),
        vec![switch("CH47", OFF), switch("CH43", OFF)]
    );
}

#[test]
fn test_talkback_release_restores_mc() {
    let mut engine = engine();
    engine.process(switch("ST-IN4", ON));
    let commands = engine.process(switch("ST-IN4", OFF));

    assert_eq!(
        commands,
        vec![
            switch("CH13", ON),
            switch("CH14", ON),
            switch("CH45", OFF),
            switch("CH46", OFF),
            switch("CH49", OFF),
            switch("CH50", OFF),
        ]
    );
    assert!(!engine.talkback_override());

    // Cycle is live again
    assert_eq!(
        engine.process(switch("CH45", ON)),
        vec![switch("CH49", OFF), switch("CH13", OFF)]
    );
}

#[test]
fn test_bus_linkage() {
    let mut engine = engine();
    assert_eq!(engine.process(switch("MIX1", ON)), vec![switch("ST LR", ON)]);
    assert_eq!(engine.process(switch("MIX2", ON)), vec![switch("ST LR", ON)]);
    assert!(engine.process(switch("MIX2", OFF)).is_empty());
    assert_eq!(engine.process(switch("ST LR", OFF)), vec![switch("MIX1", OFF)]);
    assert!(engine.process(switch("ST LR", ON)).is_empty());
}

#[test]
fn test_aux_routing_swaps_send_pair() {
    let mut engine = engine();

    assert_eq!(
        engine.process(switch("ST-IN1", ON)),
        vec![
            NrpnMessage::new(0x068A, UNITY),
            NrpnMessage::new(0x3757, NEG_INF),
        ]
    );
    assert_eq!(
        engine.process(switch("ST-IN1", OFF)),
        vec![
            NrpnMessage::new(0x068A, NEG_INF),
            NrpnMessage::new(0x3757, UNITY),
        ]
    );
    assert_eq!(
        engine.process(switch("ST-IN2", ON)),
        vec![
            NrpnMessage::new(0x118A, UNITY),
            NrpnMessage::new(0x140A, NEG_INF),
        ]
    );
    assert!(!engine.talkback_override());
}

#[test]
fn test_talkback_input_is_configurable() {
    let mut config = AppConfig::default();
    for route in &mut config.routing.aux {
        route.talkback = route.input == "ST-IN3";
    }
    let mut engine = AutomationEngine::new(directory(), config.levels, &config.routing);

    assert!(engine.process(switch("ST-IN4", ON)).is_empty());
    assert!(!engine.talkback_override());

    let commands = engine.process(switch("ST-IN3", ON));
    assert_eq!(commands.len(), 8);
    assert!(engine.talkback_override());
}

#[test]
fn test_talkback_held_until_last_input_released() {
    let mut config = AppConfig::default();
    for route in &mut config.routing.aux {
        route.talkback = route.input == "ST-IN3" || route.input == "ST-IN4";
    }
    let mut engine = AutomationEngine::new(directory(), config.levels, &config.routing);

    // Route pair plus the six receiver strips
    assert_eq!(engine.process(switch("ST-IN3", ON)).len(), 8);
    assert_eq!(engine.process(switch("ST-IN4", ON)).len(), 6);

    // ST-IN4 still holds talkback, only the ST-IN3 route pair moves
    assert_eq!(
        engine.process(switch("ST-IN3", OFF)),
        vec![
            NrpnMessage::new(0x3D57, NEG_INF),
            NrpnMessage::new(0x1F0A, UNITY),
        ]
    );
    assert!(engine.talkback_override());
    assert_eq!(engine.process(switch("CH14", ON)), vec![switch("CH14", OFF)]);

    assert_eq!(
        engine.process(switch("ST-IN4", OFF)),
        vec![
            switch("CH13", ON),
            switch("CH14", ON),
            switch("CH45", OFF),
            switch("CH46", OFF),
            switch("CH49", OFF),
            switch("CH50", OFF),
        ]
    );
    assert!(!engine.talkback_override());
}

#[test]
fn test_hysteresis_edges() {
    let mut engine = engine();
    assert_eq!(engine.latch("CH05"), Some(Latch::Off));

    // Bring the latch up first
    assert_eq!(
        engine.process(level("CH05", UNITY)),
        vec![
            NrpnMessage::new(send("CH05"), UNITY),
            NrpnMessage::new(send("CH37"), UNITY),
        ]
    );
    assert_eq!(engine.latch("CH05"), Some(Latch::On));

    let below = engine.process(level("CH05", 0x0100));
    let below_again = engine.process(level("CH05", 0x0050));
    let above = engine.process(level("CH05", 0x1000));

    assert_eq!(
        below,
        vec![
            NrpnMessage::new(send("CH05"), NEG_INF),
            NrpnMessage::new(send("CH37"), NEG_INF),
        ]
    );
    assert!(below_again.is_empty());
    assert_eq!(above.len(), 2);
    assert!(above.iter().all(|cmd| cmd.value == UNITY));
}

#[test]
fn test_hysteresis_dead_band() {
    let mut engine = engine();
    engine.process(level("CH02", 0x2000));

    // Between -60 dB and -50 dB nothing moves
    assert!(engine.process(level("CH02", 0x0900)).is_empty());
    assert!(engine.process(level("CH02", 0x07B0)).is_empty());
    assert_eq!(engine.latch("CH02"), Some(Latch::On));
}

#[test]
fn test_fader_outside_band_channels_is_ignored() {
    let mut engine = engine();
    assert!(engine.process(level("CH20", 0x0000)).is_empty());
    assert!(engine.process(level("CH37", 0x3000)).is_empty());
    assert_eq!(engine.latch("CH20"), None);
}

#[test]
fn test_ignored_events() {
    let mut engine = engine();
    // Not an exact ON/OFF value
    assert!(engine.process(switch("CH05", 0x2000)).is_empty());
    // Unknown controller
    assert!(engine.process(NrpnMessage::new(0x0829, 0x1234)).is_empty());
    // Send-on-fader moves are observed only
    assert!(engine.process(NrpnMessage::new(send("CH05"), 0)).is_empty());
}

fn roles_of(receiver: usize) -> [&'static str; 3] {
    let triple = &roles::WIRELESS_TRIPLES[receiver];
    [triple.mc, triple.lead, triple.chr]
}

proptest! {
    #[test]
    fn prop_wireless_never_opens_two_roles(
        receiver in 0usize..2,
        presses in proptest::collection::vec((0usize..3, any::<bool>()), 1..40),
    ) {
        let mut engine = engine();
        let names = roles_of(receiver);
        let addresses = names.map(on_off);
        let mut open = [false; 3];

        for (role, pressed_on) in presses {
            open[role] = pressed_on;
            let commands = engine.process(switch(names[role], if pressed_on { ON } else { OFF }));

            for cmd in commands {
                if let Some(i) = addresses.iter().position(|a| *a == cmd.address) {
                    open[i] = cmd.value == ON;
                }
            }
            prop_assert!(open.iter().filter(|o| **o).count() <= 1, "{:?}", open);
        }
    }

    #[test]
    fn prop_latch_follows_last_out_of_band_level(
        levels in proptest::collection::vec(0u16..=0x3FFF, 0..40),
    ) {
        let mut engine = engine();
        let mut expected = Latch::Off;

        for value in levels {
            engine.process(level("CH07", value));
            if value < 0x07B0 {
                expected = Latch::Off;
            } else if value > 0x0AD0 {
                expected = Latch::On;
            }
        }

        prop_assert_eq!(engine.latch("CH07"), Some(expected));
    }
}
