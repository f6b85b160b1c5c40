//! Automation engine
//!
//! Consumes decoded console events and returns the commands that keep the
//! patch consistent: duplicate channels stay opposite, wireless receivers
//! keep one role open, buses follow each other, stereo inputs act as routing
//! switches and faders on the band channels mute their monitor sends when
//! pulled all the way down.
//!
//! The engine owns all automation state and never fails. Events that match
//! no rule produce no commands.

pub mod roles;

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{AuxRoute, LevelConfig, RoutingConfig};
use crate::directory::{Classified, ControlClass, ControllerDirectory};
use crate::nrpn::NrpnMessage;

use roles::{Role, WirelessTriple};

/// Logical state of an on/off switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    On,
    Off,
}

impl SwitchState {
    fn opposite(self) -> Self {
        match self {
            SwitchState::On => SwitchState::Off,
            SwitchState::Off => SwitchState::On,
        }
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchState::On => write!(f, "ON"),
            SwitchState::Off => write!(f, "OFF"),
        }
    }
}

/// Mute latch of a hysteresis channel's monitor sends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Latch {
    /// Sends at 0 dB
    On,
    /// Sends at -inf
    Off,
}

/// Rule engine with its owned state
pub struct AutomationEngine {
    directory: Arc<ControllerDirectory>,
    levels: LevelConfig,
    aux_routes: HashMap<String, AuxRoute>,
    channel_latch: HashMap<&'static str, Latch>,
    /// Talkback inputs currently switched ON
    talkback_inputs: HashSet<String>,
}

impl AutomationEngine {
    pub fn new(
        directory: Arc<ControllerDirectory>,
        levels: LevelConfig,
        routing: &RoutingConfig,
    ) -> Self {
        let aux_routes = routing
            .aux
            .iter()
            .map(|route| (route.input.clone(), route.clone()))
            .collect();

        let channel_latch = roles::DUPLICATE_PAIRS
            .iter()
            .map(|&(channel, _)| (channel, Latch::Off))
            .collect();

        Self {
            directory,
            levels,
            aux_routes,
            channel_latch,
            talkback_inputs: HashSet::new(),
        }
    }

    pub fn talkback_override(&self) -> bool {
        !self.talkback_inputs.is_empty()
    }

    pub fn latch(&self, channel: &str) -> Option<Latch> {
        self.channel_latch.get(channel).copied()
    }

    /// Apply every rule to one event; commands come back in send order
    pub fn process(&mut self, event: NrpnMessage) -> Vec<NrpnMessage> {
        let mut out = Vec::new();

        match self.directory.classify(event.address) {
            Classified::OnOff(name) => match self.switch_state(event.value) {
                Some(state) => {
                    debug!("MIXER IN: {} switched {}", name, state);
                    self.on_switch(name, state, &mut out);
                }
                None => debug!(
                    "MIXER IN: {} on/off value 0x{:04X} is neither ON nor OFF",
                    name, event.value
                ),
            },
            Classified::Fader(name) => {
                debug!("MIXER IN: {} fader at 0x{:04X}", name, event.value);
                self.on_fader(name, event.value, &mut out);
            }
            Classified::SendOnFader(name) => {
                debug!("MIXER IN: {} MIX1/2 send at 0x{:04X}", name, event.value);
            }
            Classified::Unrecognized => {
                debug!("MIXER IN: unhandled controller {}", event);
            }
        }

        out
    }

    fn switch_state(&self, value: u16) -> Option<SwitchState> {
        if value == self.levels.on_value {
            Some(SwitchState::On)
        } else if value == self.levels.off_value {
            Some(SwitchState::Off)
        } else {
            None
        }
    }

    fn on_switch(&mut self, name: &'static str, state: SwitchState, out: &mut Vec<NrpnMessage>) {
        if let Some(partner) = roles::duplicate_of(name) {
            self.switch(partner, state.opposite(), out);
        }

        if let Some((triple, role)) = roles::wireless_role(name) {
            self.cycle_wireless(triple, role, name, state, out);
        }

        if state == SwitchState::On && roles::LINKED_SEND_BUSES.contains(&name) {
            self.switch(roles::MASTER_BUS, SwitchState::On, out);
        }
        if state == SwitchState::Off && name == roles::MASTER_BUS {
            self.switch(roles::MASTER_OFF_FOLLOWER, SwitchState::Off, out);
        }

        if let Some(route) = self.aux_routes.get(name).cloned() {
            self.route_aux(&route, state, out);
        }
    }

    fn cycle_wireless(
        &self,
        triple: &WirelessTriple,
        role: Role,
        name: &'static str,
        state: SwitchState,
        out: &mut Vec<NrpnMessage>,
    ) {
        if triple.talkback && self.talkback_override() {
            // Talkback owns these strips until it is released
            if state == SwitchState::On {
                info!("Talkback active, reverting {}", name);
                self.switch(name, SwitchState::Off, out);
            }
            return;
        }

        let off = SwitchState::Off;
        match (role, state) {
            (Role::Mc, SwitchState::On) => {
                self.switch(triple.chr, off, out);
                self.switch(triple.lead, off, out);
            }
            (Role::Lead, SwitchState::On) => {
                self.switch(triple.chr, off, out);
                self.switch(triple.mc, off, out);
            }
            (Role::Chr, SwitchState::On) => {
                self.switch(triple.mc, off, out);
                self.switch(triple.lead, off, out);
            }
            (_, SwitchState::Off) => {
                // Back to the idle MC role, every other role closed
                self.switch(triple.mc, SwitchState::On, out);
                for other in [triple.chr, triple.lead] {
                    if other != name {
                        self.switch(other, off, out);
                    }
                }
            }
        }
    }

    fn route_aux(&mut self, route: &AuxRoute, state: SwitchState, out: &mut Vec<NrpnMessage>) {
        let (unity, neg_inf) = (self.levels.unity, self.levels.neg_inf);

        match state {
            SwitchState::On => {
                info!("Routing {}: {} engaged", route.input, route.label);
                self.send_level(route.target_send, unity, out);
                self.send_level(route.alternate_send, neg_inf, out);
            }
            SwitchState::Off => {
                info!("Routing {}: {} released", route.input, route.label);
                self.send_level(route.target_send, neg_inf, out);
                self.send_level(route.alternate_send, unity, out);
            }
        }

        if route.talkback {
            match state {
                SwitchState::On => {
                    self.talkback_inputs.insert(route.input.clone());
                    self.set_talkback(true, out);
                }
                SwitchState::Off => {
                    self.talkback_inputs.remove(&route.input);
                    if self.talkback_inputs.is_empty() {
                        self.set_talkback(false, out);
                    } else {
                        info!(
                            "Wireless talkback still held by {:?}",
                            self.talkback_inputs
                        );
                    }
                }
            }
        }
    }

    /// Engage or release talkback on the designated receivers.
    ///
    /// Engaging closes every strip of those receivers. Releasing reopens the
    /// MC strips (idle role) and keeps LEAD and CHR closed.
    fn set_talkback(&self, engaged: bool, out: &mut Vec<NrpnMessage>) {
        info!(
            "Wireless talkback {}",
            if engaged { "engaged" } else { "released" }
        );

        let mc_state = if engaged { SwitchState::Off } else { SwitchState::On };
        let talkback_triples = || roles::WIRELESS_TRIPLES.iter().filter(|t| t.talkback);

        for triple in talkback_triples() {
            self.switch(triple.mc, mc_state, out);
        }
        for triple in talkback_triples() {
            self.switch(triple.lead, SwitchState::Off, out);
        }
        for triple in talkback_triples() {
            self.switch(triple.chr, SwitchState::Off, out);
        }
    }

    fn on_fader(&mut self, name: &'static str, level: u16, out: &mut Vec<NrpnMessage>) {
        let Some(current) = self.latch(name) else {
            return;
        };

        let next = if level < self.levels.low_threshold {
            Latch::Off
        } else if level > self.levels.high_threshold {
            Latch::On
        } else {
            return;
        };
        if next == current {
            return;
        }

        self.channel_latch.insert(name, next);
        let send_level = match next {
            Latch::On => self.levels.unity,
            Latch::Off => self.levels.neg_inf,
        };

        for channel in std::iter::once(name).chain(roles::lead_pair(name)) {
            match self
                .directory
                .resolve_address(ControlClass::SendOnFader, channel)
            {
                Some(address) => {
                    info!(
                        "MIDI OUT: {} MIX1/2 send {}",
                        channel,
                        if next == Latch::On { "0 dB" } else { "-inf" }
                    );
                    out.push(NrpnMessage::new(address, send_level));
                }
                None => debug!("No sends-on-fader controller for {}", channel),
            }
        }
    }

    fn switch(&self, name: &str, state: SwitchState, out: &mut Vec<NrpnMessage>) {
        let value = match state {
            SwitchState::On => self.levels.on_value,
            SwitchState::Off => self.levels.off_value,
        };

        match self.directory.resolve_address(ControlClass::OnOff, name) {
            Some(address) => {
                info!("MIDI OUT: {} {}", name, state);
                out.push(NrpnMessage::new(address, value));
            }
            None => debug!("No on/off controller for {}", name),
        }
    }

    fn send_level(&self, address: Option<u16>, level: u16, out: &mut Vec<NrpnMessage>) {
        if let Some(address) = address {
            info!("MIDI OUT: {} -> 0x{:04X}", self.directory.describe(address), level);
            out.push(NrpnMessage::new(address, level));
        }
    }
}
