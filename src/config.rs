//! Configuration management for LS9 automation
//!
//! Every section has defaults taken from the converged console settings, so
//! running without a YAML file is valid. A file only needs the keys it
//! overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tokio::fs;

use crate::directory::{ControlClass, ControllerDirectory};
use crate::midi::MAX_14BIT;
use crate::nrpn::NrpnProtocol;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub midi: MidiConfig,
    #[serde(default)]
    pub protocol: NrpnProtocol,
    #[serde(default)]
    pub assembler: AssemblerConfig,
    #[serde(default)]
    pub levels: LevelConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
}

/// MIDI port configuration
///
/// Ports are picked by list index ("0") or case-insensitive name substring.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MidiConfig {
    #[serde(default = "default_port")]
    pub input_port: String,
    #[serde(default = "default_port")]
    pub output_port: String,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            input_port: default_port(),
            output_port: default_port(),
        }
    }
}

/// Frame assembler timing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssemblerConfig {
    /// Poll period of the idle tick
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Idle polls tolerated with a partial group buffered
    #[serde(default = "default_timeout_ticks")]
    pub timeout_ticks: u32,
}

impl AssemblerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            timeout_ticks: default_timeout_ticks(),
        }
    }
}

/// 14-bit values the console uses for switches and levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LevelConfig {
    #[serde(default = "default_on_value")]
    pub on_value: u16,
    #[serde(default = "default_off_value")]
    pub off_value: u16,
    /// 0 dB send level
    #[serde(default = "default_unity")]
    pub unity: u16,
    /// -inf send level
    #[serde(default = "default_neg_inf")]
    pub neg_inf: u16,
    /// Fader level under which sends are muted (-60 dB)
    #[serde(default = "default_low_threshold")]
    pub low_threshold: u16,
    /// Fader level over which sends are restored (-50 dB)
    #[serde(default = "default_high_threshold")]
    pub high_threshold: u16,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            on_value: default_on_value(),
            off_value: default_off_value(),
            unity: default_unity(),
            neg_inf: default_neg_inf(),
            low_threshold: default_low_threshold(),
            high_threshold: default_high_threshold(),
        }
    }
}

/// Stereo-input driven routing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RoutingConfig {
    #[serde(default = "default_aux_routes")]
    pub aux: Vec<AuxRoute>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            aux: default_aux_routes(),
        }
    }
}

/// One stereo input used as a routing switch
///
/// Switching the input ON brings `target_send` to 0 dB and pulls
/// `alternate_send` to -inf; OFF does the reverse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuxRoute {
    /// On/off directory name of the input ("ST-IN1")
    pub input: String,
    #[serde(default)]
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_send: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_send: Option<u16>,
    /// Input doubles as the wireless talkback switch
    #[serde(default)]
    pub talkback: bool,
}

/// Remote fader bridge (USB keyboard to matrix sends)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BridgeConfig {
    #[serde(default = "default_bridge_listen")]
    pub listen: String,
    /// Console value a CC value of 127 maps to
    #[serde(default = "default_full_scale")]
    pub full_scale: u16,
    #[serde(default = "default_bridge_controls")]
    pub controls: Vec<BridgeControl>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            listen: default_bridge_listen(),
            full_scale: default_full_scale(),
            controls: default_bridge_controls(),
        }
    }
}

/// Keyboard CC number bound to a console address
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BridgeControl {
    pub cc: u8,
    #[serde(default)]
    pub label: String,
    pub address: u16,
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML config: {}", path))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` when given, otherwise use built-in defaults
    pub async fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path).await,
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        if self.midi.input_port.trim().is_empty() {
            anyhow::bail!("MIDI input_port cannot be empty");
        }
        if self.midi.output_port.trim().is_empty() {
            anyhow::bail!("MIDI output_port cannot be empty");
        }

        if self.protocol.status & 0x80 == 0 {
            anyhow::bail!(
                "Protocol status 0x{:02X} is not a MIDI status byte",
                self.protocol.status
            );
        }
        for marker in self.protocol.markers {
            if marker > 0x7F {
                anyhow::bail!("Protocol marker 0x{:02X} exceeds 7 bits", marker);
            }
        }
        let unique_markers: HashSet<u8> = self.protocol.markers.iter().copied().collect();
        if unique_markers.len() != self.protocol.markers.len() {
            anyhow::bail!("Protocol markers must be distinct");
        }

        if self.assembler.poll_interval_ms == 0 {
            anyhow::bail!("Assembler poll_interval_ms must be greater than 0");
        }

        self.validate_levels()?;
        self.validate_routing()?;
        self.validate_bridge()?;

        Ok(())
    }

    fn validate_levels(&self) -> Result<()> {
        let levels = &self.levels;
        for (key, value) in [
            ("on_value", levels.on_value),
            ("off_value", levels.off_value),
            ("unity", levels.unity),
            ("neg_inf", levels.neg_inf),
            ("low_threshold", levels.low_threshold),
            ("high_threshold", levels.high_threshold),
        ] {
            check_14bit(&format!("levels.{}", key), value)?;
        }

        if levels.on_value == levels.off_value {
            anyhow::bail!("levels.on_value and levels.off_value must differ");
        }
        if levels.low_threshold >= levels.high_threshold {
            anyhow::bail!(
                "levels.low_threshold (0x{:04X}) must be below levels.high_threshold (0x{:04X})",
                levels.low_threshold,
                levels.high_threshold
            );
        }

        Ok(())
    }

    fn validate_routing(&self) -> Result<()> {
        let directory =
            ControllerDirectory::new().context("Controller directory failed to build")?;
        let mut seen = HashSet::new();

        for route in &self.routing.aux {
            if directory
                .resolve_address(ControlClass::OnOff, &route.input)
                .is_none()
            {
                anyhow::bail!("Aux route input '{}' is not an on/off control", route.input);
            }
            if !seen.insert(route.input.as_str()) {
                anyhow::bail!("Aux route input '{}' is listed twice", route.input);
            }
            if let Some(send) = route.target_send {
                check_14bit(&format!("routing '{}' target_send", route.input), send)?;
            }
            if let Some(send) = route.alternate_send {
                check_14bit(&format!("routing '{}' alternate_send", route.input), send)?;
            }
        }

        Ok(())
    }

    fn validate_bridge(&self) -> Result<()> {
        check_14bit("bridge.full_scale", self.bridge.full_scale)?;

        let mut seen = HashSet::new();
        for control in &self.bridge.controls {
            if control.cc > 127 {
                anyhow::bail!("Bridge control has invalid CC number {} (must be 0-127)", control.cc);
            }
            if !seen.insert(control.cc) {
                anyhow::bail!("Bridge CC {} is mapped twice", control.cc);
            }
            check_14bit(&format!("bridge CC {} address", control.cc), control.address)?;
        }

        Ok(())
    }
}

fn check_14bit(key: &str, value: u16) -> Result<()> {
    if value > MAX_14BIT {
        anyhow::bail!("{} 0x{:04X} exceeds 14 bits (max 0x3FFF)", key, value);
    }
    Ok(())
}

fn default_port() -> String { "0".to_string() }
fn default_poll_interval_ms() -> u64 { 5 }
fn default_timeout_ticks() -> u32 { 20 }
fn default_on_value() -> u16 { 0x3FFF }
fn default_off_value() -> u16 { 0x0000 }
fn default_unity() -> u16 { 0x3370 }
fn default_neg_inf() -> u16 { 0x0000 }
fn default_low_threshold() -> u16 { 0x07B0 }
fn default_high_threshold() -> u16 { 0x0AD0 }
fn default_bridge_listen() -> String { "127.0.0.1:8001".to_string() }
fn default_full_scale() -> u16 { MAX_14BIT }

fn default_aux_routes() -> Vec<AuxRoute> {
    let route = |input: &str, label: &str, target: Option<u16>, alternate: Option<u16>| AuxRoute {
        input: input.to_string(),
        label: label.to_string(),
        target_send: target,
        alternate_send: alternate,
        talkback: false,
    };

    vec![
        // MIX16 -> MT1 (basement) vs MONO -> MT1
        route("ST-IN1", "PC IN2 -> BASMNT", Some(0x068A), Some(0x3757)),
        // MIX16 -> MT2 (lobby) vs ST LR -> MT2
        route("ST-IN2", "PC IN2 -> LOBBY", Some(0x118A), Some(0x140A)),
        // MONO -> MT3 (lounge) vs ST LR -> MT3
        route("ST-IN3", "MONO -> LOUNGE", Some(0x3D57), Some(0x1F0A)),
        AuxRoute {
            talkback: true,
            ..route("ST-IN4", "WLTBK 3 & 4", None, None)
        },
    ]
}

fn default_bridge_controls() -> Vec<BridgeControl> {
    vec![
        BridgeControl {
            cc: 77,
            label: "MT5".to_string(),
            address: 0x3C00,
        },
        BridgeControl {
            cc: 87,
            label: "MT6".to_string(),
            address: 0x3C80,
        },
    ]
}
