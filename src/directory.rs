//! Controller directory for the LS9 NRPN address space
//!
//! Maps symbolic control names ("CH05", "MIX1", "ST LR") to 14-bit NRPN
//! addresses, one bijective table per operation class. Inbound addresses are
//! classified by trying the tables in a fixed priority order.

mod tables;

use std::collections::HashMap;
use std::fmt;

use crate::error::DirectoryError;
use crate::midi::MAX_14BIT;

/// Operation class of an NRPN address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlClass {
    /// Channel/bus on-off switches
    OnOff,
    /// Channel/bus fader levels
    Fader,
    /// Per-channel MIX1/MIX2 send level in sends-on-fader mode
    SendOnFader,
}

impl ControlClass {
    /// Fader tables are tried before on/off because the address spaces of
    /// unrelated tables are allowed to overlap.
    pub const CLASSIFY_ORDER: [ControlClass; 3] = [
        ControlClass::Fader,
        ControlClass::SendOnFader,
        ControlClass::OnOff,
    ];
}

impl fmt::Display for ControlClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlClass::OnOff => write!(f, "on/off"),
            ControlClass::Fader => write!(f, "fader"),
            ControlClass::SendOnFader => write!(f, "sends-on-fader"),
        }
    }
}

/// Result of classifying an inbound address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classified {
    OnOff(&'static str),
    Fader(&'static str),
    SendOnFader(&'static str),
    /// Not a control this system automates
    Unrecognized,
}

impl Classified {
    fn known(class: ControlClass, name: &'static str) -> Self {
        match class {
            ControlClass::OnOff => Classified::OnOff(name),
            ControlClass::Fader => Classified::Fader(name),
            ControlClass::SendOnFader => Classified::SendOnFader(name),
        }
    }
}

/// Name <-> address table built from one list of pairs
#[derive(Debug, Clone)]
pub struct BiMap {
    forward: HashMap<&'static str, u16>,
    backward: HashMap<u16, &'static str>,
}

impl BiMap {
    /// Build both directions, rejecting duplicate names, shared addresses
    /// and addresses wider than 14 bits.
    pub fn from_pairs(
        class: ControlClass,
        pairs: &[(&'static str, u16)],
    ) -> Result<Self, DirectoryError> {
        let mut forward = HashMap::with_capacity(pairs.len());
        let mut backward = HashMap::with_capacity(pairs.len());

        for &(name, address) in pairs {
            if address > MAX_14BIT {
                return Err(DirectoryError::AddressOutOfRange {
                    class,
                    name,
                    address,
                });
            }
            if forward.insert(name, address).is_some() {
                return Err(DirectoryError::DuplicateName { class, name });
            }
            if let Some(first) = backward.insert(address, name) {
                return Err(DirectoryError::DuplicateAddress {
                    class,
                    address,
                    first,
                    second: name,
                });
            }
        }

        Ok(Self { forward, backward })
    }

    pub fn forward(&self, name: &str) -> Option<u16> {
        self.forward.get(name).copied()
    }

    pub fn backward(&self, address: u16) -> Option<&'static str> {
        self.backward.get(&address).copied()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// All (name, address) pairs, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u16)> + '_ {
        self.forward.iter().map(|(name, address)| (*name, *address))
    }
}

/// All controller tables of the console
#[derive(Debug, Clone)]
pub struct ControllerDirectory {
    on_off: BiMap,
    fader: BiMap,
    send_on_fader: BiMap,
}

impl ControllerDirectory {
    /// Build the LS9-32 directory. Fails only if the static tables are
    /// inconsistent, so callers should treat an error as fatal at startup.
    pub fn new() -> Result<Self, DirectoryError> {
        Ok(Self {
            on_off: BiMap::from_pairs(ControlClass::OnOff, tables::ON_OFF)?,
            fader: BiMap::from_pairs(ControlClass::Fader, tables::FADER)?,
            send_on_fader: BiMap::from_pairs(ControlClass::SendOnFader, tables::MIX1_SEND_ON_FADER)?,
        })
    }

    pub fn table(&self, class: ControlClass) -> &BiMap {
        match class {
            ControlClass::OnOff => &self.on_off,
            ControlClass::Fader => &self.fader,
            ControlClass::SendOnFader => &self.send_on_fader,
        }
    }

    pub fn resolve_address(&self, class: ControlClass, name: &str) -> Option<u16> {
        self.table(class).forward(name)
    }

    pub fn resolve_name(&self, class: ControlClass, address: u16) -> Option<&'static str> {
        self.table(class).backward(address)
    }

    /// Classify an inbound address; the first table in priority order wins
    pub fn classify(&self, address: u16) -> Classified {
        ControlClass::CLASSIFY_ORDER
            .iter()
            .find_map(|class| {
                self.resolve_name(*class, address)
                    .map(|name| Classified::known(*class, name))
            })
            .unwrap_or(Classified::Unrecognized)
    }

    /// Best-effort label for an address in logs and the console tool
    pub fn describe(&self, address: u16) -> String {
        match self.classify(address) {
            Classified::OnOff(name) => format!("{} on/off", name),
            Classified::Fader(name) => format!("{} fader", name),
            Classified::SendOnFader(name) => format!("{} MIX1/2 send", name),
            Classified::Unrecognized => format!("0x{:04X}", address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> ControllerDirectory {
        ControllerDirectory::new().expect("static tables are bijective")
    }

    #[test]
    fn test_every_table_round_trips() {
        let db = directory();
        for class in ControlClass::CLASSIFY_ORDER {
            let table = db.table(class);
            assert!(!table.is_empty());
            for (name, address) in table.iter() {
                assert_eq!(db.resolve_address(class, name), Some(address));
                assert_eq!(db.resolve_name(class, address), Some(name));
            }
        }
    }

    #[test]
    fn test_table_sizes() {
        let db = directory();
        // 64 channels, 16 mixes, 8 matrices, 4 stereo inputs, ST LR, MONO
        assert_eq!(db.table(ControlClass::OnOff).len(), 94);
        assert_eq!(db.table(ControlClass::Fader).len(), 94);
        assert_eq!(db.table(ControlClass::SendOnFader).len(), 64);
    }

    #[test]
    fn test_known_addresses() {
        let db = directory();
        assert_eq!(db.resolve_address(ControlClass::OnOff, "CH05"), Some(0x1D0B));
        assert_eq!(db.resolve_address(ControlClass::OnOff, "ST LR"), Some(0x190C));
        assert_eq!(db.resolve_address(ControlClass::Fader, "MT5"), Some(0x3C00));
        assert_eq!(db.resolve_address(ControlClass::SendOnFader, "CH37"), Some(0x0752));
    }

    #[test]
    fn test_lookup_misses_fail_closed() {
        let db = directory();
        assert_eq!(db.resolve_address(ControlClass::OnOff, "CH65"), None);
        assert_eq!(db.resolve_address(ControlClass::SendOnFader, "MIX1"), None);
        assert_eq!(db.resolve_name(ControlClass::OnOff, 0x0001), None);
    }

    #[test]
    fn test_classify() {
        let db = directory();
        assert_eq!(db.classify(0x1D0B), Classified::OnOff("CH05"));
        assert_eq!(db.classify(0x0200), Classified::Fader("CH05"));
        assert_eq!(db.classify(0x3751), Classified::SendOnFader("CH05"));
        // TABLA1 PEQ band, a control this system does not automate
        assert_eq!(db.classify(0x0829), Classified::Unrecognized);
    }

    #[test]
    fn test_bimap_rejects_duplicate_address() {
        let err = BiMap::from_pairs(ControlClass::OnOff, &[("A", 1), ("B", 1)]).unwrap_err();
        assert_eq!(
            err,
            DirectoryError::DuplicateAddress {
                class: ControlClass::OnOff,
                address: 1,
                first: "A",
                second: "B",
            }
        );
    }

    #[test]
    fn test_bimap_rejects_duplicate_name() {
        let err = BiMap::from_pairs(ControlClass::Fader, &[("A", 1), ("A", 2)]).unwrap_err();
        assert_eq!(
            err,
            DirectoryError::DuplicateName {
                class: ControlClass::Fader,
                name: "A",
            }
        );
    }

    #[test]
    fn test_bimap_rejects_wide_address() {
        let err = BiMap::from_pairs(ControlClass::Fader, &[("A", 0x4000)]).unwrap_err();
        assert!(matches!(err, DirectoryError::AddressOutOfRange { .. }));
    }
}
