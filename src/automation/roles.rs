//! Static channel relations of the LS9-32 patch
//!
//! Inputs 1-10 are the band. Each is patched twice: CH01-CH10 feed the FOH
//! mix and CH33-CH42 feed the in-ear mixes, so exactly one of each pair is on.
//!
//! The four wireless receivers are each patched to three strips, one per
//! role the singer can have on stage: MC (CH11-CH14), LEAD (CH43-CH46) and
//! CHR (CH47-CH50). Only one strip of a receiver is open at a time.

/// (FOH channel, in-ear duplicate)
pub const DUPLICATE_PAIRS: [(&str, &str); 10] = [
    ("CH01", "CH33"),
    ("CH02", "CH34"),
    ("CH03", "CH35"),
    ("CH04", "CH36"),
    ("CH05", "CH37"),
    ("CH06", "CH38"),
    ("CH07", "CH39"),
    ("CH08", "CH40"),
    ("CH09", "CH41"),
    ("CH10", "CH42"),
];

/// Role of a strip within a wireless triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Mc,
    Lead,
    Chr,
}

/// The three strips fed by one wireless receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WirelessTriple {
    pub receiver: u8,
    pub mc: &'static str,
    pub lead: &'static str,
    pub chr: &'static str,
    /// Receiver is muted by the talkback switch
    pub talkback: bool,
}

impl WirelessTriple {
    pub fn role_of(&self, name: &str) -> Option<Role> {
        if name == self.mc {
            Some(Role::Mc)
        } else if name == self.lead {
            Some(Role::Lead)
        } else if name == self.chr {
            Some(Role::Chr)
        } else {
            None
        }
    }
}

pub static WIRELESS_TRIPLES: [WirelessTriple; 4] = [
    WirelessTriple { receiver: 1, mc: "CH11", lead: "CH43", chr: "CH47", talkback: false },
    WirelessTriple { receiver: 2, mc: "CH12", lead: "CH44", chr: "CH48", talkback: false },
    WirelessTriple { receiver: 3, mc: "CH13", lead: "CH45", chr: "CH49", talkback: true },
    WirelessTriple { receiver: 4, mc: "CH14", lead: "CH46", chr: "CH50", talkback: true },
];

/// Buses that bring the main mix up with them
pub const LINKED_SEND_BUSES: [&str; 2] = ["MIX1", "MIX2"];

pub const MASTER_BUS: &str = "ST LR";

/// Bus switched off together with the main mix
pub const MASTER_OFF_FOLLOWER: &str = "MIX1";

/// Duplicate partner of `name` in either direction
pub fn duplicate_of(name: &str) -> Option<&'static str> {
    DUPLICATE_PAIRS.iter().find_map(|&(foh, iem)| {
        if name == foh {
            Some(iem)
        } else if name == iem {
            Some(foh)
        } else {
            None
        }
    })
}

/// Triple containing `name`, with the strip's role in it
pub fn wireless_role(name: &str) -> Option<(&'static WirelessTriple, Role)> {
    WIRELESS_TRIPLES
        .iter()
        .find_map(|triple| triple.role_of(name).map(|role| (triple, role)))
}

/// In-ear duplicate of a hysteresis channel (CH01-CH10 only)
pub fn lead_pair(name: &str) -> Option<&'static str> {
    DUPLICATE_PAIRS
        .iter()
        .find(|(foh, _)| *foh == name)
        .map(|&(_, iem)| iem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{ControlClass, ControllerDirectory};

    #[test]
    fn test_role_names_exist_in_directory() {
        let db = ControllerDirectory::new().unwrap();
        let names = DUPLICATE_PAIRS
            .iter()
            .flat_map(|(a, b)| [*a, *b])
            .chain(WIRELESS_TRIPLES.iter().flat_map(|t| [t.mc, t.lead, t.chr]))
            .chain(LINKED_SEND_BUSES)
            .chain([MASTER_BUS, MASTER_OFF_FOLLOWER]);

        for name in names {
            assert!(
                db.resolve_address(ControlClass::OnOff, name).is_some(),
                "{} missing",
                name
            );
        }
    }

    #[test]
    fn test_wireless_layout() {
        for (n, triple) in (1u8..).zip(WIRELESS_TRIPLES.iter()) {
            assert_eq!(triple.receiver, n);
            assert_eq!(triple.mc, format!("CH{:02}", 10 + n));
            assert_eq!(triple.lead, format!("CH{:02}", 42 + n));
            assert_eq!(triple.chr, format!("CH{:02}", 46 + n));
        }
    }

    #[test]
    fn test_duplicate_lookup_both_ways() {
        assert_eq!(duplicate_of("CH05"), Some("CH37"));
        assert_eq!(duplicate_of("CH37"), Some("CH05"));
        assert_eq!(duplicate_of("CH11"), None);
        assert_eq!(lead_pair("CH10"), Some("CH42"));
        assert_eq!(lead_pair("CH42"), None);
    }

    #[test]
    fn test_wireless_role_lookup() {
        let (triple, role) = wireless_role("CH49").unwrap();
        assert_eq!(triple.receiver, 3);
        assert_eq!(role, Role::Chr);
        assert!(wireless_role("CH51").is_none());
    }
}
