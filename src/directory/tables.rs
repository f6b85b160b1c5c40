//! Static NRPN address tables for the LS9-32
//!
//! Addresses are the 14-bit controller numbers the console transmits in the
//! first two packets of an NRPN group.

/// Channel, bus and stereo input on/off switches
pub const ON_OFF: &[(&str, u16)] = &[
    ("CH01", 0x1B0B), ("CH02", 0x1B8B), ("CH03", 0x1C0B), ("CH04", 0x1C8B),
    ("CH05", 0x1D0B), ("CH06", 0x1D8B), ("CH07", 0x1E0B), ("CH08", 0x1E8B),
    ("CH09", 0x1F0B), ("CH10", 0x1F8B), ("CH11", 0x200B), ("CH12", 0x208B),
    ("CH13", 0x210B), ("CH14", 0x218B), ("CH15", 0x220B), ("CH16", 0x228B),
    ("CH17", 0x230B), ("CH18", 0x238B), ("CH19", 0x240B), ("CH20", 0x248B),
    ("CH21", 0x250B), ("CH22", 0x258B), ("CH23", 0x260B), ("CH24", 0x268B),
    ("CH25", 0x270B), ("CH26", 0x278B), ("CH27", 0x280B), ("CH28", 0x288B),
    ("CH29", 0x290B), ("CH30", 0x298B), ("CH31", 0x2A0B), ("CH32", 0x2A8B),
    ("CH33", 0x2B0B), ("CH34", 0x2B8B), ("CH35", 0x2C0B), ("CH36", 0x2C8B),
    ("CH37", 0x2D0B), ("CH38", 0x2D8B), ("CH39", 0x2E0B), ("CH40", 0x2E8B),
    ("CH41", 0x2F0B), ("CH42", 0x2F8B), ("CH43", 0x300B), ("CH44", 0x308B),
    ("CH45", 0x310B), ("CH46", 0x318B), ("CH47", 0x320B), ("CH48", 0x328B),
    ("CH49", 0x370B), ("CH50", 0x378B), ("CH51", 0x380B), ("CH52", 0x388B),
    ("CH53", 0x390B), ("CH54", 0x398B), ("CH55", 0x3A0B), ("CH56", 0x3A8B),
    ("CH57", 0x3B0B), ("CH58", 0x3B8B), ("CH59", 0x3C0B), ("CH60", 0x3C8B),
    ("CH61", 0x3D0B), ("CH62", 0x3D8B), ("CH63", 0x3E0B), ("CH64", 0x3E8B),
    ("MIX1", 0x0B0C), ("MIX2", 0x0B8C), ("MIX3", 0x0C0C), ("MIX4", 0x0C8C),
    ("MIX5", 0x0D0C), ("MIX6", 0x0D8C), ("MIX7", 0x0E0C), ("MIX8", 0x0E8C),
    ("MIX9", 0x0F0C), ("MIX10", 0x0F8C), ("MIX11", 0x100C), ("MIX12", 0x108C),
    ("MIX13", 0x110C), ("MIX14", 0x118C), ("MIX15", 0x120C), ("MIX16", 0x128C),
    ("MT1", 0x150C), ("MT2", 0x158C), ("MT3", 0x160C), ("MT4", 0x168C),
    ("MT5", 0x170C), ("MT6", 0x178C), ("MT7", 0x180C), ("MT8", 0x188C),
    ("ST-IN1", 0x338B), ("ST-IN2", 0x340B), ("ST-IN3", 0x350B), ("ST-IN4", 0x360B),
    ("ST LR", 0x190C), ("MONO", 0x1758),
];

/// Channel, bus and stereo input fader levels
pub const FADER: &[(&str, u16)] = &[
    ("CH01", 0x0000), ("CH02", 0x0080), ("CH03", 0x0100), ("CH04", 0x0180),
    ("CH05", 0x0200), ("CH06", 0x0280), ("CH07", 0x0300), ("CH08", 0x0380),
    ("CH09", 0x0400), ("CH10", 0x0480), ("CH11", 0x0500), ("CH12", 0x0580),
    ("CH13", 0x0600), ("CH14", 0x0680), ("CH15", 0x0700), ("CH16", 0x0780),
    ("CH17", 0x0800), ("CH18", 0x0880), ("CH19", 0x0900), ("CH20", 0x0980),
    ("CH21", 0x0A00), ("CH22", 0x0A80), ("CH23", 0x0B00), ("CH24", 0x0B80),
    ("CH25", 0x0C00), ("CH26", 0x0C80), ("CH27", 0x0D00), ("CH28", 0x0D80),
    ("CH29", 0x0E00), ("CH30", 0x0E80), ("CH31", 0x0F00), ("CH32", 0x0F80),
    ("CH33", 0x1000), ("CH34", 0x1080), ("CH35", 0x1100), ("CH36", 0x1180),
    ("CH37", 0x1200), ("CH38", 0x1280), ("CH39", 0x1300), ("CH40", 0x1380),
    ("CH41", 0x1400), ("CH42", 0x1480), ("CH43", 0x1500), ("CH44", 0x1580),
    ("CH45", 0x1600), ("CH46", 0x1680), ("CH47", 0x1700), ("CH48", 0x1780),
    ("CH49", 0x1C00), ("CH50", 0x1C80), ("CH51", 0x1D00), ("CH52", 0x1D80),
    ("CH53", 0x1E00), ("CH54", 0x1E80), ("CH55", 0x1F00), ("CH56", 0x1F80),
    ("CH57", 0x2000), ("CH58", 0x2080), ("CH59", 0x2100), ("CH60", 0x2180),
    ("CH61", 0x2200), ("CH62", 0x2280), ("CH63", 0x2300), ("CH64", 0x2380),
    ("MIX1", 0x3000), ("MIX2", 0x3080), ("MIX3", 0x3100), ("MIX4", 0x3180),
    ("MIX5", 0x3200), ("MIX6", 0x3280), ("MIX7", 0x3300), ("MIX8", 0x3380),
    ("MIX9", 0x3400), ("MIX10", 0x3480), ("MIX11", 0x3500), ("MIX12", 0x3580),
    ("MIX13", 0x3600), ("MIX14", 0x3680), ("MIX15", 0x3700), ("MIX16", 0x3780),
    ("MT1", 0x3A00), ("MT2", 0x3A80), ("MT3", 0x3B00), ("MT4", 0x3B80),
    ("MT5", 0x3C00), ("MT6", 0x3C80), ("MT7", 0x3D00), ("MT8", 0x3D80),
    ("ST-IN1", 0x1880), ("ST-IN2", 0x1900), ("ST-IN3", 0x1A00), ("ST-IN4", 0x1B00),
    ("ST LR", 0x3E00), ("MONO", 0x3451),
];

/// Per-channel send level to MIX1/MIX2 when the console is in sends-on-fader mode
pub const MIX1_SEND_ON_FADER: &[(&str, u16)] = &[
    ("CH01", 0x3551), ("CH02", 0x35D1), ("CH03", 0x3651), ("CH04", 0x36D1),
    ("CH05", 0x3751), ("CH06", 0x37D1), ("CH07", 0x3851), ("CH08", 0x38D1),
    ("CH09", 0x3951), ("CH10", 0x39D1), ("CH11", 0x3A51), ("CH12", 0x3AD1),
    ("CH13", 0x3B51), ("CH14", 0x3BD1), ("CH15", 0x3C51), ("CH16", 0x3CD1),
    ("CH17", 0x3D51), ("CH18", 0x3DD1), ("CH19", 0x3E51), ("CH20", 0x3ED1),
    ("CH21", 0x3F51), ("CH22", 0x3FD1), ("CH23", 0x0052), ("CH24", 0x00D2),
    ("CH25", 0x0152), ("CH26", 0x01D2), ("CH27", 0x0252), ("CH28", 0x02D2),
    ("CH29", 0x0352), ("CH30", 0x03D2), ("CH31", 0x0452), ("CH32", 0x04D2),
    ("CH33", 0x0552), ("CH34", 0x05D2), ("CH35", 0x0652), ("CH36", 0x06D2),
    ("CH37", 0x0752), ("CH38", 0x07D2), ("CH39", 0x0852), ("CH40", 0x08D2),
    ("CH41", 0x0952), ("CH42", 0x09D2), ("CH43", 0x0A52), ("CH44", 0x0AD2),
    ("CH45", 0x0B52), ("CH46", 0x0BD2), ("CH47", 0x0C52), ("CH48", 0x0CD2),
    ("CH49", 0x1152), ("CH50", 0x11D2), ("CH51", 0x1252), ("CH52", 0x12D2),
    ("CH53", 0x1352), ("CH54", 0x13D2), ("CH55", 0x1452), ("CH56", 0x14D2),
    ("CH57", 0x2521), ("CH58", 0x25A1), ("CH59", 0x2621), ("CH60", 0x26A1),
    ("CH61", 0x2721), ("CH62", 0x27A1), ("CH63", 0x2821), ("CH64", 0x28A1),
];
