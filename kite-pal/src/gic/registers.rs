//! GICv2 distributor register definitions
//!
//! Based on the ARM Generic Interrupt Controller Architecture Specification,
//! GIC architecture version 2 (ARM IHI 0048B). Only the registers the IRQ
//! capability paths touch are named; the rest of the 4 KiB frame is
//! reserved padding.

use tock_registers::register_bitfields;
use tock_registers::register_structs;
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};

register_bitfields![u32,
    /// Interrupt Controller Type Register
    pub GICD_TYPER [
        /// Supported interrupt lines: 32 * (N + 1)
        ITLinesNumber OFFSET(0) NUMBITS(5) [],
        /// Implemented CPU interfaces minus one
        CPUNumber OFFSET(5) NUMBITS(3) [],
        /// Security extensions implemented
        SecurityExtn OFFSET(10) NUMBITS(1) []
    ],

    /// Software Generated Interrupt Register
    pub GICD_SGIR [
        /// SGI interrupt ID
        SGIINTID OFFSET(0) NUMBITS(4) [],
        /// Group of the SGI when security extensions are present
        NSATT OFFSET(15) NUMBITS(1) [],
        /// One bit per CPU interface
        CPUTargetList OFFSET(16) NUMBITS(8) [],
        /// How the target list is interpreted
        TargetListFilter OFFSET(24) NUMBITS(2) [
            /// Forward to the interfaces in CPUTargetList
            TargetList = 0,
            /// Forward to every interface except the requester
            AllOthers = 1,
            /// Forward only to the requester
            SelfOnly = 2
        ]
    ]
];

register_structs! {
    /// Distributor register frame.
    pub GicdRegisters {
        (0x000 => pub ctlr: ReadWrite<u32>),
        (0x004 => pub typer: ReadOnly<u32, GICD_TYPER::Register>),
        (0x008 => pub iidr: ReadOnly<u32>),
        (0x00c => _reserved0),
        /// Interrupt processor targets, one byte per interrupt.
        /// Bytes 0..32 are banked and read back the requesting CPU's mask.
        (0x800 => pub itargetsr: [ReadWrite<u8>; 1024]),
        /// Interrupt configuration, two bits per interrupt.
        (0xc00 => pub icfgr: [ReadWrite<u32>; 64]),
        (0xd00 => _reserved1),
        (0xf00 => pub sgir: WriteOnly<u32, GICD_SGIR::Register>),
        (0xf04 => _reserved2),
        (0x1000 => @END),
    }
}

/// ICFGR bit that selects edge sensitivity for `irq`.
#[inline]
pub const fn icfgr_edge_bit(irq: u32) -> (usize, u32) {
    ((irq / 16) as usize, 1 << ((irq % 16) * 2 + 1))
}
