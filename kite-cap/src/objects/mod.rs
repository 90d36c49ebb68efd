//! Capability object types
//!
//! Kernel object metadata that capabilities refer to. The interrupt control
//! subsystem only needs the interrupt identity model; CNodes are described
//! in [`crate::cnode`].

pub mod irq;

pub use irq::{
    CoreId, IrqClass, IrqIdentity, IrqNumber, IrqState, MAX_IRQ, MAX_NODES, NUM_PRIVATE_IRQS,
    NUM_SGIS, SPI_BASE, Trigger,
};
