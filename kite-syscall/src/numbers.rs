//! Invocation labels
//!
//! The label is the discriminator carried in the message-info word of an
//! object invocation. Which labels an object accepts depends on the
//! capability being invoked.

/// Object invocation labels.
#[repr(u64)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvocationLabel {
    // === IRQControl ===
    /// Issue an IRQHandler without trigger configuration.
    ///
    /// Args: irq, dest index, dest depth. Extra cap: dest CNode.
    IrqIssueIrqHandler = 1,
    /// Issue an IRQHandler and program its trigger mode.
    ///
    /// Args: irq, trigger, dest index, dest depth. Extra cap: dest CNode.
    IrqIssueIrqHandlerTrigger = 2,
    /// Issue an IRQHandler bound to a specific core (SMP builds).
    ///
    /// Args: irq, trigger, dest index, dest depth, target core.
    /// Extra cap: dest CNode.
    IrqIssueIrqHandlerTriggerCore = 3,
    /// Issue an SGI-Signal capability (single-core builds).
    ///
    /// Args: sgi, target, dest index, dest depth. Extra cap: dest CNode.
    IrqIssueSgiSignal = 4,
    /// Hand a shared interrupt off to another CPU interface (multikernel builds).
    ///
    /// Args: irq, target interface.
    IrqSetIrqTargetCore = 5,

    // === SGISignal ===
    /// Emit the software-generated interrupt named by the capability.
    SgiSignalGenerate = 6,
}

impl InvocationLabel {
    /// Convert from a raw label value.
    pub const fn from_raw(label: u64) -> Option<Self> {
        match label {
            1 => Some(Self::IrqIssueIrqHandler),
            2 => Some(Self::IrqIssueIrqHandlerTrigger),
            3 => Some(Self::IrqIssueIrqHandlerTriggerCore),
            4 => Some(Self::IrqIssueSgiSignal),
            5 => Some(Self::IrqSetIrqTargetCore),
            6 => Some(Self::SgiSignalGenerate),
            _ => None,
        }
    }

    /// The raw label value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self as u64
    }

    /// Get the label name for logging.
    pub const fn name(self) -> &'static str {
        match self {
            Self::IrqIssueIrqHandler => "IRQIssueIRQHandler",
            Self::IrqIssueIrqHandlerTrigger => "IRQIssueIRQHandlerTrigger",
            Self::IrqIssueIrqHandlerTriggerCore => "IRQIssueIRQHandlerTriggerCore",
            Self::IrqIssueSgiSignal => "IRQIssueSGISignal",
            Self::IrqSetIrqTargetCore => "IRQSetIRQTargetCore",
            Self::SgiSignalGenerate => "SGISignalGenerate",
        }
    }
}
