//! Interrupt subsystem configuration
//!
//! The build topology decides which IRQControl operations exist:
//!
//! | Topology | Handler issue | Per-core handler | SGI signal | Retarget |
//! |----------|---------------|------------------|------------|----------|
//! | Uniprocessor | yes | no | yes | no |
//! | Smp | yes | yes | no | no |
//! | Multikernel | yes | no | yes | yes |
//!
//! A multikernel instance runs one kernel per core, so each instance is
//! itself uniprocessor and has exactly one node.

use core::fmt;

use kite_cap::objects::irq::MAX_NODES;
use kite_pal::PlatformInfo;
use kite_syscall::InvocationLabel;

/// Kernel build topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    /// One core, one kernel.
    Uniprocessor,
    /// One kernel spanning several cores.
    Smp,
    /// One kernel instance per core sharing a distributor.
    Multikernel,
}

impl Topology {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uniprocessor => "uniprocessor",
            Self::Smp => "smp",
            Self::Multikernel => "multikernel",
        }
    }
}

/// Configuration errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_nodes` was zero.
    NoNodes,
    /// `max_nodes` exceeds [`MAX_NODES`].
    TooManyNodes(usize),
    /// A non-SMP topology was given more than one node.
    NodesWithoutSmp(usize),
    /// More nodes than the interrupt controller has CPU interfaces.
    NodesExceedInterfaces { nodes: usize, interfaces: u8 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNodes => write!(f, "at least one node is required"),
            Self::TooManyNodes(n) => write!(f, "{} nodes requested, at most {} supported", n, MAX_NODES),
            Self::NodesWithoutSmp(n) => write!(f, "{} nodes requested without SMP", n),
            Self::NodesExceedInterfaces { nodes, interfaces } => write!(
                f,
                "{} nodes requested, controller has {} CPU interfaces",
                nodes, interfaces
            ),
        }
    }
}

/// Validated interrupt subsystem configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IrqConfig {
    topology: Topology,
    max_nodes: usize,
}

impl IrqConfig {
    pub const fn new(topology: Topology, max_nodes: usize) -> Result<Self, ConfigError> {
        if max_nodes == 0 {
            return Err(ConfigError::NoNodes);
        }
        if max_nodes > MAX_NODES {
            return Err(ConfigError::TooManyNodes(max_nodes));
        }
        if max_nodes > 1 && !matches!(topology, Topology::Smp) {
            return Err(ConfigError::NodesWithoutSmp(max_nodes));
        }
        Ok(Self { topology, max_nodes })
    }

    /// Single-core configuration.
    pub const fn uniprocessor() -> Self {
        Self {
            topology: Topology::Uniprocessor,
            max_nodes: 1,
        }
    }

    /// Per-instance configuration of a multikernel build.
    pub const fn multikernel() -> Self {
        Self {
            topology: Topology::Multikernel,
            max_nodes: 1,
        }
    }

    /// SMP configuration with `nodes` cores.
    pub const fn smp(nodes: usize) -> Result<Self, ConfigError> {
        Self::new(Topology::Smp, nodes)
    }

    /// Check that every node can be routed to on `info`'s controller.
    pub const fn check_platform(&self, info: &PlatformInfo) -> Result<(), ConfigError> {
        if self.max_nodes > info.cpu_interfaces as usize {
            return Err(ConfigError::NodesExceedInterfaces {
                nodes: self.max_nodes,
                interfaces: info.cpu_interfaces,
            });
        }
        Ok(())
    }

    #[inline]
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// Number of cores handlers can be bound to.
    #[inline]
    pub const fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    #[inline]
    pub const fn is_smp(&self) -> bool {
        matches!(self.topology, Topology::Smp)
    }

    /// Whether an IRQControl invocation with `label` exists in this build.
    pub const fn irq_control_label_enabled(&self, label: InvocationLabel) -> bool {
        match label {
            InvocationLabel::IrqIssueIrqHandler | InvocationLabel::IrqIssueIrqHandlerTrigger => {
                true
            }
            InvocationLabel::IrqIssueIrqHandlerTriggerCore => self.is_smp(),
            InvocationLabel::IrqIssueSgiSignal => !self.is_smp(),
            InvocationLabel::IrqSetIrqTargetCore => {
                matches!(self.topology, Topology::Multikernel)
            }
            InvocationLabel::SgiSignalGenerate => false,
        }
    }
}

impl Default for IrqConfig {
    fn default() -> Self {
        Self::uniprocessor()
    }
}
