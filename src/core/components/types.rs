use crate::core::errors::CircuitError;
use crate::core::types::IcId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Inclusive range of allowed port counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortBounds {
    pub min: usize,
    pub max: usize,
}

impl PortBounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Bounds that allow exactly one count
    pub const fn fixed(count: usize) -> Self {
        Self {
            min: count,
            max: count,
        }
    }

    pub fn clamp(&self, count: usize) -> usize {
        count.clamp(self.min, self.max)
    }

    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

/// Allowed select-line counts for multiplexers and demultiplexers
pub const SELECT_BOUNDS: PortBounds = PortBounds::new(1, 8);

const GATE_INPUT_BOUNDS: PortBounds = PortBounds::new(2, 8);

/// Discriminant for every kind of component a circuit can hold.
///
/// Type-specific behaviour (port bounds, evaluation, negation) dispatches on
/// this enum instead of on concrete implementation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Switch,
    Button,
    ConstantLow,
    ConstantHigh,
    Led,
    Buf,
    Not,
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Xnor,
    Multiplexer,
    Demultiplexer,
    /// Instance of a reusable IC definition
    Ic(IcId),
}

impl ComponentKind {
    /// Every kind that can be created from a name alone
    pub const NAMED: [ComponentKind; 15] = [
        ComponentKind::Switch,
        ComponentKind::Button,
        ComponentKind::ConstantLow,
        ComponentKind::ConstantHigh,
        ComponentKind::Led,
        ComponentKind::Buf,
        ComponentKind::Not,
        ComponentKind::And,
        ComponentKind::Nand,
        ComponentKind::Or,
        ComponentKind::Nor,
        ComponentKind::Xor,
        ComponentKind::Xnor,
        ComponentKind::Multiplexer,
        ComponentKind::Demultiplexer,
    ];

    /// Identifier used to create this kind by name
    pub fn identifier(&self) -> &'static str {
        match self {
            ComponentKind::Switch => "Switch",
            ComponentKind::Button => "Button",
            ComponentKind::ConstantLow => "ConstantLow",
            ComponentKind::ConstantHigh => "ConstantHigh",
            ComponentKind::Led => "LED",
            ComponentKind::Buf => "BUFGate",
            ComponentKind::Not => "NOTGate",
            ComponentKind::And => "ANDGate",
            ComponentKind::Nand => "NANDGate",
            ComponentKind::Or => "ORGate",
            ComponentKind::Nor => "NORGate",
            ComponentKind::Xor => "XORGate",
            ComponentKind::Xnor => "XNORGate",
            ComponentKind::Multiplexer => "Multiplexer",
            ComponentKind::Demultiplexer => "Demultiplexer",
            ComponentKind::Ic(_) => "IC",
        }
    }

    /// Input port bounds, `None` for ICs whose ports come from their definition
    pub fn input_bounds(&self, select_count: usize) -> Option<PortBounds> {
        let bounds = match self {
            ComponentKind::Switch
            | ComponentKind::Button
            | ComponentKind::ConstantLow
            | ComponentKind::ConstantHigh => PortBounds::fixed(0),
            ComponentKind::Led | ComponentKind::Buf | ComponentKind::Not => PortBounds::fixed(1),
            ComponentKind::And
            | ComponentKind::Nand
            | ComponentKind::Or
            | ComponentKind::Nor
            | ComponentKind::Xor
            | ComponentKind::Xnor => GATE_INPUT_BOUNDS,
            ComponentKind::Multiplexer => PortBounds::fixed((1 << select_count) + select_count),
            ComponentKind::Demultiplexer => PortBounds::fixed(1 + select_count),
            ComponentKind::Ic(_) => return None,
        };
        Some(bounds)
    }

    /// Output port bounds, `None` for ICs
    pub fn output_bounds(&self, select_count: usize) -> Option<PortBounds> {
        let bounds = match self {
            ComponentKind::Led => PortBounds::fixed(0),
            ComponentKind::Demultiplexer => PortBounds::fixed(1 << select_count),
            ComponentKind::Ic(_) => return None,
            _ => PortBounds::fixed(1),
        };
        Some(bounds)
    }

    /// Port counts a freshly created component starts with
    pub fn default_port_counts(&self) -> Option<(usize, usize)> {
        let select = self.default_select_count();
        let inputs = self.input_bounds(select)?.min;
        let outputs = self.output_bounds(select)?.min;
        Some((inputs, outputs))
    }

    pub fn default_select_count(&self) -> usize {
        if self.is_mux_family() {
            SELECT_BOUNDS.min
        } else {
            0
        }
    }

    /// Negated counterpart of a gate (AND <-> NAND, OR <-> NOR, XOR <-> XNOR, BUF <-> NOT)
    pub fn negated(&self) -> Option<ComponentKind> {
        match self {
            ComponentKind::And => Some(ComponentKind::Nand),
            ComponentKind::Nand => Some(ComponentKind::And),
            ComponentKind::Or => Some(ComponentKind::Nor),
            ComponentKind::Nor => Some(ComponentKind::Or),
            ComponentKind::Xor => Some(ComponentKind::Xnor),
            ComponentKind::Xnor => Some(ComponentKind::Xor),
            ComponentKind::Buf => Some(ComponentKind::Not),
            ComponentKind::Not => Some(ComponentKind::Buf),
            _ => None,
        }
    }

    /// Gates that fuse with a following NOT
    pub fn is_fusable_gate(&self) -> bool {
        matches!(
            self,
            ComponentKind::And | ComponentKind::Or | ComponentKind::Xor
        )
    }

    pub fn is_mux_family(&self) -> bool {
        matches!(
            self,
            ComponentKind::Multiplexer | ComponentKind::Demultiplexer
        )
    }

    /// Components whose output value is internal state rather than a function of inputs
    pub fn is_source(&self) -> bool {
        matches!(
            self,
            ComponentKind::Switch
                | ComponentKind::Button
                | ComponentKind::ConstantLow
                | ComponentKind::ConstantHigh
        )
    }

    /// Sources a user can toggle, which become IC boundary inputs
    pub fn is_interactive_input(&self) -> bool {
        matches!(self, ComponentKind::Switch | ComponentKind::Button)
    }

    pub fn is_sink(&self) -> bool {
        matches!(self, ComponentKind::Led)
    }

    /// Compute output values from input values.
    ///
    /// `current` holds the present outputs and is returned unchanged for
    /// sources. ICs are evaluated by their instance, not here.
    pub fn evaluate(&self, inputs: &[bool], select_count: usize, current: &[bool]) -> Vec<bool> {
        match self {
            ComponentKind::Switch | ComponentKind::Button => current.to_vec(),
            ComponentKind::ConstantLow => vec![false],
            ComponentKind::ConstantHigh => vec![true],
            ComponentKind::Led => Vec::new(),
            ComponentKind::Buf => vec![inputs.first().copied().unwrap_or(false)],
            ComponentKind::Not => vec![!inputs.first().copied().unwrap_or(false)],
            ComponentKind::And => vec![inputs.iter().all(|v| *v)],
            ComponentKind::Nand => vec![!inputs.iter().all(|v| *v)],
            ComponentKind::Or => vec![inputs.iter().any(|v| *v)],
            ComponentKind::Nor => vec![!inputs.iter().any(|v| *v)],
            ComponentKind::Xor => vec![inputs.iter().filter(|v| **v).count() % 2 == 1],
            ComponentKind::Xnor => vec![inputs.iter().filter(|v| **v).count() % 2 == 0],
            ComponentKind::Multiplexer => {
                let data_count = 1 << select_count;
                let selected = select_value(&inputs[data_count.min(inputs.len())..]);
                vec![inputs.get(selected).copied().unwrap_or(false)]
            }
            ComponentKind::Demultiplexer => {
                let data = inputs.first().copied().unwrap_or(false);
                let selected = select_value(inputs.get(1..).unwrap_or(&[]));
                (0..(1usize << select_count))
                    .map(|i| data && i == selected)
                    .collect()
            }
            ComponentKind::Ic(_) => current.to_vec(),
        }
    }
}

/// Interpret select lines as a little-endian binary number
fn select_value(select_lines: &[bool]) -> usize {
    select_lines
        .iter()
        .enumerate()
        .filter(|(_, on)| **on)
        .fold(0, |acc, (bit, _)| acc | (1 << bit))
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentKind::Ic(id) => write!(f, "{}", id),
            other => write!(f, "{}", other.identifier()),
        }
    }
}

impl FromStr for ComponentKind {
    type Err = CircuitError;

    /// Resolve a component kind from its identifier (case-insensitive, with
    /// or without the `Gate` suffix)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let trimmed = wanted.strip_suffix("gate").unwrap_or(&wanted);
        Self::NAMED
            .iter()
            .find(|kind| {
                let id = kind.identifier().to_ascii_lowercase();
                id == wanted || id.strip_suffix("gate") == Some(trimmed)
            })
            .copied()
            .or(match trimmed {
                "mux" => Some(ComponentKind::Multiplexer),
                "demux" => Some(ComponentKind::Demultiplexer),
                _ => None,
            })
            .ok_or_else(|| {
                CircuitError::InvalidReplacement(format!(
                    "Supplied replacement id \"{}\" is invalid",
                    s
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identifiers() {
        assert_eq!("ANDGate".parse::<ComponentKind>().unwrap(), ComponentKind::And);
        assert_eq!("nand".parse::<ComponentKind>().unwrap(), ComponentKind::Nand);
        assert_eq!("LED".parse::<ComponentKind>().unwrap(), ComponentKind::Led);
        assert_eq!("mux".parse::<ComponentKind>().unwrap(), ComponentKind::Multiplexer);
        let err = "FluxCapacitor".parse::<ComponentKind>().unwrap_err();
        assert!(matches!(err, CircuitError::InvalidReplacement(_)));
    }

    #[test]
    fn test_gate_evaluation() {
        assert_eq!(ComponentKind::And.evaluate(&[true, true], 0, &[false]), vec![true]);
        assert_eq!(ComponentKind::Nand.evaluate(&[true, true], 0, &[false]), vec![false]);
        assert_eq!(ComponentKind::Xor.evaluate(&[true, true, true], 0, &[false]), vec![true]);
        assert_eq!(ComponentKind::Nor.evaluate(&[false, false], 0, &[false]), vec![true]);
        assert_eq!(ComponentKind::Not.evaluate(&[false], 0, &[false]), vec![true]);
    }

    #[test]
    fn test_mux_evaluation() {
        // 2 select lines: data 0..4, selects at 4 and 5; select = 0b10 -> data 2
        let inputs = [false, false, true, false, false, true];
        assert_eq!(ComponentKind::Multiplexer.evaluate(&inputs, 2, &[false]), vec![true]);

        let outputs = ComponentKind::Demultiplexer.evaluate(&[true, true], 1, &[false, false]);
        assert_eq!(outputs, vec![false, true]);
    }

    #[test]
    fn test_mux_bounds_follow_select_count() {
        assert_eq!(ComponentKind::Multiplexer.input_bounds(2), Some(PortBounds::fixed(6)));
        assert_eq!(ComponentKind::Demultiplexer.output_bounds(3), Some(PortBounds::fixed(8)));
        assert_eq!(ComponentKind::And.input_bounds(0).unwrap().clamp(20), 8);
    }

    #[test]
    fn test_negation_pairs() {
        for kind in [ComponentKind::And, ComponentKind::Or, ComponentKind::Xor] {
            let negated = kind.negated().unwrap();
            assert_eq!(negated.negated(), Some(kind));
            assert!(kind.is_fusable_gate());
            assert!(!negated.is_fusable_gate());
        }
        assert_eq!(ComponentKind::Led.negated(), None);
    }
}
