use super::ic::{IcDefinition, IcInstance};
use super::types::{ComponentKind, PortBounds};
use crate::core::errors::{CircuitError, Result};
use crate::core::types::{ComponentId, Position, WireId};

const BASE_SIZE: f32 = 50.0;
const PORT_SPACING: f32 = 25.0;
const PORT_LENGTH: f32 = 20.0;

/// Input side of a component: at most one wire, value mirrors that wire
#[derive(Debug, Clone, Default)]
pub struct InputPort {
    pub(crate) wire: Option<WireId>,
    pub(crate) value: bool,
}

impl InputPort {
    pub fn wire(&self) -> Option<WireId> {
        self.wire
    }

    pub fn value(&self) -> bool {
        self.value
    }
}

/// Output side of a component: drives any number of wires
#[derive(Debug, Clone, Default)]
pub struct OutputPort {
    pub(crate) wires: Vec<WireId>,
    pub(crate) value: bool,
}

impl OutputPort {
    pub fn wires(&self) -> &[WireId] {
        &self.wires
    }

    pub fn value(&self) -> bool {
        self.value
    }
}

/// A placed circuit element with indexed ports and internal state
#[derive(Debug, Clone)]
pub struct Component {
    pub(crate) id: ComponentId,
    pub(crate) kind: ComponentKind,
    pub(crate) name: Option<String>,
    pub(crate) position: Position,
    pub(crate) angle: f32,
    pub(crate) select_count: usize,
    pub(crate) inputs: Vec<InputPort>,
    pub(crate) outputs: Vec<OutputPort>,
    pub(crate) ic: Option<Box<IcInstance>>,
}

impl Component {
    /// Create a component of a named kind with default port counts.
    ///
    /// Outputs start out evaluated from all-low inputs, so a fresh NOT gate
    /// drives high.
    pub fn new(id: ComponentId, kind: ComponentKind) -> Result<Self> {
        let (input_count, output_count) = kind.default_port_counts().ok_or_else(|| {
            CircuitError::InvalidReplacement(format!(
                "{} needs its IC definition to be created",
                kind
            ))
        })?;

        let mut component = Self {
            id,
            kind,
            name: None,
            position: Position::default(),
            angle: 0.0,
            select_count: kind.default_select_count(),
            inputs: vec![InputPort::default(); input_count],
            outputs: vec![OutputPort::default(); output_count],
            ic: None,
        };
        component.settle_outputs();
        Ok(component)
    }

    /// Create an instance of an IC definition
    pub fn from_ic(id: ComponentId, definition: &IcDefinition) -> Self {
        let instance = IcInstance::new(definition);
        let mut component = Self {
            id,
            kind: ComponentKind::Ic(definition.id()),
            name: Some(definition.name().to_string()),
            position: Position::default(),
            angle: 0.0,
            select_count: 0,
            inputs: vec![InputPort::default(); definition.input_count()],
            outputs: vec![OutputPort::default(); definition.output_count()],
            ic: Some(Box::new(instance)),
        };
        component.settle_outputs();
        component
    }

    /// Copy this component under a new ID with no wiring attached
    pub fn duplicate(&self, id: ComponentId) -> Self {
        let mut copy = self.clone();
        copy.id = id;
        for port in &mut copy.inputs {
            *port = InputPort::default();
        }
        for port in &mut copy.outputs {
            port.wires.clear();
        }
        copy.settle_outputs();
        copy
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Builder-style name assignment
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn select_count(&self) -> usize {
        self.select_count
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    pub fn inputs(&self) -> &[InputPort] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputPort] {
        &self.outputs
    }

    pub fn input_value(&self, index: usize) -> Option<bool> {
        self.inputs.get(index).map(|port| port.value)
    }

    pub fn output_value(&self, index: usize) -> Option<bool> {
        self.outputs.get(index).map(|port| port.value)
    }

    pub fn input_bounds(&self) -> PortBounds {
        self.kind
            .input_bounds(self.select_count)
            .unwrap_or(PortBounds::fixed(self.inputs.len()))
    }

    pub fn output_bounds(&self) -> PortBounds {
        self.kind
            .output_bounds(self.select_count)
            .unwrap_or(PortBounds::fixed(self.outputs.len()))
    }

    /// Every wire attached to this component, inputs first, in port order.
    ///
    /// A wire looping back into this component is listed once.
    pub fn attached_wires(&self) -> Vec<WireId> {
        let mut wires: Vec<WireId> = self.inputs.iter().filter_map(|port| port.wire).collect();
        for wire in self.outputs.iter().flat_map(|port| port.wires.iter().copied()) {
            if !wires.contains(&wire) {
                wires.push(wire);
            }
        }
        wires
    }

    pub fn is_wired(&self) -> bool {
        self.inputs.iter().any(|port| port.wire.is_some())
            || self.outputs.iter().any(|port| !port.wires.is_empty())
    }

    /// Number of input ports needed to keep every wired input: highest wired index + 1
    pub fn inputs_in_use(&self) -> usize {
        self.inputs
            .iter()
            .rposition(|port| port.wire.is_some())
            .map_or(0, |index| index + 1)
    }

    /// Number of output ports needed to keep every wired output
    pub fn outputs_in_use(&self) -> usize {
        self.outputs
            .iter()
            .rposition(|port| !port.wires.is_empty())
            .map_or(0, |index| index + 1)
    }

    /// Recompute output values from the current input values
    pub(crate) fn evaluate(&mut self) -> Vec<bool> {
        let inputs: Vec<bool> = self.inputs.iter().map(|port| port.value).collect();
        match self.ic.as_mut() {
            Some(instance) => instance.evaluate(&inputs),
            None => {
                let current: Vec<bool> = self.outputs.iter().map(|port| port.value).collect();
                self.kind.evaluate(&inputs, self.select_count, &current)
            }
        }
    }

    /// Store freshly evaluated outputs without propagating them
    pub(crate) fn settle_outputs(&mut self) {
        let values = self.evaluate();
        for (port, value) in self.outputs.iter_mut().zip(values) {
            port.value = value;
        }
    }

    /// Resize the input ports. Callers disconnect wires on removed ports first.
    pub(crate) fn resize_inputs(&mut self, count: usize) {
        debug_assert!(self.inputs.iter().skip(count).all(|port| port.wire.is_none()));
        self.inputs.resize_with(count, InputPort::default);
    }

    /// Resize the output ports. Callers disconnect wires on removed ports first.
    pub(crate) fn resize_outputs(&mut self, count: usize) {
        debug_assert!(self.outputs.iter().skip(count).all(|port| port.wires.is_empty()));
        self.outputs.resize_with(count, OutputPort::default);
    }

    /// Width and height of the component body
    pub fn size(&self) -> Position {
        let ports = self.inputs.len().max(self.outputs.len()) as f32;
        Position::new(BASE_SIZE, BASE_SIZE.max(ports * PORT_SPACING))
    }

    /// World position of the tip of an input port
    pub fn input_port_position(&self, index: usize) -> Option<Position> {
        if index >= self.inputs.len() {
            return None;
        }
        let size = self.size();
        let local = Position::new(
            -size.x / 2.0 - PORT_LENGTH,
            port_offset(index, self.inputs.len(), size.y),
        );
        Some(self.position.offset(local.rotated(self.angle)))
    }

    /// World position of the tip of an output port
    pub fn output_port_position(&self, index: usize) -> Option<Position> {
        if index >= self.outputs.len() {
            return None;
        }
        let size = self.size();
        let local = Position::new(
            size.x / 2.0 + PORT_LENGTH,
            port_offset(index, self.outputs.len(), size.y),
        );
        Some(self.position.offset(local.rotated(self.angle)))
    }
}

/// Vertical offset of port `index` out of `count` spread over `height`
fn port_offset(index: usize, count: usize, height: f32) -> f32 {
    let step = height / count as f32;
    -height / 2.0 + step * (index as f32 + 0.5)
}
