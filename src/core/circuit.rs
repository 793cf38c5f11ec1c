use super::components::{Component, ComponentKind, IcDefinition, SELECT_BOUNDS};
use super::connections::{ConnectionValidator, Wire};
use super::errors::{CircuitError, Result};
use super::execution::{PropagationConfig, PropagationEngine, PropagationReport};
use super::types::{ComponentId, InputPortRef, OutputPortRef, Position, WireId};
use log::debug;
use std::collections::BTreeMap;

/// Live ownership container for components and wires.
///
/// Every mutation keeps both ends of a wire consistent: a wire is registered
/// on its output and input port or not at all, and any change to wiring or
/// component state is propagated before the call returns.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    pub(crate) components: BTreeMap<ComponentId, Component>,
    pub(crate) wires: BTreeMap<WireId, Wire>,
    next_component_id: u64,
    next_wire_id: u64,
    config: PropagationConfig,
}

impl Circuit {
    /// Create an empty circuit with default propagation settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty circuit with the given propagation settings
    pub fn with_config(config: PropagationConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }

    fn engine(&self) -> PropagationEngine {
        PropagationEngine::new(self.config)
    }

    /// Reserve a fresh component ID
    pub fn allocate_component_id(&mut self) -> ComponentId {
        let id = ComponentId(self.next_component_id);
        self.next_component_id += 1;
        id
    }

    /// Reserve a fresh wire ID
    pub fn allocate_wire_id(&mut self) -> WireId {
        let id = WireId(self.next_wire_id);
        self.next_wire_id += 1;
        id
    }

    /// Build a component with a fresh ID without placing it
    pub fn create_component(&mut self, kind: ComponentKind) -> Result<Component> {
        // Checked before an ID is reserved
        kind.default_port_counts().ok_or_else(|| {
            CircuitError::InvalidReplacement(format!(
                "{} needs its IC definition to be created",
                kind
            ))
        })?;
        let id = self.allocate_component_id();
        Component::new(id, kind)
    }

    /// Build an IC instance with a fresh ID without placing it
    pub fn create_ic_component(&mut self, definition: &IcDefinition) -> Component {
        let id = self.allocate_component_id();
        Component::from_ic(id, definition)
    }

    /// Create and place a component of the given kind
    pub fn add_component(&mut self, kind: ComponentKind) -> Result<ComponentId> {
        let component = self.create_component(kind)?;
        self.insert_component(component)
    }

    /// Create and place an instance of an IC definition
    pub fn add_ic(&mut self, definition: &IcDefinition) -> Result<ComponentId> {
        let component = self.create_ic_component(definition);
        self.insert_component(component)
    }

    /// Place an already built, unwired component
    pub fn insert_component(&mut self, component: Component) -> Result<ComponentId> {
        let id = component.id();
        if self.components.contains_key(&id) {
            return Err(CircuitError::ActionState(format!(
                "Component {} is already placed",
                id
            )));
        }
        if component.is_wired() {
            return Err(CircuitError::ActionState(format!(
                "Component {} still references wires and cannot be placed",
                id
            )));
        }

        self.next_component_id = self.next_component_id.max(id.0 + 1);
        debug!("Placing {} ({})", id, component.kind());
        self.components.insert(id, component);
        self.engine().refresh(self, id);
        Ok(id)
    }

    /// Remove a component, disconnecting every attached wire first.
    ///
    /// Returns the removed component and the wires that were disconnected.
    pub fn remove_component(&mut self, id: ComponentId) -> Result<(Component, Vec<Wire>)> {
        let attached = self
            .component(id)
            .ok_or_else(|| CircuitError::NotInCircuit(format!("Component {} not found", id)))?
            .attached_wires();

        let mut removed_wires = Vec::with_capacity(attached.len());
        for wire in attached {
            removed_wires.push(self.disconnect(wire)?);
        }

        let component = self
            .components
            .remove(&id)
            .ok_or_else(|| CircuitError::NotInCircuit(format!("Component {} not found", id)))?;
        debug!("Removed {} ({})", id, component.kind());
        Ok((component, removed_wires))
    }

    pub fn contains_component(&self, id: ComponentId) -> bool {
        self.components.contains_key(&id)
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id)
    }

    /// All components in ID order
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn component_ids(&self) -> Vec<ComponentId> {
        self.components.keys().copied().collect()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    fn require_component(&self, id: ComponentId) -> Result<&Component> {
        self.component(id)
            .ok_or_else(|| CircuitError::NotInCircuit(format!("Component {} not found", id)))
    }

    fn require_component_mut(&mut self, id: ComponentId) -> Result<&mut Component> {
        self.components
            .get_mut(&id)
            .ok_or_else(|| CircuitError::NotInCircuit(format!("Component {} not found", id)))
    }

    pub fn set_position(&mut self, id: ComponentId, position: Position) -> Result<()> {
        self.require_component_mut(id)?.position = position;
        Ok(())
    }

    pub fn set_angle(&mut self, id: ComponentId, angle: f32) -> Result<()> {
        self.require_component_mut(id)?.angle = angle;
        Ok(())
    }

    pub fn set_name(&mut self, id: ComponentId, name: impl Into<String>) -> Result<()> {
        self.require_component_mut(id)?.set_name(name);
        Ok(())
    }

    /// Set the number of input ports, clamped to the component's bounds.
    ///
    /// Wires on removed trailing ports are disconnected first and returned.
    pub fn set_input_port_count(&mut self, id: ComponentId, count: usize) -> Result<Vec<Wire>> {
        let component = self.require_component(id)?;
        let target = component.input_bounds().clamp(count);
        let doomed: Vec<WireId> = component
            .inputs
            .iter()
            .skip(target)
            .filter_map(|port| port.wire)
            .collect();

        let removed = self.disconnect_all(doomed)?;
        self.require_component_mut(id)?.resize_inputs(target);
        self.engine().refresh(self, id);
        Ok(removed)
    }

    /// Set the number of output ports, clamped to the component's bounds.
    ///
    /// Wires on removed trailing ports are disconnected first and returned.
    pub fn set_output_port_count(&mut self, id: ComponentId, count: usize) -> Result<Vec<Wire>> {
        let component = self.require_component(id)?;
        let target = component.output_bounds().clamp(count);
        let doomed: Vec<WireId> = component
            .outputs
            .iter()
            .skip(target)
            .flat_map(|port| port.wires.iter().copied())
            .collect();

        let removed = self.disconnect_all(doomed)?;
        self.require_component_mut(id)?.resize_outputs(target);
        self.engine().refresh(self, id);
        Ok(removed)
    }

    /// Set the select-line count of a multiplexer or demultiplexer.
    ///
    /// Both port counts follow the new select count; wires on ports that no
    /// longer exist are disconnected first and returned.
    pub fn set_select_count(&mut self, id: ComponentId, count: usize) -> Result<Vec<Wire>> {
        let component = self.require_component(id)?;
        let kind = component.kind();
        if !kind.is_mux_family() {
            return Err(CircuitError::PortRangeError(format!(
                "Component {} ({}) has no select lines",
                id, kind
            )));
        }

        let select = SELECT_BOUNDS.clamp(count);
        let input_target = kind.input_bounds(select).map_or(0, |bounds| bounds.min);
        let output_target = kind.output_bounds(select).map_or(0, |bounds| bounds.min);
        let doomed: Vec<WireId> = component
            .inputs
            .iter()
            .skip(input_target)
            .filter_map(|port| port.wire)
            .chain(
                component
                    .outputs
                    .iter()
                    .skip(output_target)
                    .flat_map(|port| port.wires.iter().copied()),
            )
            .collect();

        let removed = self.disconnect_all(doomed)?;
        let component = self.require_component_mut(id)?;
        component.select_count = select;
        component.resize_inputs(input_target);
        component.resize_outputs(output_target);
        self.engine().refresh(self, id);
        Ok(removed)
    }

    fn disconnect_all(&mut self, wires: Vec<WireId>) -> Result<Vec<Wire>> {
        wires.into_iter().map(|wire| self.disconnect(wire)).collect()
    }

    /// Connect an output port to an input port with a fresh wire.
    ///
    /// Fails without mutation if the input is occupied, either component is
    /// missing, or a port index is out of range. On success the output's
    /// current value is propagated into the new input.
    pub fn connect(&mut self, source: OutputPortRef, target: InputPortRef) -> Result<WireId> {
        ConnectionValidator::validate_connection(self, &source, &target)?;
        let id = self.allocate_wire_id();
        self.connect_with_id(id, source, target)?;
        Ok(id)
    }

    /// Connect using a known wire ID, as redo and snapshot loading do.
    ///
    /// Returns the report of the propagation pass into the new input.
    pub fn connect_with_id(
        &mut self,
        id: WireId,
        source: OutputPortRef,
        target: InputPortRef,
    ) -> Result<PropagationReport> {
        self.connect_at(id, source, target, None)
    }

    /// Connect using a known wire ID at a given slot of the output's fan-out.
    ///
    /// `None` or a slot past the end appends. Undo uses this to put a wire
    /// back where [`Circuit::detach`] found it, which keeps the order wires
    /// are followed during propagation.
    pub fn connect_at(
        &mut self,
        id: WireId,
        source: OutputPortRef,
        target: InputPortRef,
        slot: Option<usize>,
    ) -> Result<PropagationReport> {
        ConnectionValidator::validate_connection(self, &source, &target)?;
        if self.wires.contains_key(&id) {
            return Err(CircuitError::ActionState(format!("Wire {} already exists", id)));
        }

        let port = &mut self.require_component_mut(source.component_id())?.outputs[source.index()];
        let value = port.value;
        let slot = slot.map_or(port.wires.len(), |slot| slot.min(port.wires.len()));
        port.wires.insert(slot, id);
        self.require_component_mut(target.component_id())?.inputs[target.index()].wire = Some(id);
        self.wires.insert(
            id,
            Wire {
                id,
                from: source,
                to: target,
                value,
            },
        );
        self.next_wire_id = self.next_wire_id.max(id.0 + 1);

        debug!(
            "Connected {} from {}:{} to {}:{}",
            id,
            source.component_id(),
            source.index(),
            target.component_id(),
            target.index()
        );
        Ok(self.engine().deliver(self, target, value))
    }

    /// Remove a wire from both of its endpoints.
    ///
    /// The freed input reads low again and its owner is re-evaluated. A pass
    /// cut off at `max_steps` is only reported through the log.
    pub fn disconnect(&mut self, id: WireId) -> Result<Wire> {
        self.detach(id).map(|(wire, _)| wire)
    }

    /// Disconnect a wire and report the slot it held in its output's fan-out
    pub fn detach(&mut self, id: WireId) -> Result<(Wire, usize)> {
        ConnectionValidator::validate_disconnection(self, id)?;
        let wire = self
            .wires
            .remove(&id)
            .ok_or_else(|| CircuitError::NotInCircuit(format!("Wire {} not found", id)))?;

        let mut slot = 0;
        if let Some(port) = self
            .components
            .get_mut(&wire.from.component_id())
            .and_then(|component| component.outputs.get_mut(wire.from.index()))
        {
            if let Some(index) = port.wires.iter().position(|w| *w == id) {
                port.wires.remove(index);
                slot = index;
            }
        }
        if let Some(port) = self
            .components
            .get_mut(&wire.to.component_id())
            .and_then(|component| component.inputs.get_mut(wire.to.index()))
        {
            port.wire = None;
        }

        debug!("Disconnected {} from fan-out slot {}", id, slot);
        self.engine().deliver(self, wire.to, false);
        Ok((wire, slot))
    }

    pub fn contains_wire(&self, id: WireId) -> bool {
        self.wires.contains_key(&id)
    }

    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(&id)
    }

    /// All wires in ID order
    pub fn wires(&self) -> impl Iterator<Item = &Wire> {
        self.wires.values()
    }

    pub fn wire_ids(&self) -> Vec<WireId> {
        self.wires.keys().copied().collect()
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// Wire currently attached to an input port, if any
    pub fn wire_into(&self, port: InputPortRef) -> Option<&Wire> {
        self.component(port.component_id())
            .and_then(|component| component.inputs.get(port.index()))
            .and_then(|input| input.wire)
            .and_then(|wire| self.wires.get(&wire))
    }

    /// Set an output port's value and propagate the change
    pub fn activate(
        &mut self,
        id: ComponentId,
        index: usize,
        value: bool,
    ) -> Result<PropagationReport> {
        self.engine().activate(self, id, index, value)
    }

    /// Set the state of a switch or button and propagate it
    pub fn set_source(&mut self, id: ComponentId, value: bool) -> Result<PropagationReport> {
        let kind = self.require_component(id)?.kind();
        if !kind.is_interactive_input() {
            return Err(CircuitError::PortRangeError(format!(
                "Component {} ({}) is not a switch or button",
                id, kind
            )));
        }
        self.activate(id, 0, value)
    }

    pub fn input_value(&self, port: InputPortRef) -> Option<bool> {
        self.component(port.component_id())
            .and_then(|component| component.input_value(port.index()))
    }

    pub fn output_value(&self, port: OutputPortRef) -> Option<bool> {
        self.component(port.component_id())
            .and_then(|component| component.output_value(port.index()))
    }
}
