use super::config::PropagationConfig;
use crate::core::circuit::Circuit;
use crate::core::errors::{CircuitError, Result};
use crate::core::types::{ComponentId, InputPortRef};
use log::{trace, warn};
use std::collections::VecDeque;

/// A pending change of one output port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Activation {
    component: ComponentId,
    index: usize,
    value: bool,
}

/// Summary of one propagation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationReport {
    /// Activations taken off the queue
    pub steps: usize,
    /// Activations that actually changed an output value
    pub changes: usize,
    /// False when the pass was cut off by the step limit
    pub settled: bool,
}

impl Default for PropagationReport {
    fn default() -> Self {
        Self {
            steps: 0,
            changes: 0,
            settled: true,
        }
    }
}

impl PropagationReport {
    /// Fold another pass into this one
    pub fn merge(&mut self, other: PropagationReport) {
        self.steps += other.steps;
        self.changes += other.changes;
        self.settled &= other.settled;
    }
}

/// Pushes boolean output changes across wires until no port changes value.
///
/// Work is kept on an explicit FIFO queue, so deep chains and wide fan-out
/// never grow the call stack. Outputs of one component are queued in
/// ascending port index; wires of one output are followed in the order they
/// were attached.
pub struct PropagationEngine {
    config: PropagationConfig,
}

impl PropagationEngine {
    pub fn new(config: PropagationConfig) -> Self {
        Self { config }
    }

    /// Set an output port's value and propagate it if it changed
    pub fn activate(
        &self,
        circuit: &mut Circuit,
        component: ComponentId,
        index: usize,
        value: bool,
    ) -> Result<PropagationReport> {
        let target = circuit.components.get(&component).ok_or_else(|| {
            CircuitError::NotInCircuit(format!("Component {} not found", component))
        })?;
        if index >= target.output_count() {
            return Err(CircuitError::PortRangeError(format!(
                "Output port {} not found on component {}",
                index, component
            )));
        }

        let mut queue = VecDeque::new();
        queue.push_back(Activation {
            component,
            index,
            value,
        });
        Ok(self.run(circuit, queue))
    }

    /// Hand a new value to an input port and propagate the owner's reaction.
    ///
    /// The report says whether the pass settled or was cut off at
    /// `max_steps`.
    pub fn deliver(
        &self,
        circuit: &mut Circuit,
        target: InputPortRef,
        value: bool,
    ) -> PropagationReport {
        if let Some(port) = circuit
            .components
            .get_mut(&target.component_id())
            .and_then(|component| component.inputs.get_mut(target.index()))
        {
            port.value = value;
        }
        self.refresh(circuit, target.component_id())
    }

    /// Re-evaluate a component from its current inputs and propagate the result
    pub fn refresh(&self, circuit: &mut Circuit, component: ComponentId) -> PropagationReport {
        let mut queue = VecDeque::new();
        enqueue_outputs(circuit, component, &mut queue);
        self.run(circuit, queue)
    }

    fn run(&self, circuit: &mut Circuit, mut queue: VecDeque<Activation>) -> PropagationReport {
        let mut report = PropagationReport::default();

        while let Some(activation) = queue.pop_front() {
            if report.steps >= self.config.max_steps {
                warn!(
                    "Propagation stopped after {} steps with {} activations pending; \
                     circuit does not settle",
                    report.steps,
                    queue.len() + 1
                );
                report.settled = false;
                break;
            }
            report.steps += 1;

            let Some(port) = circuit
                .components
                .get_mut(&activation.component)
                .and_then(|component| component.outputs.get_mut(activation.index))
            else {
                continue;
            };

            // Unchanged values stop here; this is what ends feedback loops
            if port.value == activation.value {
                continue;
            }
            port.value = activation.value;
            report.changes += 1;
            let wires = port.wires.clone();

            let mut touched: Vec<ComponentId> = Vec::new();
            for wire_id in wires {
                let Some(wire) = circuit.wires.get_mut(&wire_id) else {
                    continue;
                };
                wire.value = activation.value;
                let target = wire.to;

                if let Some(input) = circuit
                    .components
                    .get_mut(&target.component_id())
                    .and_then(|component| component.inputs.get_mut(target.index()))
                {
                    input.value = activation.value;
                }
                if !touched.contains(&target.component_id()) {
                    touched.push(target.component_id());
                }
            }

            for component in touched {
                enqueue_outputs(circuit, component, &mut queue);
            }
        }

        trace!(
            "Propagation pass: {} steps, {} changes, settled={}",
            report.steps,
            report.changes,
            report.settled
        );
        report
    }
}

/// Evaluate a component and queue all of its outputs in ascending index
fn enqueue_outputs(
    circuit: &mut Circuit,
    component: ComponentId,
    queue: &mut VecDeque<Activation>,
) {
    if let Some(target) = circuit.components.get_mut(&component) {
        let values = target.evaluate();
        for (index, value) in values.into_iter().enumerate() {
            queue.push_back(Activation {
                component,
                index,
                value,
            });
        }
    }
}
