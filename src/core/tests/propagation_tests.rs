// Tests for PropagationEngine functionality
#[cfg(test)]
mod tests {
    use crate::core::{
        circuit::Circuit,
        components::ComponentKind,
        execution::PropagationConfig,
        types::ComponentId,
    };

    fn nor_latch(circuit: &mut Circuit) -> (ComponentId, ComponentId, ComponentId, ComponentId) {
        let set = circuit.add_component(ComponentKind::Switch).unwrap();
        let reset = circuit.add_component(ComponentKind::Switch).unwrap();
        let q = circuit.add_component(ComponentKind::Nor).unwrap();
        let q_bar = circuit.add_component(ComponentKind::Nor).unwrap();
        circuit.connect(reset.output(0), q.input(0)).unwrap();
        circuit.connect(set.output(0), q_bar.input(0)).unwrap();
        circuit.connect(q.output(0), q_bar.input(1)).unwrap();
        circuit.connect(q_bar.output(0), q.input(1)).unwrap();
        (set, reset, q, q_bar)
    }

    #[test]
    fn test_buffer_chain_reaches_the_end() {
        let mut circuit = Circuit::new();
        let switch = circuit.add_component(ComponentKind::Switch).unwrap();
        let mut previous = switch.output(0);
        for _ in 0..10 {
            let buf = circuit.add_component(ComponentKind::Buf).unwrap();
            circuit.connect(previous, buf.input(0)).unwrap();
            previous = buf.output(0);
        }
        let led = circuit.add_component(ComponentKind::Led).unwrap();
        circuit.connect(previous, led.input(0)).unwrap();

        let report = circuit.set_source(switch, true).unwrap();
        assert!(report.settled);
        assert_eq!(report.changes, 11);
        assert_eq!(circuit.input_value(led.input(0)), Some(true));
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut circuit = Circuit::new();
        let switch = circuit.add_component(ComponentKind::Switch).unwrap();
        let mut previous = switch.output(0);
        for _ in 0..5_000 {
            let not = circuit.add_component(ComponentKind::Not).unwrap();
            circuit.connect(previous, not.input(0)).unwrap();
            previous = not.output(0);
        }

        // An even number of inverters passes the value through
        assert_eq!(circuit.output_value(previous), Some(false));
        let report = circuit.set_source(switch, true).unwrap();
        assert!(report.settled);
        assert_eq!(circuit.output_value(previous), Some(true));
    }

    #[test]
    fn test_fan_out_reaches_every_consumer() {
        let mut circuit = Circuit::new();
        let switch = circuit.add_component(ComponentKind::Switch).unwrap();
        let leds: Vec<ComponentId> = (0..3)
            .map(|_| circuit.add_component(ComponentKind::Led).unwrap())
            .collect();
        for led in &leds {
            circuit.connect(switch.output(0), led.input(0)).unwrap();
        }

        circuit.set_source(switch, true).unwrap();
        for led in &leds {
            assert_eq!(circuit.input_value(led.input(0)), Some(true));
        }
        assert!(circuit.wires().all(|wire| wire.value()));
    }

    #[test]
    fn test_unchanged_value_is_not_propagated() {
        let mut circuit = Circuit::new();
        let switch = circuit.add_component(ComponentKind::Switch).unwrap();
        let led = circuit.add_component(ComponentKind::Led).unwrap();
        circuit.connect(switch.output(0), led.input(0)).unwrap();

        let report = circuit.set_source(switch, false).unwrap();
        assert_eq!(report.steps, 1);
        assert_eq!(report.changes, 0);
    }

    #[test]
    fn test_sr_latch_holds_its_state() {
        let mut circuit = Circuit::new();
        let (set, reset, q, q_bar) = nor_latch(&mut circuit);
        assert_eq!(circuit.output_value(q.output(0)), Some(true));
        assert_eq!(circuit.output_value(q_bar.output(0)), Some(false));

        assert!(circuit.set_source(reset, true).unwrap().settled);
        assert_eq!(circuit.output_value(q.output(0)), Some(false));
        assert_eq!(circuit.output_value(q_bar.output(0)), Some(true));

        circuit.set_source(reset, false).unwrap();
        assert_eq!(circuit.output_value(q.output(0)), Some(false));

        circuit.set_source(set, true).unwrap();
        circuit.set_source(set, false).unwrap();
        assert_eq!(circuit.output_value(q.output(0)), Some(true));
        assert_eq!(circuit.output_value(q_bar.output(0)), Some(false));
    }

    #[test]
    fn test_ring_oscillator_hits_step_limit() {
        let mut circuit = Circuit::with_config(PropagationConfig::new().with_max_steps(50));
        let enable = circuit.add_component(ComponentKind::Switch).unwrap();
        let nand = circuit.add_component(ComponentKind::Nand).unwrap();
        let first = circuit.add_component(ComponentKind::Not).unwrap();
        let second = circuit.add_component(ComponentKind::Not).unwrap();
        circuit.connect(enable.output(0), nand.input(0)).unwrap();
        circuit.connect(nand.output(0), first.input(0)).unwrap();
        circuit.connect(first.output(0), second.input(0)).unwrap();
        circuit.connect(second.output(0), nand.input(1)).unwrap();

        let report = circuit.set_source(enable, true).unwrap();
        assert!(!report.settled);
        assert_eq!(report.steps, 50);
    }

    #[test]
    fn test_connect_reports_unsettled_pass() {
        let mut circuit = Circuit::with_config(PropagationConfig::new().with_max_steps(50));
        let enable = circuit.add_component(ComponentKind::Switch).unwrap();
        let nand = circuit.add_component(ComponentKind::Nand).unwrap();
        let first = circuit.add_component(ComponentKind::Not).unwrap();
        let second = circuit.add_component(ComponentKind::Not).unwrap();
        circuit.connect(enable.output(0), nand.input(0)).unwrap();
        circuit.connect(nand.output(0), first.input(0)).unwrap();
        circuit.set_source(enable, true).unwrap();

        let wire = circuit.allocate_wire_id();
        let report = circuit
            .connect_with_id(wire, first.output(0), second.input(0))
            .unwrap();
        assert!(report.settled);

        // Closing the ring starts the oscillation
        let wire = circuit.allocate_wire_id();
        let report = circuit
            .connect_with_id(wire, second.output(0), nand.input(1))
            .unwrap();
        assert!(!report.settled);
        assert_eq!(report.steps, 50);
    }

    #[test]
    fn test_activate_rejects_unknown_port() {
        let mut circuit = Circuit::new();
        let switch = circuit.add_component(ComponentKind::Switch).unwrap();
        assert!(circuit.activate(switch, 3, true).is_err());
        assert!(circuit.activate(ComponentId::new(99), 0, true).is_err());
    }
}
