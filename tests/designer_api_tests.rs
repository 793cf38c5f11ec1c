use rlogic::{
    actions::{create_connection_action, create_delete_action, create_place_action},
    create_expression_circuit_action, create_negated_gates_action, create_replace_component_action,
    Circuit, CircuitSubset, ComponentId, ComponentKind, DesignerContext, ExpressionOptions, History,
    Notation, Replacement,
};

fn named(ctx: &DesignerContext, name: &str) -> ComponentId {
    ctx.circuit
        .components()
        .find(|component| component.name() == Some(name))
        .map(|component| component.id())
        .unwrap()
}

fn count(circuit: &Circuit, kind: ComponentKind) -> usize {
    circuit.components().filter(|c| c.kind() == kind).count()
}

#[test]
fn test_history_replays_an_editing_session() {
    let mut ctx = DesignerContext::new();
    let mut history = History::new();

    let switch = ctx.circuit.create_component(ComponentKind::Switch).unwrap();
    let (place, switch) = create_place_action(&mut ctx, switch).unwrap();
    history.push(place).unwrap();
    let gate = ctx.circuit.create_component(ComponentKind::And).unwrap();
    let (place, gate) = create_place_action(&mut ctx, gate).unwrap();
    history.push(place).unwrap();
    let led = ctx.circuit.create_component(ComponentKind::Led).unwrap();
    let (place, led) = create_place_action(&mut ctx, led).unwrap();
    history.push(place).unwrap();

    let (connect, _) = create_connection_action(&mut ctx, switch.output(0), gate.input(0)).unwrap();
    history.push(connect).unwrap();
    let (connect, _) = create_connection_action(&mut ctx, gate.output(0), led.input(0)).unwrap();
    history.push(connect).unwrap();
    let (replace, or) =
        create_replace_component_action(&mut ctx, gate, ComponentKind::Or, true).unwrap();
    history.push(replace).unwrap();

    ctx.circuit.set_source(switch, true).unwrap();
    assert_eq!(ctx.circuit.input_value(led.input(0)), Some(true));
    assert_eq!(ctx.selections.ids(), vec![or]);
    let edited = ctx.circuit.snapshot();

    while history.undo(&mut ctx).unwrap() {}
    assert_eq!(ctx.circuit.component_count(), 0);
    assert!(ctx.selections.is_empty());
    assert!(!history.can_undo());

    while history.redo(&mut ctx).unwrap() {}
    assert_eq!(ctx.circuit.component_count(), 3);
    assert_eq!(ctx.circuit.wire_count(), 2);
    assert_eq!(ctx.circuit.component(or).unwrap().kind(), ComponentKind::Or);
    assert_eq!(ctx.selections.ids(), vec![or]);

    // Switch states are not part of the recorded actions
    ctx.circuit.set_source(switch, true).unwrap();
    assert_eq!(ctx.circuit.snapshot(), edited);
}

#[test]
fn test_new_action_clears_redo() {
    let mut ctx = DesignerContext::new();
    let mut history = History::new();
    let not = ctx.circuit.create_component(ComponentKind::Not).unwrap();
    let (place, not) = create_place_action(&mut ctx, not).unwrap();
    history.push(place).unwrap();

    history.undo(&mut ctx).unwrap();
    assert!(history.can_redo());

    let buf = ctx.circuit.create_component(ComponentKind::Buf).unwrap();
    let (place, _) = create_place_action(&mut ctx, buf).unwrap();
    history.push(place).unwrap();
    assert!(!history.can_redo());
    assert!(!ctx.circuit.contains_component(not));
}

#[test]
fn test_delete_then_undo_restores_snapshot() {
    let mut ctx = DesignerContext::new();
    let a = ctx.circuit.add_component(ComponentKind::Switch).unwrap();
    let xor = ctx.circuit.add_component(ComponentKind::Xor).unwrap();
    let led = ctx.circuit.add_component(ComponentKind::Led).unwrap();
    ctx.circuit.connect(a.output(0), xor.input(0)).unwrap();
    ctx.circuit.connect(a.output(0), xor.input(1)).unwrap();
    ctx.circuit.connect(xor.output(0), led.input(0)).unwrap();
    let before = ctx.circuit.snapshot();

    let mut history = History::new();
    history.push(create_delete_action(&mut ctx, &[a, xor]).unwrap()).unwrap();
    assert_eq!(ctx.circuit.component_ids(), vec![led]);
    assert_eq!(ctx.circuit.wire_count(), 0);

    history.undo(&mut ctx).unwrap();
    assert_eq!(ctx.circuit.snapshot(), before);
}

#[test]
fn test_negated_gate_fusion_preserves_behaviour() {
    for (kind, table) in [
        (ComponentKind::And, [false, false, false, true]),
        (ComponentKind::Or, [false, true, true, true]),
        (ComponentKind::Xor, [false, true, true, false]),
    ] {
        let mut ctx = DesignerContext::new();
        let a = ctx.circuit.add_component(ComponentKind::Switch).unwrap();
        let b = ctx.circuit.add_component(ComponentKind::Switch).unwrap();
        let gate = ctx.circuit.add_component(kind).unwrap();
        let not = ctx.circuit.add_component(ComponentKind::Not).unwrap();
        let led = ctx.circuit.add_component(ComponentKind::Led).unwrap();
        ctx.circuit.connect(a.output(0), gate.input(0)).unwrap();
        ctx.circuit.connect(b.output(0), gate.input(1)).unwrap();
        ctx.circuit.connect(gate.output(0), not.input(0)).unwrap();
        ctx.circuit.connect(not.output(0), led.input(0)).unwrap();
        let before = ctx.circuit.snapshot();

        let subset = CircuitSubset::whole(&ctx.circuit);
        let (mut action, rewritten) = create_negated_gates_action(&mut ctx, &subset).unwrap();
        let negated = kind.negated().unwrap();
        assert_eq!(ctx.circuit.component_count(), 4);
        assert_eq!(ctx.circuit.wire_count(), 3);
        assert_eq!(count(&ctx.circuit, negated), 1, "{} should fuse into {}", kind, negated);
        assert_eq!(count(&ctx.circuit, kind), 0);
        assert_eq!(count(&ctx.circuit, ComponentKind::Not), 0);
        assert_eq!(rewritten.component_count(), 4);
        assert_eq!(rewritten.wire_count(), 3);
        assert!(rewritten.wires().all(|wire| ctx.circuit.contains_wire(*wire)));

        for (row, (x, y)) in [(false, false), (true, false), (false, true), (true, true)]
            .into_iter()
            .enumerate()
        {
            ctx.circuit.set_source(a, x).unwrap();
            ctx.circuit.set_source(b, y).unwrap();
            assert_eq!(
                ctx.circuit.input_value(led.input(0)),
                Some(!table[row]),
                "{} with inputs {} {}",
                negated,
                x,
                y
            );
        }

        ctx.circuit.set_source(a, false).unwrap();
        ctx.circuit.set_source(b, false).unwrap();
        action.undo(&mut ctx).unwrap();
        assert_eq!(ctx.circuit.snapshot(), before);
    }
}

#[test]
fn test_negated_gate_fusion_through_feedback() {
    // The NOT drives both the LED and the AND gate's second input
    let mut ctx = DesignerContext::new();
    let a = ctx.circuit.add_component(ComponentKind::Switch).unwrap();
    let and = ctx.circuit.add_component(ComponentKind::And).unwrap();
    let not = ctx.circuit.add_component(ComponentKind::Not).unwrap();
    let led = ctx.circuit.add_component(ComponentKind::Led).unwrap();
    ctx.circuit.connect(a.output(0), and.input(0)).unwrap();
    ctx.circuit.connect(and.output(0), not.input(0)).unwrap();
    ctx.circuit.connect(not.output(0), and.input(1)).unwrap();
    ctx.circuit.connect(not.output(0), led.input(0)).unwrap();
    assert_eq!(ctx.circuit.input_value(led.input(0)), Some(true));
    let before = ctx.circuit.snapshot();

    let subset = CircuitSubset::whole(&ctx.circuit);
    let (mut action, rewritten) = create_negated_gates_action(&mut ctx, &subset).unwrap();
    assert_eq!(ctx.circuit.component_count(), 3);
    assert_eq!(ctx.circuit.wire_count(), 3);
    assert_eq!(rewritten.component_count(), 3);
    assert_eq!(rewritten.wire_count(), 3);

    let nand = ctx
        .circuit
        .components()
        .find(|component| component.kind() == ComponentKind::Nand)
        .map(|component| component.id())
        .unwrap();
    let looped = ctx.circuit.component(nand).unwrap().inputs()[1].wire().unwrap();
    assert_eq!(ctx.circuit.wire(looped).unwrap().from(), nand.output(0));
    assert_eq!(ctx.circuit.input_value(led.input(0)), Some(true));

    action.undo(&mut ctx).unwrap();
    assert_eq!(ctx.circuit.snapshot(), before);
}

#[test]
fn test_delete_undo_keeps_fan_out_order() {
    let mut ctx = DesignerContext::new();
    let switch = ctx.circuit.add_component(ComponentKind::Switch).unwrap();
    let leds: Vec<ComponentId> = (0..3)
        .map(|_| ctx.circuit.add_component(ComponentKind::Led).unwrap())
        .collect();
    for led in &leds {
        ctx.circuit.connect(switch.output(0), led.input(0)).unwrap();
    }
    let order = ctx.circuit.component(switch).unwrap().outputs()[0].wires().to_vec();

    let mut history = History::new();
    history.push(create_delete_action(&mut ctx, &[leds[0]]).unwrap()).unwrap();
    assert_eq!(ctx.circuit.component(switch).unwrap().outputs()[0].wires(), &order[1..]);

    history.undo(&mut ctx).unwrap();
    assert_eq!(ctx.circuit.component(switch).unwrap().outputs()[0].wires(), order.as_slice());

    history.redo(&mut ctx).unwrap();
    history.undo(&mut ctx).unwrap();
    assert_eq!(ctx.circuit.component(switch).unwrap().outputs()[0].wires(), order.as_slice());
}

#[test]
fn test_replace_by_identifier() {
    let mut ctx = DesignerContext::new();
    let gate = ctx.circuit.add_component(ComponentKind::Nor).unwrap();
    let replacement = Replacement::resolve("XNORGate", &ctx.ic_library).unwrap();
    let (_, xnor) = create_replace_component_action(&mut ctx, gate, replacement, false).unwrap();
    assert_eq!(ctx.circuit.component_ids(), vec![xnor]);
    assert!(Replacement::resolve("Nope", &ctx.ic_library).is_err());
}

#[test]
fn test_expression_to_circuit_and_undo() {
    let mut ctx = DesignerContext::new();
    let mut history = History::new();
    let (action, added) =
        create_expression_circuit_action(&mut ctx, "a & b", &ExpressionOptions::default()).unwrap();
    history.push(action).unwrap();

    assert_eq!(added.len(), 4);
    assert_eq!(count(&ctx.circuit, ComponentKind::Switch), 2);
    assert_eq!(count(&ctx.circuit, ComponentKind::And), 1);
    assert_eq!(count(&ctx.circuit, ComponentKind::Led), 1);
    assert_eq!(ctx.selections.len(), 4);

    let (a, b, output) = (named(&ctx, "a"), named(&ctx, "b"), named(&ctx, "Output"));
    for (x, y) in [(false, false), (true, false), (false, true), (true, true)] {
        ctx.circuit.set_source(a, x).unwrap();
        ctx.circuit.set_source(b, y).unwrap();
        assert_eq!(ctx.circuit.input_value(output.input(0)), Some(x && y));
    }

    history.undo(&mut ctx).unwrap();
    assert_eq!(ctx.circuit.component_count(), 0);
    assert!(ctx.selections.is_empty());
}

#[test]
fn test_expression_to_ic() {
    let mut ctx = DesignerContext::new();
    let options = ExpressionOptions::new()
        .with_notation(Notation::preset("OR").unwrap())
        .into_ic(Some("Inhibit".to_string()));
    let (mut action, added) =
        create_expression_circuit_action(&mut ctx, "a AND NOT b", &options).unwrap();
    assert_eq!(added.len(), 1);
    assert_eq!(ctx.ic_library.len(), 1);
    let ic = added[0];
    assert_eq!(ctx.circuit.component(ic).unwrap().name(), Some("Inhibit"));
    assert!(ctx.selections.contains(ic));

    let x = ctx.circuit.add_component(ComponentKind::Switch).unwrap();
    let y = ctx.circuit.add_component(ComponentKind::Switch).unwrap();
    ctx.circuit.connect(x.output(0), ic.input(0)).unwrap();
    ctx.circuit.connect(y.output(0), ic.input(1)).unwrap();
    ctx.circuit.set_source(x, true).unwrap();
    assert_eq!(ctx.circuit.output_value(ic.output(0)), Some(true));
    ctx.circuit.set_source(y, true).unwrap();
    assert_eq!(ctx.circuit.output_value(ic.output(0)), Some(false));

    ctx.circuit.remove_component(x).unwrap();
    ctx.circuit.remove_component(y).unwrap();
    action.undo(&mut ctx).unwrap();
    assert!(ctx.ic_library.is_empty());
    assert_eq!(ctx.circuit.component_count(), 0);
}

#[test]
fn test_bad_expression_changes_nothing() {
    let mut ctx = DesignerContext::new();
    let gate = ctx.circuit.add_component(ComponentKind::And).unwrap();
    ctx.selections.select(gate);

    let options = ExpressionOptions::default();
    assert!(create_expression_circuit_action(&mut ctx, "a & (b", &options).is_err());
    assert_eq!(ctx.circuit.component_count(), 1);
    assert_eq!(ctx.selections.ids(), vec![gate]);
}
