use super::config::{ExpressionOptions, LayoutConfig};
use super::layout::organize_by_depth;
use super::notation::Notation;
use super::parser::{parse_with_depth, Expr};
use super::tokenizer::{input_names, tokenize};
use crate::core::circuit::Circuit;
use crate::core::components::ComponentKind;
use crate::core::errors::{CircuitError, Result};
use crate::core::types::{ComponentId, OutputPortRef};
use indexmap::IndexMap;
use log::debug;

/// Name given to the generated output LED
pub const OUTPUT_NAME: &str = "Output";

/// A standalone circuit generated from an expression
#[derive(Debug, Clone)]
pub struct ExpressionCircuit {
    pub circuit: Circuit,
    /// Input components by name, in order of first appearance
    pub inputs: IndexMap<String, ComponentId>,
    /// The LED showing the expression's value
    pub output: ComponentId,
    pub expr: Expr,
}

impl ExpressionCircuit {
    /// Set every input at once and read the output LED.
    ///
    /// Only works for switch and button inputs.
    pub fn evaluate(&mut self, values: &[bool]) -> Result<bool> {
        for (id, value) in self.inputs.values().zip(values) {
            self.circuit.set_source(*id, *value)?;
        }
        self.circuit
            .input_value(self.output.input(0))
            .ok_or_else(|| CircuitError::NotInCircuit(format!("Output {} not found", self.output)))
    }
}

/// Compile an expression into a standalone, laid out circuit
pub fn compile_expression(
    expression: &str,
    options: &ExpressionOptions,
) -> Result<ExpressionCircuit> {
    compile_with(
        expression,
        &options.notation,
        options.input_kind,
        &options.layout,
        options.max_depth,
    )
}

pub fn compile_with(
    expression: &str,
    notation: &Notation,
    input_kind: ComponentKind,
    layout: &LayoutConfig,
    max_depth: usize,
) -> Result<ExpressionCircuit> {
    if !input_kind.is_source() {
        return Err(CircuitError::InvalidReplacement(format!(
            "{} cannot be used as an expression input",
            input_kind
        )));
    }

    let tokens = tokenize(expression, notation)?;
    let expr = parse_with_depth(&tokens, max_depth)?;

    let mut circuit = Circuit::new();
    let mut inputs = IndexMap::new();
    for name in input_names(&tokens) {
        let id = circuit.add_component(input_kind)?;
        circuit.set_name(id, name.clone())?;
        inputs.insert(name, id);
    }
    let output = circuit.add_component(ComponentKind::Led)?;
    circuit.set_name(output, OUTPUT_NAME)?;

    let root = build(&mut circuit, &inputs, &expr)?;
    circuit.connect(root, output.input(0))?;
    organize_by_depth(&mut circuit, layout)?;

    debug!(
        "Compiled \"{}\" into {} components and {} wires",
        expression,
        circuit.component_count(),
        circuit.wire_count()
    );
    Ok(ExpressionCircuit {
        circuit,
        inputs,
        output,
        expr,
    })
}

/// Add gates for `expr` and return the port carrying its value
fn build(
    circuit: &mut Circuit,
    inputs: &IndexMap<String, ComponentId>,
    expr: &Expr,
) -> Result<OutputPortRef> {
    match expr {
        Expr::Input(name) => inputs
            .get(name)
            .map(|id| id.output(0))
            .ok_or_else(|| CircuitError::ParseError(format!("Unknown input \"{}\"", name))),
        Expr::Not(inner) => {
            let source = build(circuit, inputs, inner)?;
            let gate = circuit.add_component(ComponentKind::Not)?;
            circuit.connect(source, gate.input(0))?;
            Ok(gate.output(0))
        }
        Expr::Binary(op, left, right) => {
            let left = build(circuit, inputs, left)?;
            let right = build(circuit, inputs, right)?;
            let gate = circuit.add_component(op.gate())?;
            circuit.connect(left, gate.input(0))?;
            circuit.connect(right, gate.input(1))?;
            Ok(gate.output(0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(circuit: &Circuit, kind: ComponentKind) -> usize {
        circuit.components().filter(|c| c.kind() == kind).count()
    }

    #[test]
    fn test_single_input_wires_straight_to_output() {
        let mut compiled = compile_expression("a", &ExpressionOptions::default()).unwrap();
        assert_eq!(compiled.circuit.component_count(), 2);
        assert_eq!(compiled.circuit.wire_count(), 1);
        assert!(compiled.evaluate(&[true]).unwrap());
    }

    #[test]
    fn test_gate_tree_mirrors_expression() {
        let compiled = compile_expression("!a | (b ^ a)", &ExpressionOptions::default()).unwrap();
        let circuit = &compiled.circuit;
        assert_eq!(compiled.inputs.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(kinds(circuit, ComponentKind::Not), 1);
        assert_eq!(kinds(circuit, ComponentKind::Or), 1);
        assert_eq!(kinds(circuit, ComponentKind::Xor), 1);
        assert_eq!(circuit.component(compiled.output).unwrap().name(), Some(OUTPUT_NAME));
    }

    #[test]
    fn test_output_sits_in_last_column() {
        let compiled = compile_expression("a & b & c", &ExpressionOptions::default()).unwrap();
        let output_x = compiled.circuit.component(compiled.output).unwrap().position().x;
        assert!(compiled
            .circuit
            .components()
            .all(|component| component.position().x <= output_x));
    }

    #[test]
    fn test_constant_inputs() {
        let options = ExpressionOptions::new().with_input_kind(ComponentKind::ConstantHigh);
        let compiled = compile_expression("x & !y", &options).unwrap();
        let led = compiled.circuit.component(compiled.output).unwrap();
        assert_eq!(led.input_value(0), Some(false));

        let bad = ExpressionOptions::new().with_input_kind(ComponentKind::And);
        assert!(matches!(
            compile_expression("x", &bad),
            Err(CircuitError::InvalidReplacement(_))
        ));
    }

    #[test]
    fn test_max_depth_option_limits_nesting() {
        let shallow = ExpressionOptions::new().with_max_depth(2);
        assert!(compile_expression("!(a & b)", &shallow).is_ok());
        assert!(matches!(
            compile_expression("!!(a & b)", &shallow),
            Err(CircuitError::ParseError(_))
        ));

        let nested = format!("{}a{}", "(".repeat(50_000), ")".repeat(50_000));
        assert!(matches!(
            compile_expression(&nested, &ExpressionOptions::default()),
            Err(CircuitError::ParseError(_))
        ));
    }
}
