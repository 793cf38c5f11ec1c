use rlogic::expression::{compile_expression, ExpressionOptions, Notation, PRESET_KEYS};
use std::env;

/// Print the truth table of a boolean expression, computed by simulating the
/// circuit generated for it.
///
/// Usage: expr_table "<expression>" [notation preset]
fn main() -> Result<(), String> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let expression = args.next().ok_or_else(|| {
        format!(
            "usage: expr_table \"<expression>\" [notation: {}]",
            PRESET_KEYS.join(" ")
        )
    })?;
    let notation = match args.next() {
        Some(key) => Notation::preset(&key)
            .ok_or_else(|| format!("Unknown notation preset \"{}\"", key))?,
        None => Notation::default(),
    };

    let options = ExpressionOptions::new().with_notation(notation);
    let mut compiled = compile_expression(&expression, &options).map_err(|e| e.to_string())?;
    let names: Vec<String> = compiled.inputs.keys().cloned().collect();
    if names.len() > 16 {
        return Err(format!("{} inputs are too many for a truth table", names.len()));
    }

    println!(
        "{} ({} components, {} wires)",
        expression,
        compiled.circuit.component_count(),
        compiled.circuit.wire_count()
    );
    println!("{} | out", names.join(" "));
    for row in 0..(1u32 << names.len()) {
        // First input is the most significant bit
        let values: Vec<bool> = (0..names.len())
            .map(|i| row & (1 << (names.len() - 1 - i)) != 0)
            .collect();
        let output = compiled.evaluate(&values).map_err(|e| e.to_string())?;
        let cells: Vec<String> = names
            .iter()
            .zip(&values)
            .map(|(name, value)| format!("{:>width$}", u8::from(*value), width = name.len()))
            .collect();
        println!("{} | {}", cells.join(" "), u8::from(output));
    }
    Ok(())
}
