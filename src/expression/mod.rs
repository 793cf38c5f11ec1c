pub mod config;
pub mod layout;
pub mod notation;
pub mod parser;
pub mod synthesis;
pub mod tokenizer;

// Re-export commonly used types
pub use config::{ExpressionOptions, LayoutConfig};
pub use notation::{Notation, OperatorRole, PRESET_KEYS};
pub use parser::{parse, parse_with_depth, BinaryOp, Expr, DEFAULT_MAX_DEPTH};
pub use synthesis::{compile_expression, ExpressionCircuit, OUTPUT_NAME};
pub use tokenizer::{tokenize, Token};

use crate::actions::factories::{
    create_add_group_action, create_deselect_all_action, create_group_select_action,
    create_place_action, create_register_ic_action,
};
use crate::actions::{DesignerContext, GroupAction};
use crate::core::components::IcDefinition;
use crate::core::errors::Result;
use crate::core::types::{ComponentId, Position};
use log::{debug, warn};

/// Compile an expression and add the result to the designer.
///
/// Clears the selection, then either pastes the generated components or
/// registers them as an IC and places one instance, and selects what was
/// added. Compilation errors are returned before anything changes; the
/// returned group has already been applied.
pub fn create_expression_circuit_action(
    ctx: &mut DesignerContext,
    expression: &str,
    options: &ExpressionOptions,
) -> Result<(GroupAction, Vec<ComponentId>)> {
    let compiled = compile_expression(expression, options)?;
    let definition = if options.as_ic {
        let name = options.ic_name.clone().unwrap_or_else(|| expression.to_string());
        Some(IcDefinition::from_circuit(name, compiled.circuit.clone())?)
    } else {
        None
    };

    let mut group = GroupAction::new("Expression To Circuit")
        .with_info(format!("Generating \"{}\"", expression));
    let result = build_into(ctx, &mut group, &compiled, definition, options.layout.origin);
    match result {
        Ok(added) => {
            debug!("Generated {} components from \"{}\"", added.len(), expression);
            Ok((group, added))
        }
        Err(e) => {
            if let Err(rollback) = group.undo(ctx) {
                warn!("Could not roll back generated circuit: {}", rollback);
            }
            Err(e)
        }
    }
}

fn build_into(
    ctx: &mut DesignerContext,
    group: &mut GroupAction,
    compiled: &ExpressionCircuit,
    definition: Option<IcDefinition>,
    origin: Position,
) -> Result<Vec<ComponentId>> {
    group.append(create_deselect_all_action(ctx)?)?;

    let added = match definition {
        Some(definition) => {
            let instance = ctx
                .circuit
                .create_ic_component(&definition)
                .with_position(origin);
            let (register, _) = create_register_ic_action(ctx, definition)?;
            group.append(register)?;
            let (place, id) = create_place_action(ctx, instance)?;
            group.append(place)?;
            vec![id]
        }
        None => {
            let (paste, ids) = create_add_group_action(ctx, &compiled.circuit)?;
            group.append(paste)?;
            ids
        }
    };

    group.append(create_group_select_action(ctx, &added)?)?;
    Ok(added)
}
