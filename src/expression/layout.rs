use super::config::LayoutConfig;
use crate::core::circuit::Circuit;
use crate::core::errors::Result;
use crate::core::types::{ComponentId, Position};
use std::collections::{BTreeMap, VecDeque};

/// Depth of every component: 0 for components with no wired inputs, otherwise
/// one more than the deepest driver.
///
/// Components on a feedback loop are placed one column after everything else.
pub fn component_depths(circuit: &Circuit) -> BTreeMap<ComponentId, usize> {
    let mut pending: BTreeMap<ComponentId, usize> = circuit
        .components()
        .map(|component| {
            let drivers = component.inputs().iter().filter(|port| port.wire().is_some()).count();
            (component.id(), drivers)
        })
        .collect();
    let mut depths: BTreeMap<ComponentId, usize> = BTreeMap::new();
    let mut queue: VecDeque<ComponentId> = pending
        .iter()
        .filter(|(_, drivers)| **drivers == 0)
        .map(|(id, _)| *id)
        .collect();
    for id in &queue {
        depths.insert(*id, 0);
    }

    while let Some(id) = queue.pop_front() {
        let depth = depths.get(&id).copied().unwrap_or(0);
        let Some(component) = circuit.component(id) else {
            continue;
        };
        for wire in component
            .outputs()
            .iter()
            .flat_map(|port| port.wires())
            .filter_map(|wire| circuit.wire(*wire))
        {
            let consumer = wire.to().component_id();
            let entry = depths.entry(consumer).or_insert(0);
            *entry = (*entry).max(depth + 1);
            if let Some(remaining) = pending.get_mut(&consumer) {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    queue.push_back(consumer);
                }
            }
        }
    }

    let cyclic: Vec<ComponentId> = pending
        .iter()
        .filter(|(_, remaining)| **remaining > 0)
        .map(|(id, _)| *id)
        .collect();
    if !cyclic.is_empty() {
        let last = depths.values().copied().max().unwrap_or(0) + 1;
        for id in cyclic {
            depths.insert(id, last);
        }
    }
    depths
}

/// Place components in columns by depth, rows in ID order within a column
pub fn organize_by_depth(circuit: &mut Circuit, config: &LayoutConfig) -> Result<()> {
    let mut columns: BTreeMap<usize, Vec<ComponentId>> = BTreeMap::new();
    for (id, depth) in component_depths(circuit) {
        columns.entry(depth).or_default().push(id);
    }

    for (depth, ids) in columns {
        for (row, id) in ids.into_iter().enumerate() {
            let position = Position::new(
                config.origin.x + depth as f32 * config.column_spacing,
                config.origin.y + row as f32 * config.row_spacing,
            );
            circuit.set_position(id, position)?;
        }
    }
    Ok(())
}
