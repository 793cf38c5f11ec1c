pub mod action;
pub mod context;
pub mod factories;
pub mod group;
pub mod history;
pub mod selection;

// Re-export commonly used types
pub use action::Action;
pub use context::DesignerContext;
pub use factories::{
    create_add_group_action, create_connection_action, create_delete_action,
    create_deselect_all_action, create_disconnect_action, create_group_select_action,
    create_input_port_change_action, create_output_port_change_action, create_place_action,
    create_register_ic_action, create_select_port_change_action, create_snip_gate_action,
    create_translate_action,
};
pub use group::GroupAction;
pub use history::History;
pub use selection::Selections;
