pub mod compilation_unit;
pub mod context;
pub mod errors;
pub mod formatter;
pub mod node_id;
pub mod pipeline;
pub mod predicates;
pub mod relatives;
pub mod source_position;
pub mod symbol_table;
pub mod thorium_node;
pub mod transforms;
pub mod visitor;
