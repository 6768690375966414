pub mod relatives_injection;
pub mod symbol_table_builder;
pub mod type_flattening;

pub use relatives_injection::{RelativesInjectionPass, RelativesInjectionVisitor, inject_relatives};
pub use symbol_table_builder::{SymbolTableBuilder, SymbolTablePass};
pub use type_flattening::{TypeFlatteningPass, TypeFlatteningVisitor, flatten_types};
