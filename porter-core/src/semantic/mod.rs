//! Semantic layer: symbols, the facade the reconciler queries, and an
//! in-memory model implementing it.

pub mod facade;
pub mod model;
pub mod symbols;

pub use facade::SemanticFacade;
pub use model::{ApiMethod, ApiModel, ApiProperty, ApiType, SemanticModel};
pub use symbols::{
    Accessibility, MemberSymbol, MethodSymbol, ParameterSymbol, PropertySymbol, RefKind, TypeRef,
    ACCESSIBILITY_KEYWORDS,
};
