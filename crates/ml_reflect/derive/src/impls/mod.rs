mod struct_kind;
mod trait_reflect;
mod trait_typed;

pub(crate) use struct_kind::impl_struct;
