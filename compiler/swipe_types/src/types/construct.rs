//! Constructors for structural types.

use super::{ChanDir, Param, Pool, Signature, StructField, TypeData, TypeId};

impl Pool {
    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.intern(TypeData::Pointer(elem))
    }

    pub fn slice(&mut self, elem: TypeId) -> TypeId {
        self.intern(TypeData::Slice(elem))
    }

    pub fn array(&mut self, len: u64, elem: TypeId) -> TypeId {
        self.intern(TypeData::Array { len, elem })
    }

    pub fn map(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(TypeData::Map { key, value })
    }

    pub fn chan(&mut self, dir: ChanDir, elem: TypeId) -> TypeId {
        self.intern(TypeData::Chan { dir, elem })
    }

    /// Result type of a call: nothing, the single result, or a tuple.
    pub fn tuple(&mut self, types: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Tuple(types))
    }

    pub fn func_type(&mut self, params: Vec<Param>, results: Vec<Param>, variadic: bool) -> TypeId {
        self.intern(TypeData::Signature(Signature {
            params,
            results,
            variadic,
        }))
    }

    pub fn struct_type(&mut self, fields: Vec<StructField>) -> TypeId {
        self.intern(TypeData::Struct(fields))
    }

    /// `struct{}`.
    pub fn empty_struct(&mut self) -> TypeId {
        self.struct_type(Vec::new())
    }
}
