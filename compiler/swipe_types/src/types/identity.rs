//! Type identity and a hasher consistent with it.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use super::{Pool, TypeData, TypeId};

impl Pool {
    /// Go type identity.
    pub fn identical(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        match (self.get(a), self.get(b)) {
            (TypeData::Basic(x), TypeData::Basic(y)) => x.canonical() == y.canonical(),
            (TypeData::Pointer(x), TypeData::Pointer(y))
            | (TypeData::Slice(x), TypeData::Slice(y)) => self.identical(*x, *y),
            (
                TypeData::Array { len: la, elem: ea },
                TypeData::Array { len: lb, elem: eb },
            ) => la == lb && self.identical(*ea, *eb),
            (
                TypeData::Map { key: ka, value: va },
                TypeData::Map { key: kb, value: vb },
            ) => self.identical(*ka, *kb) && self.identical(*va, *vb),
            (
                TypeData::Chan { dir: da, elem: ea },
                TypeData::Chan { dir: db, elem: eb },
            ) => da == db && self.identical(*ea, *eb),
            (TypeData::Struct(fa), TypeData::Struct(fb)) => {
                fa.len() == fb.len()
                    && fa.iter().zip(fb).all(|(x, y)| {
                        x.name == y.name
                            && x.embedded == y.embedded
                            && x.tag == y.tag
                            && self.identical(x.ty, y.ty)
                    })
            }
            (TypeData::Signature(sa), TypeData::Signature(sb)) => {
                sa.variadic == sb.variadic
                    && sa.params.len() == sb.params.len()
                    && sa.results.len() == sb.results.len()
                    && sa
                        .params
                        .iter()
                        .zip(&sb.params)
                        .chain(sa.results.iter().zip(&sb.results))
                        .all(|(x, y)| self.identical(x.ty, y.ty))
            }
            (TypeData::Interface(ia), TypeData::Interface(ib)) => {
                ia.all.len() == ib.all.len()
                    && ia
                        .all
                        .iter()
                        .zip(&ib.all)
                        .all(|(x, y)| x.name == y.name && self.identical(x.sig, y.sig))
            }
            (TypeData::Tuple(ta), TypeData::Tuple(tb)) => {
                ta.len() == tb.len() && ta.iter().zip(tb).all(|(x, y)| self.identical(*x, *y))
            }
            _ => false,
        }
    }

    /// Hash such that identical types hash equally.
    pub fn type_hash(&self, id: TypeId) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash_into(id, &mut hasher);
        hasher.finish()
    }

    fn hash_into(&self, id: TypeId, h: &mut FxHasher) {
        match self.get(id) {
            TypeData::Basic(kind) => {
                0u8.hash(h);
                kind.canonical().hash(h);
            }
            TypeData::Named(_) | TypeData::TypeParam { .. } => {
                1u8.hash(h);
                id.hash(h);
            }
            TypeData::Pointer(elem) => {
                2u8.hash(h);
                self.hash_into(*elem, h);
            }
            TypeData::Slice(elem) => {
                3u8.hash(h);
                self.hash_into(*elem, h);
            }
            TypeData::Array { len, elem } => {
                4u8.hash(h);
                len.hash(h);
                self.hash_into(*elem, h);
            }
            TypeData::Map { key, value } => {
                5u8.hash(h);
                self.hash_into(*key, h);
                self.hash_into(*value, h);
            }
            TypeData::Chan { dir, elem } => {
                6u8.hash(h);
                dir.hash(h);
                self.hash_into(*elem, h);
            }
            TypeData::Struct(fields) => {
                7u8.hash(h);
                fields.len().hash(h);
                for field in fields {
                    field.name.hash(h);
                    field.embedded.hash(h);
                    field.tag.hash(h);
                    self.hash_into(field.ty, h);
                }
            }
            TypeData::Signature(sig) => {
                8u8.hash(h);
                sig.variadic.hash(h);
                sig.params.len().hash(h);
                for p in &sig.params {
                    self.hash_into(p.ty, h);
                }
                sig.results.len().hash(h);
                for r in &sig.results {
                    self.hash_into(r.ty, h);
                }
            }
            TypeData::Interface(iface) => {
                9u8.hash(h);
                iface.all.len().hash(h);
                for m in &iface.all {
                    m.name.hash(h);
                    self.hash_into(m.sig, h);
                }
            }
            TypeData::Tuple(types) => {
                10u8.hash(h);
                types.len().hash(h);
                for t in types {
                    self.hash_into(*t, h);
                }
            }
        }
    }
}
