//! Field and method lookup, method sets and interface satisfaction.

use rustc_hash::FxHashSet;

use super::Program;
use crate::object::{FuncKind, ObjId};
use crate::{TypeData, TypeId};

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum SelectionKind {
    /// `index` is the path of field indices through embedded structs.
    Field { ty: TypeId, index: Vec<usize> },
    Method(ObjId),
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Selection {
    pub kind: SelectionKind,
    /// A pointer was followed on the way (pointer receiver or embedded
    /// pointer field).
    pub indirect: bool,
}

impl Selection {
    pub fn method(&self) -> Option<ObjId> {
        match self.kind {
            SelectionKind::Method(obj) => Some(obj),
            SelectionKind::Field { .. } => None,
        }
    }
}

struct Candidate {
    ty: TypeId,
    index: Vec<usize>,
    indirect: bool,
}

impl Program {
    /// Find field or method `name` of `ty`, shallowest embedding depth first.
    pub fn lookup_field_or_method(&self, ty: TypeId, name: &str) -> Option<Selection> {
        if ty.is_invalid() || name == "_" {
            return None;
        }
        let (start, indirect) = match self.pool.deref(ty) {
            Some(elem) if !self.pool.is_interface(elem) => (elem, true),
            _ => (ty, false),
        };
        let mut current = vec![Candidate {
            ty: start,
            index: Vec::new(),
            indirect,
        }];
        let mut seen = FxHashSet::default();
        while !current.is_empty() {
            let mut next = Vec::new();
            for cand in current {
                if let Some(named) = self.pool.named(cand.ty) {
                    if !seen.insert(cand.ty) {
                        continue;
                    }
                    if let Some(m) = named
                        .methods
                        .iter()
                        .find(|m| self.object(**m).name == name)
                    {
                        return Some(Selection {
                            kind: SelectionKind::Method(*m),
                            indirect: cand.indirect,
                        });
                    }
                }
                match self.pool.underlying_data(cand.ty) {
                    TypeData::Struct(fields) => {
                        for (i, field) in fields.iter().enumerate() {
                            let mut index = cand.index.clone();
                            index.push(i);
                            if field.name == name {
                                return Some(Selection {
                                    kind: SelectionKind::Field { ty: field.ty, index },
                                    indirect: cand.indirect,
                                });
                            }
                            if field.embedded {
                                let (ty, ptr) = match self.pool.deref(field.ty) {
                                    Some(elem) => (elem, true),
                                    None => (field.ty, false),
                                };
                                next.push(Candidate {
                                    ty,
                                    index,
                                    indirect: cand.indirect || ptr,
                                });
                            }
                        }
                    }
                    TypeData::Interface(iface) => {
                        if let Some(m) = iface.all.iter().find(|m| m.name == name) {
                            return Some(Selection {
                                kind: SelectionKind::Method(m.obj),
                                indirect: cand.indirect,
                            });
                        }
                    }
                    _ => {}
                }
            }
            current = next;
        }
        None
    }

    /// Whether `ty` has every method of interface `iface` in its method set.
    pub fn implements(&self, ty: TypeId, iface: TypeId) -> bool {
        self.missing_method(ty, iface).is_none() && !ty.is_invalid()
    }

    /// First method of `iface` that `ty` lacks or has with a different
    /// signature; `Some("")` when `iface` is not an interface.
    pub fn missing_method(&self, ty: TypeId, iface: TypeId) -> Option<String> {
        self.missing_in_method_set(ty, iface, self.pool.deref(ty).is_none())
    }

    /// Whether the method set of `*named` covers `iface`, without the
    /// pointer type having to exist in the pool.
    pub fn pointer_implements(&self, named: TypeId, iface: TypeId) -> bool {
        !named.is_invalid()
            && !self.pool.is_interface(named)
            && self.missing_in_method_set(named, iface, false).is_none()
    }

    fn missing_in_method_set(
        &self,
        ty: TypeId,
        iface: TypeId,
        value_receiver: bool,
    ) -> Option<String> {
        let Some(want) = self.pool.interface(iface) else {
            return Some(String::new());
        };
        if let Some(have) = self.pool.interface(ty) {
            return want
                .all
                .iter()
                .find(|m| {
                    !have
                        .all
                        .iter()
                        .any(|h| h.name == m.name && self.pool.identical(h.sig, m.sig))
                })
                .map(|m| m.name.clone());
        }
        for m in &want.all {
            let ok = match self.lookup_field_or_method(ty, &m.name) {
                Some(Selection {
                    kind: SelectionKind::Method(obj),
                    indirect,
                }) => {
                    let object = self.object(obj);
                    let pointer_only = matches!(
                        object.func_kind(),
                        Some(FuncKind::Method { pointer: true, .. })
                    );
                    let in_set = !(value_receiver && pointer_only && !indirect);
                    in_set && self.pool.identical(object.ty, m.sig)
                }
                _ => false,
            };
            if !ok {
                return Some(m.name.clone());
            }
        }
        None
    }

    /// Whether a value of type `from` may be assigned to `to`.
    pub fn assignable(&self, from: TypeId, to: TypeId) -> bool {
        if from.is_invalid() || to.is_invalid() || self.pool.identical(from, to) {
            return true;
        }
        if let Some(kind) = self.pool.basic_kind(from) {
            if kind.is_untyped() {
                return true;
            }
        }
        if self.pool.is_interface(to) {
            return self.implements(from, to);
        }
        // Predeclared basic types count as defined types here.
        let defined = |t: TypeId| self.pool.is_named(t) || self.pool.basic_kind(t).is_some();
        let (uf, ut) = (self.pool.underlying(from), self.pool.underlying(to));
        (!defined(from) || !defined(to)) && self.pool.identical(uf, ut)
    }
}
