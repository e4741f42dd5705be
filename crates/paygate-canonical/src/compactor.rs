use std::fmt;
use std::sync::Arc;

use crate::coercion::{CoercionRegistry, Renderer};
use crate::errors::{CanonicalError, CompactError};
use crate::policy::CompactionPolicy;
use crate::shape::{Accessor, Record, ResolvedShape, ShapeResolver};

/// One emitted field with its renderer already looked up.
struct Slot<R> {
    wire_name: &'static str,
    accessor: Accessor<R>,
    renderer: Renderer,
}

/// Reduces records of one shape to their canonical string under one policy.
///
/// Renderer dispatch, exclusion and key order are settled in [`Compactor::new`];
/// [`Compactor::compact`] only reads, renders and joins, so a compactor can be
/// shared across threads and called concurrently.
pub struct Compactor<R> {
    shape: Arc<ResolvedShape<R>>,
    policy: CompactionPolicy,
    slots: Vec<Slot<R>>,
}

impl<R: Record> Compactor<R> {
    /// Builds a compactor for `R` with wire names taken from `wire_name_tag`.
    pub fn new(
        resolver: &ShapeResolver,
        registry: &CoercionRegistry,
        wire_name_tag: &str,
        policy: CompactionPolicy,
    ) -> Result<Self, CanonicalError> {
        let shape = resolver.resolve::<R>(wire_name_tag)?;
        let mut slots = Vec::with_capacity(shape.fields().len());
        for field in shape.fields() {
            let wire_name = field.wire_name();
            if policy.is_excluded(wire_name) {
                continue;
            }
            let renderer = registry.lookup(field.semantic_type()).ok_or_else(|| {
                CanonicalError::UnsupportedType {
                    shape: shape.name(),
                    wire_name: wire_name.to_string(),
                    semantic_type: field.semantic_type(),
                }
            })?;
            slots.push(Slot {
                wire_name,
                accessor: field.accessor(),
                renderer,
            });
        }
        // Wire names are unique, so an unstable sort is deterministic.
        if policy.sorts_keys() {
            slots.sort_unstable_by(|a, b| a.wire_name.as_bytes().cmp(b.wire_name.as_bytes()));
        }
        Ok(Self {
            shape,
            policy,
            slots,
        })
    }

    /// Produces the canonical string for `record`.
    ///
    /// Fails as a whole on the first field that cannot be rendered; no
    /// partial string is ever returned.
    pub fn compact(&self, record: &R) -> Result<String, CompactError> {
        let skip_empty = self.policy.skips_empty();
        let mut out = String::new();
        let mut first = true;
        for slot in &self.slots {
            let value = (slot.accessor)(record);
            if skip_empty && value.is_empty() {
                continue;
            }
            let rendered = (slot.renderer)(&value).map_err(|source| CompactError::Coercion {
                field: slot.wire_name.to_string(),
                source,
            })?;
            let text = match rendered {
                Some(text) => text,
                None if skip_empty => continue,
                None => String::new(),
            };
            if skip_empty && text.is_empty() {
                continue;
            }

            if !first {
                out.push_str(self.policy.group_delimiter_str());
            }
            first = false;
            out.push_str(slot.wire_name);
            out.push_str(self.policy.pair_delimiter_str());
            match self.policy.escaper() {
                Some(escaper) => out.push_str(&escaper.apply(&text)),
                None => out.push_str(&text),
            }
        }
        Ok(out)
    }

    /// Canonical string as UTF-8 bytes, ready for hashing.
    pub fn compact_bytes(&self, record: &R) -> Result<Vec<u8>, CompactError> {
        self.compact(record).map(String::into_bytes)
    }

    /// Wire names that may be emitted, in emission order.
    pub fn wire_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(|slot| slot.wire_name)
    }

    /// Resolved shape backing this compactor.
    pub fn shape(&self) -> &ResolvedShape<R> {
        &self.shape
    }

    /// Policy in effect.
    pub fn policy(&self) -> &CompactionPolicy {
        &self.policy
    }
}

impl<R> fmt::Debug for Compactor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compactor")
            .field("shape", &self.shape.name())
            .field("tag", &self.shape.tag())
            .field("policy", &self.policy)
            .field(
                "fields",
                &self.slots.iter().map(|s| s.wire_name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Shape cache plus renderer registry, constructed once at startup.
#[derive(Debug, Default)]
pub struct CanonicalEngine {
    resolver: ShapeResolver,
    registry: CoercionRegistry,
}

impl CanonicalEngine {
    /// Engine over a custom registry.
    pub fn new(registry: CoercionRegistry) -> Self {
        Self {
            resolver: ShapeResolver::new(),
            registry,
        }
    }

    /// Engine with [`CoercionRegistry::standard`].
    pub fn standard() -> Self {
        Self::new(CoercionRegistry::standard())
    }

    /// Builds a compactor for `R`.
    pub fn compactor<R: Record>(
        &self,
        wire_name_tag: &str,
        policy: CompactionPolicy,
    ) -> Result<Compactor<R>, CanonicalError> {
        Compactor::new(&self.resolver, &self.registry, wire_name_tag, policy)
    }

    /// One-shot compaction; prefer a long-lived [`Compactor`] on hot paths.
    pub fn canonicalize<R: Record>(
        &self,
        record: &R,
        wire_name_tag: &str,
        policy: CompactionPolicy,
    ) -> Result<String, CompactError> {
        self.compactor::<R>(wire_name_tag, policy)?.compact(record)
    }

    /// Shared shape cache.
    pub fn resolver(&self) -> &ShapeResolver {
        &self.resolver
    }

    /// Renderer registry.
    pub fn registry(&self) -> &CoercionRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoercionError;
    use crate::policy::Escaper;
    use crate::shape::ShapeDescription;
    use crate::value::SemanticType;

    #[derive(Default)]
    struct Refund {
        refund_no: String,
        amount: i64,
        reason: Option<String>,
        sign: String,
    }

    impl Record for Refund {
        fn shape() -> ShapeDescription<Self> {
            ShapeDescription::<Self>::new("Refund")
                .field("RefundNo", &[("json", "refund_no")], SemanticType::String, |r| {
                    (&r.refund_no).into()
                })
                .field("Amount", &[("json", "amount")], SemanticType::Int64, |r| {
                    r.amount.into()
                })
                .field("Reason", &[("json", "reason")], SemanticType::String, |r| {
                    (&r.reason).into()
                })
                .field("Sign", &[("json", "sign")], SemanticType::String, |r| {
                    (&r.sign).into()
                })
        }
    }

    fn refund() -> Refund {
        Refund {
            refund_no: "R1".into(),
            amount: 0,
            reason: None,
            sign: "abc".into(),
        }
    }

    #[test]
    fn unsorted_policy_keeps_declaration_order_and_empties() {
        let engine = CanonicalEngine::standard();
        let policy = CompactionPolicy::new().exclude("sign");
        let compactor = engine.compactor::<Refund>("json", policy).unwrap();
        assert_eq!(
            compactor.compact(&refund()).unwrap(),
            "refund_no=R1&amount=0&reason="
        );
    }

    #[test]
    fn custom_delimiters() {
        let engine = CanonicalEngine::standard();
        let policy = CompactionPolicy::signing("sign")
            .pair_delimiter(":")
            .group_delimiter("|");
        let mut record = refund();
        record.amount = -15;
        record.reason = Some("dup".into());
        let compactor = engine.compactor::<Refund>("json", policy).unwrap();
        assert_eq!(
            compactor.compact(&record).unwrap(),
            "amount:-15|reason:dup|refund_no:R1"
        );
    }

    #[test]
    fn escaper_applies_to_values_only() {
        let engine = CanonicalEngine::standard();
        let policy = CompactionPolicy::signing("sign").escape(Escaper::form_urlencoded());
        let mut record = refund();
        record.reason = Some("a&b=c d".into());
        let s = engine.canonicalize(&record, "json", policy).unwrap();
        assert_eq!(s, "reason=a%26b%3Dc+d&refund_no=R1");
    }

    #[test]
    fn renderer_failure_names_the_field() {
        let mut registry = CoercionRegistry::standard();
        registry.register(SemanticType::Int64, |_| {
            Err(CoercionError::Custom("boom".into()))
        });
        let engine = CanonicalEngine::new(registry);
        let compactor = engine
            .compactor::<Refund>("json", CompactionPolicy::new())
            .unwrap();
        let err = compactor.compact(&refund()).unwrap_err();
        assert_eq!(
            err,
            CompactError::Coercion {
                field: "amount".into(),
                source: CoercionError::Custom("boom".into())
            }
        );
    }

    #[test]
    fn delimiter_inside_wire_name_is_emitted_verbatim() {
        let engine = CanonicalEngine::standard();
        let policy = CompactionPolicy::signing("sign").group_delimiter("_");
        let compactor = engine.compactor::<Refund>("json", policy).unwrap();
        let record = Refund {
            amount: 7,
            reason: Some("x".into()),
            ..refund()
        };
        assert_eq!(
            compactor.compact(&record).unwrap(),
            "amount=7_reason=x_refund_no=R1"
        );
    }

    #[test]
    fn wire_names_follow_policy() {
        let engine = CanonicalEngine::standard();
        let compactor = engine
            .compactor::<Refund>("json", CompactionPolicy::signing("sign"))
            .unwrap();
        let names: Vec<_> = compactor.wire_names().collect();
        assert_eq!(names, ["amount", "reason", "refund_no"]);
    }

    #[test]
    fn compact_never_touches_absent_values_when_skipping() {
        let engine = CanonicalEngine::standard();
        let compactor = engine
            .compactor::<Refund>("json", CompactionPolicy::signing("sign"))
            .unwrap();
        assert_eq!(compactor.compact(&Refund::default()).unwrap(), "");
        assert_eq!(
            compactor.compact_bytes(&refund()).unwrap(),
            b"refund_no=R1".to_vec()
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn compactor_is_shareable() {
        assert_send_sync::<Compactor<Refund>>();
        assert_send_sync::<CanonicalEngine>();
    }
}
