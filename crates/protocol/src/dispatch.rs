//! Runtime dispatch of an operation tag onto its statically typed operation.

use crate::error::ProtocolResult;
use crate::operations::{self, OperationKind, OperationTag, OperationType};

/// A callback invoked with the static type of one registry operation.
pub trait OperationVisitor {
    type Output;

    fn visit<Op: OperationType>(&mut self) -> Self::Output;
}

/// Resolves `tag` in the registry and invokes `visitor` with the matching
/// operation type.
///
/// Tags outside the registry are reported as
/// [`ProtocolError::UnknownOperationTag`](crate::ProtocolError::UnknownOperationTag)
/// and the visitor is not called.
pub fn dispatch_tag<V>(tag: OperationTag, visitor: &mut V) -> ProtocolResult<V::Output>
where
    V: OperationVisitor,
{
    let kind = OperationKind::from_tag(tag)?;
    Ok(dispatch_kind(kind, visitor))
}

/// Invokes `visitor` with the operation type registered for `kind`.
pub fn dispatch_kind<V>(kind: OperationKind, visitor: &mut V) -> V::Output
where
    V: OperationVisitor,
{
    operations::visit_kind(kind, visitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProtocolError;

    struct KindRecorder(Vec<OperationKind>);

    impl OperationVisitor for KindRecorder {
        type Output = OperationKind;

        fn visit<Op: OperationType>(&mut self) -> OperationKind {
            self.0.push(Op::KIND);
            Op::KIND
        }
    }

    #[test]
    fn test_dispatch_tag_reaches_matching_type() {
        let mut recorder = KindRecorder(Vec::new());
        for kind in OperationKind::ALL {
            assert_eq!(dispatch_tag(kind.tag(), &mut recorder), Ok(*kind));
        }
        assert_eq!(recorder.0, OperationKind::ALL);
    }

    #[test]
    fn test_dispatch_tag_out_of_range_skips_visitor() {
        let mut recorder = KindRecorder(Vec::new());
        let result = dispatch_tag(OperationKind::COUNT as OperationTag, &mut recorder);
        assert!(matches!(
            result,
            Err(ProtocolError::UnknownOperationTag { tag: 86, .. })
        ));
        assert!(recorder.0.is_empty());
    }
}
