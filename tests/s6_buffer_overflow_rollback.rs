//! Scenario S6: a `Buffer`-bounded `Group` whose second field would
//! overrun the window fails with `PositionOutOfWindow`; when the group
//! runs inside an explicit transaction, rolling that transaction back
//! removes the first field's mapping too, leaving no partial trace.

use bitweave::block::{Block, Buffer, Field, Group};
use bitweave::context::DecodingContext;
use bitweave::error::EngineError;
use bitweave::mem::{IdentityConverter, MemoryBitReader, MemoryFieldTree};
use bitweave::path::LogicalPath;
use bitweave::CodingContext;

fn layout() -> Buffer<u64> {
    Buffer::new(
        8,
        Box::new(Group::new(vec![
            Box::new(Field::new("x", 8)) as Box<dyn Block<u64>>,
            Box::new(Field::new("y", 1)) as Box<dyn Block<u64>>,
        ])),
    )
}

#[test]
fn second_field_exceeding_window_fails_with_position_out_of_window() {
    let bytes = vec![0xFFu8, 0xFF];
    let mut ctx: DecodingContext<MemoryBitReader, MemoryFieldTree<u64>, IdentityConverter> =
        DecodingContext::new(MemoryBitReader::new(bytes), MemoryFieldTree::new(), IdentityConverter);

    let err = layout().run(&mut ctx).error().cloned().unwrap();
    assert!(matches!(err, EngineError::PositionOutOfWindow { .. }));

    // The first field did bind before the window rejected the second.
    assert_eq!(
        ctx.get_field_mapping(&LogicalPath::parse("/x")).unwrap().converted_value,
        0xFF
    );
}

#[test]
fn rollback_inside_a_transaction_removes_the_first_fields_mapping_too() {
    let bytes = vec![0xFFu8, 0xFF];
    let mut ctx: DecodingContext<MemoryBitReader, MemoryFieldTree<u64>, IdentityConverter> =
        DecodingContext::new(MemoryBitReader::new(bytes), MemoryFieldTree::new(), IdentityConverter);

    let mut txn = ctx.begin_transaction().unwrap();
    let result = layout().run(&mut ctx);
    assert!(result.is_err());
    txn.rollback();

    assert!(ctx.get_field_mapping(&LogicalPath::parse("/x")).is_err());
    assert!(ctx.get_field_mapping(&LogicalPath::parse("/y")).is_err());
    assert_eq!(ctx.position(), 0);
}
