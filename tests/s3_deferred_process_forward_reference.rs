//! Scenario S3: a forward pointer field is read first, then `Offset`
//! jumps ahead by its value to a site recorded with `DeferredBlock`; a
//! `ProcessBlock` elsewhere in the layout replays that site's inner
//! block and restores the caller's own position afterward.

use bitweave::block::{Block, DeferredBlock, Field, Offset, ProcessBlock};
use bitweave::context::DecodingContext;
use bitweave::mem::{IdentityConverter, MemoryBitReader, MemoryFieldTree};
use bitweave::path::LogicalPath;
use bitweave::CodingContext;

#[test]
fn process_jumps_to_deferred_site_and_restores_caller_position() {
    // byte 0: pointer value (8), byte 1: unrelated filler, byte 2: payload.
    let bytes = vec![0x08u8, 0xFF, 0x42];
    let mut ctx: DecodingContext<MemoryBitReader, MemoryFieldTree<u64>, IdentityConverter> =
        DecodingContext::new(MemoryBitReader::new(bytes), MemoryFieldTree::new(), IdentityConverter);

    let deferred = DeferredBlock::new(Box::new(Field::new("payload", 8)));
    let process = ProcessBlock::new(deferred.clone());

    // Read the forward pointer: position 0 -> 8.
    Field::new("ptr", 8).run(&mut ctx).unwrap();

    // Jump ahead by the pointer's own value: position 8 -> 16.
    let offset = Offset::with_dynamic_offset(Box::new(|ctx: &dyn CodingContext<Value = u64>| {
        ctx.get_field_mapping(&LogicalPath::parse("/ptr"))
            .map(|m| m.converted_value as i64)
    }));
    offset.run(&mut ctx).unwrap();
    assert_eq!(ctx.position(), 16);

    // The deferred block only records the site; it consumes no bits.
    deferred.run(&mut ctx).unwrap();
    assert_eq!(ctx.position(), 16);
    assert!(ctx.get_field_mapping(&LogicalPath::parse("/payload")).is_err());

    // Simulate the rest of the layout running elsewhere before the
    // process block is reached.
    ctx.move_by(-16).unwrap();
    assert_eq!(ctx.position(), 0);

    process.run(&mut ctx).unwrap();

    assert_eq!(
        ctx.get_field_mapping(&LogicalPath::parse("/payload")).unwrap().converted_value,
        0x42
    );
    // Process is position-neutral: the caller's own cursor is restored.
    assert_eq!(ctx.position(), 0);
}

#[test]
fn process_without_a_prior_deferred_run_fails() {
    let bytes = vec![0x00u8];
    let mut ctx: DecodingContext<MemoryBitReader, MemoryFieldTree<u64>, IdentityConverter> =
        DecodingContext::new(MemoryBitReader::new(bytes), MemoryFieldTree::new(), IdentityConverter);

    let deferred = DeferredBlock::new(Box::new(Field::new("payload", 8)));
    let process = ProcessBlock::new(deferred);

    assert!(process.run(&mut ctx).is_err());
}
