//! Scenario S2: `Fill` nested inside `Buffer` parses as many fixed-width
//! fields as fit in the window, then stops cleanly on the first
//! iteration that would overrun the window edge.

use bitweave::block::{Block, Buffer, Field, Fill, Group};
use bitweave::context::DecodingContext;
use bitweave::mem::{IdentityConverter, MemoryBitReader, MemoryFieldTree};
use bitweave::path::LogicalPath;
use bitweave::CodingContext;

#[test]
fn fill_stops_at_window_edge_leaving_no_partial_iteration() {
    // 24 bits of data, windowed to 20 bits: two 8-bit reads fit (16
    // bits), a third would reach 24 and overruns the 20-bit window.
    let bytes = vec![0x11u8, 0x22, 0x33];
    let mut ctx: DecodingContext<MemoryBitReader, MemoryFieldTree<u64>, IdentityConverter> =
        DecodingContext::new(MemoryBitReader::new(bytes), MemoryFieldTree::new(), IdentityConverter);

    let group: Group<u64> = Group::new(vec![Box::new(Field::new("item", 8)) as Box<dyn Block<u64>>]);
    let fill: Fill<u64> = Fill::new(Box::new(group));
    let buffer: Buffer<u64> = Buffer::new(20, Box::new(fill));

    buffer.run(&mut ctx).unwrap();

    assert_eq!(ctx.position(), 16);
    // The field at "item" was overwritten each iteration; the last
    // successful one leaves the second byte's value bound.
    assert_eq!(
        ctx.get_field_mapping(&LogicalPath::parse("/item")).unwrap().converted_value,
        0x22
    );
}

#[test]
fn fill_with_buffer_exactly_matching_total_length_consumes_it_all() {
    let bytes = vec![0xAAu8, 0xBB];
    let mut ctx: DecodingContext<MemoryBitReader, MemoryFieldTree<u64>, IdentityConverter> =
        DecodingContext::new(MemoryBitReader::new(bytes), MemoryFieldTree::new(), IdentityConverter);

    let group: Group<u64> = Group::new(vec![Box::new(Field::new("item", 8)) as Box<dyn Block<u64>>]);
    let fill: Fill<u64> = Fill::new(Box::new(group));
    let buffer: Buffer<u64> = Buffer::new(16, Box::new(fill));

    buffer.run(&mut ctx).unwrap();
    assert_eq!(ctx.position(), 16);
}
