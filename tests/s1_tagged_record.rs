//! Scenario S1: a tagged record decoded with `Group` + `Field` + `Choice`
//! — a leading tag field selects which payload field follows.

use bitweave::block::{Block, Choice, ChoiceCase, Field, Group};
use bitweave::context::DecodingContext;
use bitweave::mem::{IdentityConverter, MemoryBitReader, MemoryBitWriter, MemoryFieldTree};
use bitweave::outcome::Outcome;
use bitweave::path::LogicalPath;
use bitweave::stream::BitStreamWriter;
use bitweave::CodingContext;

fn tagged_record() -> Group<u64> {
    let switch = Box::new(|ctx: &dyn CodingContext<Value = u64>| {
        ctx.get_field_mapping(&LogicalPath::parse("/tag"))
            .map(|m| m.converted_value)
    });
    let cases = choice_cases();
    Group::new(vec![
        Box::new(Field::new("tag", 4)) as Box<dyn Block<u64>>,
        Box::new(Choice::new(switch, cases)) as Box<dyn Block<u64>>,
    ])
}

fn choice_cases() -> Vec<ChoiceCase<u64>> {
    vec![
        ChoiceCase::new(
            vec![Box::new(|_ctx: &dyn CodingContext<Value = u64>| Outcome::ok(1u64))
                as Box<dyn Fn(&dyn CodingContext<Value = u64>) -> Outcome<u64>>],
            Box::new(Field::new("payload_a", 8)),
        ),
        ChoiceCase::new(
            vec![Box::new(|_ctx: &dyn CodingContext<Value = u64>| Outcome::ok(2u64))
                as Box<dyn Fn(&dyn CodingContext<Value = u64>) -> Outcome<u64>>],
            Box::new(Field::new("payload_b", 16)),
        ),
    ]
}

#[test]
fn tag_one_selects_payload_a() {
    let mut writer = MemoryBitWriter::new();
    writer.write(bitweave::BitValue::new(1, 4)).unwrap();
    writer.write(bitweave::BitValue::new(0xAB, 8)).unwrap();
    let bytes = writer.into_bytes();

    let mut ctx: DecodingContext<MemoryBitReader, MemoryFieldTree<u64>, IdentityConverter> =
        DecodingContext::new(MemoryBitReader::new(bytes), MemoryFieldTree::new(), IdentityConverter);

    let record = tagged_record();
    record.run(&mut ctx).unwrap();

    assert_eq!(
        ctx.get_field_mapping(&LogicalPath::parse("/tag")).unwrap().converted_value,
        1
    );
    assert_eq!(
        ctx.get_field_mapping(&LogicalPath::parse("/payload_a")).unwrap().converted_value,
        0xAB
    );
    assert!(ctx.get_field_mapping(&LogicalPath::parse("/payload_b")).is_err());
}

#[test]
fn tag_two_selects_payload_b() {
    let mut writer = MemoryBitWriter::new();
    writer.write(bitweave::BitValue::new(2, 4)).unwrap();
    writer.write(bitweave::BitValue::new(0xBEEF, 16)).unwrap();
    let bytes = writer.into_bytes();

    let mut ctx: DecodingContext<MemoryBitReader, MemoryFieldTree<u64>, IdentityConverter> =
        DecodingContext::new(MemoryBitReader::new(bytes), MemoryFieldTree::new(), IdentityConverter);

    let record = tagged_record();
    record.run(&mut ctx).unwrap();

    assert_eq!(
        ctx.get_field_mapping(&LogicalPath::parse("/payload_b")).unwrap().converted_value,
        0xBEEF
    );
    assert!(ctx.get_field_mapping(&LogicalPath::parse("/payload_a")).is_err());
}
