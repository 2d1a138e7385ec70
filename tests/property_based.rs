//! Property-style checks for the universally-quantified invariants
//! listed in spec §8: path normalization is idempotent, `combine`'s
//! absoluteness rule holds for any operand pair, and a rolled-back
//! transaction leaves no trace in the field map regardless of how many
//! fields a run managed to bind before failing.

use proptest::prelude::*;

use bitweave::block::{Block, Field, Group};
use bitweave::context::DecodingContext;
use bitweave::mem::{IdentityConverter, MemoryBitReader, MemoryFieldTree};
use bitweave::path::LogicalPath;
use bitweave::CodingContext;

fn path_segment() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

fn path_string() -> impl Strategy<Value = String> {
    (any::<bool>(), proptest::collection::vec(path_segment(), 0..5)).prop_map(
        |(absolute, segments)| {
            let joined = segments.join("/");
            if absolute {
                alloc_slash(joined)
            } else {
                joined
            }
        },
    )
}

fn alloc_slash(joined: String) -> String {
    let mut s = String::from("/");
    s.push_str(&joined);
    s
}

proptest! {
    #[test]
    fn normalization_is_idempotent(raw in path_string()) {
        let once = LogicalPath::parse(&raw).to_normalized_string();
        let twice = LogicalPath::parse(&once).to_normalized_string();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn combine_absoluteness_rule(
        left_absolute in any::<bool>(),
        left_segments in proptest::collection::vec(path_segment(), 0..4),
        right_absolute in any::<bool>(),
        right_segments in proptest::collection::vec(path_segment(), 0..4),
    ) {
        let left = build_path(left_absolute, &left_segments);
        let right = build_path(right_absolute, &right_segments);
        let combined = left.combine(&right);
        // spec §4.2: an absolute right operand always wins outright; a
        // relative one inherits the left operand's kind.
        if right_absolute {
            prop_assert!(combined.is_absolute());
        } else {
            prop_assert_eq!(combined.is_absolute(), left_absolute);
        }
    }

    #[test]
    fn rollback_removes_every_field_a_failed_run_bound(
        byte_count in 0usize..4,
        field_widths in proptest::collection::vec(1u32..9, 1..5),
    ) {
        let bytes = vec![0xFFu8; byte_count];
        let mut ctx: DecodingContext<MemoryBitReader, MemoryFieldTree<u64>, IdentityConverter> =
            DecodingContext::new(MemoryBitReader::new(bytes), MemoryFieldTree::new(), IdentityConverter);

        let children = field_widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                Box::new(Field::new(format!("f{i}"), *width)) as Box<dyn Block<u64>>
            })
            .collect();
        let group: Group<u64> = Group::new(children);

        let mut txn = ctx.begin_transaction().unwrap();
        let _ = group.run(&mut ctx);
        txn.rollback();

        for i in 0..field_widths.len() {
            prop_assert!(ctx
                .get_field_mapping(&LogicalPath::parse(&format!("/f{i}")))
                .is_err());
        }
    }
}

fn build_path(absolute: bool, segments: &[String]) -> LogicalPath {
    let joined = segments.join("/");
    let raw = if absolute {
        alloc_slash(joined)
    } else {
        joined
    };
    LogicalPath::parse(&raw)
}
