//! Snapshot of the rewritten instruction stream after a spill round, to
//! catch accidental changes to reload/store placement or naming.

use chaitin_regalloc::ir::InstructionDescriptor;
use chaitin_regalloc::{AllocationDriver, AllocatorConfig};
use insta::assert_snapshot;
use std::collections::HashMap;

fn render(allocation: &chaitin_regalloc::Allocation) -> String {
    allocation
        .program
        .instructions
        .iter()
        .map(|i| {
            let defs = i.defs.iter().map(|d| d.symbol.name()).collect::<Vec<_>>().join(",");
            let uses = i.uses.iter().map(|u| u.symbol.name()).collect::<Vec<_>>().join(",");
            format!("[{}] \"{}\" defs=[{defs}] uses=[{uses}]", i.kind, i.display_text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn spill_rewrite_of_an_overlapping_pair_under_one_register() {
    let descs = vec![
        InstructionDescriptor::new("a := 1", "entry").with_def("a", false),
        InstructionDescriptor::new("b := 2", "entry").with_def("b", false),
        InstructionDescriptor::new("use b", "entry").with_use("b", true),
        InstructionDescriptor::new("use a", "entry").with_use("a", true),
    ];
    let program = chaitin_regalloc::ir::IntermediateProgram::build(descs, HashMap::new()).unwrap();
    let allocation = AllocationDriver::new(AllocatorConfig::new(1)).allocate(program).unwrap();

    assert_snapshot!(render(&allocation), @r###"
    [ordinary] "a := 1" defs=[a.spill0] uses=[]
    [store] "store a.spill0 -> a" defs=[] uses=[a.spill0]
    [ordinary] "b := 2" defs=[b] uses=[]
    [ordinary] "use b" defs=[] uses=[b]
    [reload] "a.spill1 := reload a" defs=[a.spill1] uses=[]
    [ordinary] "use a" defs=[] uses=[a.spill1]
    "###);
}
